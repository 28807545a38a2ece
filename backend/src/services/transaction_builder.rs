//! # Transaction Builder Service
//!
//! The TransactionBuilder creates the Move calls for the loyalty
//! contract. It is pure: nothing here touches the network.
//!
//! ## Entry Points
//!
//! ```text
//! <package>::online_course_loyalty
//! ├── create_badge(student_name: String, course_id: String, student: address)
//! └── update_progress(cap: &AdminCap, badge: &mut Badge, progress: u8)
//! ```

use serde_json::{json, Value};

use crate::sui::transaction::{parse_address, CallArg};

/// Move module holding the loyalty contract.
pub const LOYALTY_MODULE: &str = "online_course_loyalty";

/// Entry function minting a badge.
pub const CREATE_BADGE_FUNCTION: &str = "create_badge";

/// Entry function updating a badge's progress.
pub const UPDATE_PROGRESS_FUNCTION: &str = "update_progress";

/// Marker contained in the fully qualified Badge struct type.
pub const BADGE_TYPE_MARKER: &str = "::online_course_loyalty::Badge";

/// One argument of a Move call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveArg {
    /// An object passed by ID.
    Object(String),
    /// A `String` value.
    Utf8(String),
    /// An `address` value.
    Address(String),
    U8(u8),
}

impl MoveArg {
    /// The argument as `unsafe_moveCall` expects it.
    pub fn to_json(&self) -> Value {
        match self {
            MoveArg::Object(id) => json!(id),
            MoveArg::Utf8(s) => json!(s),
            MoveArg::Address(a) => json!(a),
            MoveArg::U8(v) => json!(v),
        }
    }

    /// Whether a transaction input carries exactly this argument.
    ///
    /// Objects match by ID only; the node fills in version and digest.
    pub fn matches(&self, input: &CallArg) -> bool {
        match (self, input) {
            (MoveArg::Object(id), CallArg::Object(arg)) => {
                parse_address(id).is_some_and(|id| &id == arg.object_id())
            }
            (MoveArg::Utf8(s), CallArg::Pure(bytes)) => {
                bcs::to_bytes(s).is_ok_and(|expected| &expected == bytes)
            }
            (MoveArg::Address(a), CallArg::Pure(bytes)) => {
                parse_address(a).is_some_and(|expected| expected.as_slice() == bytes.as_slice())
            }
            (MoveArg::U8(v), CallArg::Pure(bytes)) => bytes.as_slice() == [*v],
            _ => false,
        }
    }
}

/// A Move function call ready to be resolved into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub package_id: String,
    pub module: &'static str,
    pub function: &'static str,
    pub arguments: Vec<MoveArg>,
}

impl MoveCall {
    /// `package::module::function`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package_id, self.module, self.function)
    }

    /// Arguments in `unsafe_moveCall` form.
    pub fn json_arguments(&self) -> Vec<Value> {
        self.arguments.iter().map(MoveArg::to_json).collect()
    }
}

/// Builds Move calls against one deployed loyalty package.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    package_id: String,
    admin_cap_id: String,
}

impl TransactionBuilder {
    pub fn new(package_id: &str, admin_cap_id: &str) -> Self {
        Self {
            package_id: package_id.to_string(),
            admin_cap_id: admin_cap_id.to_string(),
        }
    }

    /// Build a `create_badge` call.
    ///
    /// ## Arguments
    ///
    /// * `student_name` - Display name stored on the badge
    /// * `course_id` - Course identifier
    /// * `student_address` - Address the badge is minted for
    pub fn build_create_badge(
        &self,
        student_name: &str,
        course_id: &str,
        student_address: &str,
    ) -> MoveCall {
        MoveCall {
            package_id: self.package_id.clone(),
            module: LOYALTY_MODULE,
            function: CREATE_BADGE_FUNCTION,
            arguments: vec![
                MoveArg::Utf8(student_name.to_string()),
                MoveArg::Utf8(course_id.to_string()),
                MoveArg::Address(student_address.to_string()),
            ],
        }
    }

    /// Build an `update_progress` call.
    ///
    /// The admin capability object authorizes the mutation.
    pub fn build_update_progress(&self, badge_id: &str, progress: u8) -> MoveCall {
        MoveCall {
            package_id: self.package_id.clone(),
            module: LOYALTY_MODULE,
            function: UPDATE_PROGRESS_FUNCTION,
            arguments: vec![
                MoveArg::Object(self.admin_cap_id.clone()),
                MoveArg::Object(badge_id.to_string()),
                MoveArg::U8(progress),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sui::transaction::ObjectArg;

    fn builder() -> TransactionBuilder {
        TransactionBuilder::new("0xa", "0xc")
    }

    #[test]
    fn test_create_badge_call() {
        let call = builder().build_create_badge("Ada", "RUST-101", "0xb");
        assert_eq!(call.target(), "0xa::online_course_loyalty::create_badge");
        assert_eq!(
            call.json_arguments(),
            vec![json!("Ada"), json!("RUST-101"), json!("0xb")]
        );
    }

    #[test]
    fn test_update_progress_call_passes_admin_cap_first() {
        let call = builder().build_update_progress("0xd", 75);
        assert_eq!(call.target(), "0xa::online_course_loyalty::update_progress");
        assert_eq!(call.json_arguments(), vec![json!("0xc"), json!("0xd"), json!(75)]);
    }

    #[test]
    fn test_pure_arguments_match_bcs_inputs() {
        let name = MoveArg::Utf8("Ada".to_string());
        assert!(name.matches(&CallArg::Pure(vec![3, b'A', b'd', b'a'])));
        assert!(!name.matches(&CallArg::Pure(vec![3, b'B', b'o', b'b'])));

        let mut address = [0u8; 32];
        address[31] = 0x0b;
        assert!(MoveArg::Address("0xb".to_string()).matches(&CallArg::Pure(address.to_vec())));
        assert!(MoveArg::U8(50).matches(&CallArg::Pure(vec![50])));
        assert!(!MoveArg::U8(50).matches(&CallArg::Pure(vec![100])));
    }

    #[test]
    fn test_object_arguments_match_by_id() {
        let mut id = [0u8; 32];
        id[31] = 0x0c;
        let owned = CallArg::Object(ObjectArg::ImmOrOwnedObject((id, 4, vec![0u8; 32])));
        let shared = CallArg::Object(ObjectArg::SharedObject {
            id,
            initial_shared_version: 1,
            mutable: true,
        });

        let cap = MoveArg::Object("0xc".to_string());
        assert!(cap.matches(&owned));
        assert!(cap.matches(&shared));
        assert!(!MoveArg::Object("0xd".to_string()).matches(&owned));
        // An object ID passed as a pure value is not the object
        assert!(!cap.matches(&CallArg::Pure(id.to_vec())));
    }
}
