use serde::{Deserialize, Serialize};

use super::participant::OPERATOR_IDENTITY_PREFIX;

/// The signed-in console operator, resolved from the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorIdentity {
    pub id: String,
    pub display_name: String,
}

impl OperatorIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// The operator's wire identity as it appears in room participant lists.
    pub fn identity(&self) -> String {
        format!("{}{}", OPERATOR_IDENTITY_PREFIX, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{classify_identity, IdentityClass};

    #[test]
    fn test_wire_identity_is_classified_as_operator() {
        let operator = OperatorIdentity::new("42", "Pat");
        assert_eq!(operator.identity(), "admin_42");
        assert_eq!(
            classify_identity(&operator.identity()),
            IdentityClass::Operator
        );
    }
}
