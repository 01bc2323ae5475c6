use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// A storefront account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
}

/// Successful login or registration: the account plus its bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_defaults_to_customer() {
        let user: User =
            serde_json::from_str(r#"{"_id":"u1","name":"Ada","email":"ada@example.com"}"#)
                .unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.id.as_str(), "u1");
    }
}
