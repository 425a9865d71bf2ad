//! User account model.

use serde::{Deserialize, Serialize};

use canteen_core::{Phone, Role, UserId};

/// A registered account (shopkeeper or customer).
///
/// Users are immutable after creation; there is no profile editing or
/// password reset flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique login identifier.
    pub phone: Phone,
    /// Argon2id password hash.
    pub password_hash: String,
    pub role: Role,
}

/// User projection returned to clients, without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_drops_password_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Admin".to_owned(),
            phone: Phone::parse("0000000000").unwrap(),
            password_hash: "$argon2id$v=19$secret".to_owned(),
            role: Role::Admin,
        };

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
