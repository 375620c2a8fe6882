//! Users table (minimal entity).
//!
//! Credential issuance lives outside the engine; the engine only needs to
//! resolve a username/password pair to a [`Caller`](crate::Caller).

use sea_orm::entity::prelude::*;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub currency: Option<String>,
    pub monthly_income: Option<f64>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Hashes a password for storage in `users.password_hash`.
///
/// bcrypt salts every hash, so equal passwords never share a stored value.
pub fn hash_password(password: &str, cost: u32) -> ResultEngine<String> {
    bcrypt::hash(password, cost)
        .map_err(|err| EngineError::invalid(format!("cannot hash password: {err}")))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed stored hash never authenticates.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(valid) => valid,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is unreadable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("secret", 4).unwrap();
        let second = hash_password("secret", 4).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret", &first));
        assert!(verify_password("secret", &second));
        assert!(!verify_password("Secret", &first));
    }

    #[test]
    fn unreadable_hash_never_verifies() {
        assert!(!verify_password("secret", "not-a-bcrypt-hash"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        assert!(matches!(
            hash_password("secret", 1),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
