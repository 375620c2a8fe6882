//! The access boundary: who is calling, and which rows they may touch.
//!
//! Every lookup here is scoped by `user_id`. A row that exists but belongs to
//! someone else is reported exactly like a missing row.

use chrono::Utc;
use sea_orm::{ActiveValue, Condition, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ResultEngine, accounts, bills, budgets, categories, savings_goals, transactions,
    users,
    users::{hash_password, verify_password},
    util::normalize_required,
};

use super::Engine;

/// The authenticated user on whose behalf an operation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Caller {
    user_id: i32,
}

impl Caller {
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }

    pub fn user_id(self) -> i32 {
        self.user_id
    }
}

/// Generates `find_*` and `require_*` lookups for an entity owned through a
/// `user_id` column.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $module:ident, $label:literal) => {
        pub(crate) async fn $find_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            caller: Caller,
            id: i32,
        ) -> ResultEngine<Option<$module::Model>> {
            $module::Entity::find_by_id(id)
                .filter($module::Column::UserId.eq(caller.user_id()))
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(crate) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            caller: Caller,
            id: i32,
        ) -> ResultEngine<$module::Model> {
            self.$find_fn(db, caller, id)
                .await?
                .ok_or_else(|| EngineError::not_found(&format!("{} {id}", $label)))
        }
    };
}

impl Engine {
    impl_owned_lookup!(find_account, require_account, accounts, "account");
    impl_owned_lookup!(find_transaction, require_transaction, transactions, "transaction");
    impl_owned_lookup!(find_bill, require_bill, bills, "bill");
    impl_owned_lookup!(find_budget, require_budget, budgets, "budget");
    impl_owned_lookup!(find_goal, require_goal, savings_goals, "savings goal");

    /// Resolves HTTP Basic credentials to a caller.
    ///
    /// Returns `None` for unknown users, inactive users and wrong passwords
    /// alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<Caller>> {
        let Some(user) = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if !user.is_active.unwrap_or(true) {
            return Ok(None);
        }
        if !verify_password(password, &user.password_hash) {
            return Ok(None);
        }
        Ok(Some(Caller::new(user.id)))
    }

    /// Creates a user with a hashed credential. Used for bootstrapping; there
    /// is no registration flow.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<Caller> {
        let username = normalize_required(username, "username")?;
        let email = normalize_required(email, "email")?;
        if password.is_empty() {
            return Err(EngineError::invalid("password must not be empty"));
        }
        let password_hash = hash_password(password, self.password_cost)?;
        self.with_tx("create_user", |_engine, db_tx| {
            Box::pin(async move {
                let taken = users::Entity::find()
                    .filter(
                        Condition::any()
                            .add(users::Column::Username.eq(username.as_str()))
                            .add(users::Column::Email.eq(email.as_str())),
                    )
                    .one(db_tx)
                    .await?;
                if taken.is_some() {
                    return Err(EngineError::Conflict(format!("user {username}")));
                }

                let model = users::ActiveModel {
                    username: ActiveValue::Set(username),
                    email: ActiveValue::Set(email),
                    password_hash: ActiveValue::Set(password_hash),
                    currency: ActiveValue::Set(Some("USD".to_string())),
                    is_active: ActiveValue::Set(Some(true)),
                    created_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;
                tracing::info!(user_id = model.id, "user created");
                Ok(Caller::new(model.id))
            })
        })
        .await
    }

    /// Loads a category the caller may attach to a transaction: a global one
    /// or one of their own.
    pub(crate) async fn require_visible_category<C: ConnectionTrait>(
        &self,
        db: &C,
        caller: Caller,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(visible_to(caller))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::invalid(format!("category {category_id} is not available"))
            })
    }

    /// Exact-name lookup among global and private categories, lowest id first.
    pub(crate) async fn find_visible_category_by_name<C: ConnectionTrait>(
        &self,
        db: &C,
        caller: Caller,
        name: &str,
    ) -> ResultEngine<Option<categories::Model>> {
        categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .filter(visible_to(caller))
            .order_by_asc(categories::Column::Id)
            .one(db)
            .await
            .map_err(Into::into)
    }
}

/// Global categories plus the caller's own.
pub(crate) fn visible_to(caller: Caller) -> Condition {
    Condition::any()
        .add(categories::Column::UserId.is_null())
        .add(categories::Column::UserId.eq(caller.user_id()))
}
