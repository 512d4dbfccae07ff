use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, SyncUserCmd, User, users, util::non_empty};

use super::{Engine, with_tx};

/// Result of [`Engine::sync_user`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Created(User),
    Updated(User),
}

impl SyncOutcome {
    pub fn into_user(self) -> User {
        match self {
            Self::Created(user) | Self::Updated(user) => user,
        }
    }
}

impl Engine {
    /// Map an external identity reference to the internal user id.
    ///
    /// Missing, blank and unknown references all yield `Ok(None)`.
    pub async fn resolve_user_id(&self, firebase_uid: Option<&str>) -> ResultEngine<Option<i32>> {
        lookup_user_id(&self.database, firebase_uid).await
    }

    /// Resolve the owner or fail with `User not found`.
    pub(super) async fn require_user_id(
        &self,
        db: &impl ConnectionTrait,
        firebase_uid: Option<&str>,
    ) -> ResultEngine<i32> {
        lookup_user_id(db, firebase_uid)
            .await?
            .ok_or_else(|| EngineError::not_found("User not found"))
    }

    /// Upsert a user by `firebase_uid`.
    pub async fn sync_user(&self, cmd: SyncUserCmd) -> ResultEngine<SyncOutcome> {
        let (Some(firebase_uid), Some(email)) = (
            non_empty(cmd.firebase_uid.as_deref()),
            non_empty(cmd.email.as_deref()),
        ) else {
            return Err(EngineError::validation(
                "firebase_uid and email are required",
            ));
        };

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let existing = users::Entity::find()
                .filter(users::Column::FirebaseUid.eq(firebase_uid.clone()))
                .one(&db_tx)
                .await?;

            match existing {
                Some(model) => {
                    let id = model.id;
                    let mut active: users::ActiveModel = model.into();
                    active.email = ActiveValue::Set(email);
                    active.display_name = ActiveValue::Set(cmd.display_name);
                    active.photo_url = ActiveValue::Set(cmd.photo_url);
                    active.email_verified =
                        ActiveValue::Set(cmd.email_verified.unwrap_or(false));
                    active.updated_at = ActiveValue::Set(now);
                    let model = active.update(&db_tx).await?;
                    tracing::debug!(user_id = id, "user refreshed from identity provider");
                    Ok::<_, EngineError>(SyncOutcome::Updated(model.into()))
                }
                None => {
                    let active = users::ActiveModel {
                        id: ActiveValue::NotSet,
                        firebase_uid: ActiveValue::Set(firebase_uid),
                        email: ActiveValue::Set(email),
                        display_name: ActiveValue::Set(cmd.display_name),
                        photo_url: ActiveValue::Set(cmd.photo_url),
                        email_verified: ActiveValue::Set(cmd.email_verified.unwrap_or(false)),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                    };
                    let model = active.insert(&db_tx).await?;
                    tracing::info!(user_id = model.id, "user created");
                    Ok(SyncOutcome::Created(model.into()))
                }
            }
        })
    }

    pub async fn user_by_firebase_uid(&self, firebase_uid: &str) -> ResultEngine<User> {
        users::Entity::find()
            .filter(users::Column::FirebaseUid.eq(firebase_uid))
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::not_found("User not found"))
    }

    /// First user registered with `email`.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .order_by_asc(users::Column::Id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::not_found("User not found"))
    }

    /// Every user, newest first.
    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }
}

/// Resolve `firebase_uid` on `db`, which may be an open storage transaction.
pub(super) async fn lookup_user_id(
    db: &impl ConnectionTrait,
    firebase_uid: Option<&str>,
) -> ResultEngine<Option<i32>> {
    let Some(firebase_uid) = non_empty(firebase_uid) else {
        return Ok(None);
    };
    let model = users::Entity::find()
        .filter(users::Column::FirebaseUid.eq(firebase_uid))
        .one(db)
        .await?;
    Ok(model.map(|m| m.id))
}
