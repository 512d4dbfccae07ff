use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, prelude::*};

use crate::{AccountType, EngineError, NewAccountTypeCmd, ResultEngine, account_types, util::non_empty};

use super::Engine;

impl Engine {
    pub async fn list_account_types(&self) -> ResultEngine<Vec<AccountType>> {
        let models = account_types::Entity::find()
            .order_by_asc(account_types::Column::Name)
            .order_by_asc(account_types::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(AccountType::from).collect())
    }

    pub async fn account_type(&self, id: i32) -> ResultEngine<AccountType> {
        account_types::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(AccountType::from)
            .ok_or_else(|| EngineError::not_found("Account type not found"))
    }

    pub async fn create_account_type(&self, cmd: NewAccountTypeCmd) -> ResultEngine<AccountType> {
        let Some(name) = non_empty(cmd.name.as_deref()) else {
            return Err(EngineError::validation("name is required"));
        };
        let now = Utc::now();
        let active = account_types::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(non_empty(cmd.description.as_deref())),
            icon: ActiveValue::Set(non_empty(cmd.icon.as_deref())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active.insert(&self.database).await?;
        Ok(AccountType::from(model))
    }
}
