use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewPaymentMethodCmd, Patch, PaymentMethod, PaymentMethodKind,
    PaymentMethodPatch, ResultEngine, payment_methods, util::non_empty,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a payment method for the resolved owner.
    ///
    /// An unresolved owner stores the method without one.
    pub async fn create_payment_method(
        &self,
        cmd: NewPaymentMethodCmd,
    ) -> ResultEngine<PaymentMethod> {
        let (Some(name), Some(kind)) = (
            non_empty(cmd.name.as_deref()),
            non_empty(cmd.kind.as_deref()),
        ) else {
            return Err(EngineError::validation("name and type are required"));
        };
        let kind = PaymentMethodKind::try_from(kind.as_str())?;
        let user_id = self.resolve_user_id(cmd.firebase_uid.as_deref()).await?;

        let now = Utc::now();
        let active = payment_methods::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            icon: ActiveValue::Set(non_empty(cmd.icon.as_deref())),
            description: ActiveValue::Set(non_empty(cmd.description.as_deref())),
            is_default: ActiveValue::Set(cmd.is_default.unwrap_or(false)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active.insert(&self.database).await?;
        PaymentMethod::try_from(model)
    }

    /// The owner's payment methods, default first. Unknown owners have none.
    pub async fn list_payment_methods(
        &self,
        firebase_uid: Option<&str>,
    ) -> ResultEngine<Vec<PaymentMethod>> {
        let Some(user_id) = self.resolve_user_id(firebase_uid).await? else {
            return Ok(Vec::new());
        };
        let models = payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_desc(payment_methods::Column::IsDefault)
            .order_by_asc(payment_methods::Column::Name)
            .order_by_asc(payment_methods::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(PaymentMethod::try_from).collect()
    }

    pub async fn payment_method(&self, id: i32) -> ResultEngine<PaymentMethod> {
        let model = payment_methods::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(payment_method_not_found)?;
        PaymentMethod::try_from(model)
    }

    pub async fn update_payment_method(
        &self,
        id: i32,
        patch: PaymentMethodPatch,
    ) -> ResultEngine<PaymentMethod> {
        let kind = match non_empty(patch.kind.as_set().map(String::as_str)) {
            Some(kind) => Patch::Set(PaymentMethodKind::try_from(kind.as_str())?),
            None => Patch::Keep,
        };
        let name = match non_empty(patch.name.as_set().map(String::as_str)) {
            Some(name) => Patch::Set(name),
            None => Patch::Keep,
        };

        with_tx!(self, |db_tx| {
            let model = payment_methods::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(payment_method_not_found)?;

            let mut active: payment_methods::ActiveModel = model.clone().into();
            active.name = ActiveValue::Set(name.apply(model.name));
            active.kind = ActiveValue::Set(kind.map(|k| k.as_str().to_string()).apply(model.kind));
            active.icon = ActiveValue::Set(patch.icon.apply(model.icon));
            active.description = ActiveValue::Set(patch.description.apply(model.description));
            active.is_default = ActiveValue::Set(patch.is_default.apply(model.is_default));
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            PaymentMethod::try_from(model)
        })
    }

    pub async fn delete_payment_method(&self, id: i32) -> ResultEngine<()> {
        let result = payment_methods::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(payment_method_not_found());
        }
        Ok(())
    }
}

fn payment_method_not_found() -> EngineError {
    EngineError::not_found("Payment method not found")
}
