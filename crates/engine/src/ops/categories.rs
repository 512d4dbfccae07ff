use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Category, CategoryPatch, EngineError, NewCategoryCmd, Patch, ResultEngine, TransactionKind,
    categories, util::non_empty,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a category owned by the resolved user, or a global one when the
    /// owner does not resolve.
    pub async fn create_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        let (Some(name), Some(kind)) = (
            non_empty(cmd.name.as_deref()),
            non_empty(cmd.kind.as_deref()),
        ) else {
            return Err(EngineError::validation("name and type are required"));
        };
        let kind = TransactionKind::try_from(kind.as_str())?;
        let user_id = self.resolve_user_id(cmd.firebase_uid.as_deref()).await?;

        let now = Utc::now();
        let active = categories::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            icon: ActiveValue::Set(Some(categories::DEFAULT_ICON.to_string())),
            color: ActiveValue::Set(None),
            description: ActiveValue::Set(non_empty(cmd.description.as_deref())),
            is_default: ActiveValue::Set(cmd.is_default.unwrap_or(false)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active.insert(&self.database).await?;
        Category::try_from(model)
    }

    /// Categories visible to the caller: their own plus the global ones.
    ///
    /// An unknown caller sees only the globals. An unrecognized `kind` filter
    /// is ignored. Default-flagged categories come first, then by name.
    pub async fn list_categories(
        &self,
        firebase_uid: &str,
        kind: Option<&str>,
    ) -> ResultEngine<Vec<Category>> {
        let user_id = self.resolve_user_id(Some(firebase_uid)).await?;

        let mut query = categories::Entity::find().filter(visible_to(user_id));
        if let Some(kind) = TransactionKind::parse_filter(kind) {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        let models = query
            .order_by_desc(categories::Column::IsDefault)
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    pub async fn category(&self, id: i32) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(category_not_found)?;
        Category::try_from(model)
    }

    /// Merge `patch` into the stored category.
    pub async fn update_category(&self, id: i32, patch: CategoryPatch) -> ResultEngine<Category> {
        let kind = match non_empty(patch.kind.as_set().map(String::as_str)) {
            Some(kind) => Patch::Set(TransactionKind::try_from(kind.as_str())?),
            None => Patch::Keep,
        };
        let name = match non_empty(patch.name.as_set().map(String::as_str)) {
            Some(name) => Patch::Set(name),
            None => Patch::Keep,
        };

        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(category_not_found)?;

            let mut active: categories::ActiveModel = model.clone().into();
            active.name = ActiveValue::Set(name.apply(model.name));
            active.kind = ActiveValue::Set(kind.map(|k| k.as_str().to_string()).apply(model.kind));
            active.icon = ActiveValue::Set(patch.icon.apply(model.icon));
            active.color = ActiveValue::Set(patch.color.apply(model.color));
            active.description = ActiveValue::Set(patch.description.apply(model.description));
            active.is_default = ActiveValue::Set(patch.is_default.apply(model.is_default));
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Remove a category. Its transactions become uncategorized.
    pub async fn delete_category(&self, id: i32) -> ResultEngine<()> {
        let result = categories::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(category_not_found());
        }
        Ok(())
    }

    /// Fail unless `category_id` exists and is global or owned by `user_id`.
    pub(super) async fn require_visible_category(
        &self,
        db: &impl ConnectionTrait,
        user_id: i32,
        category_id: i32,
    ) -> ResultEngine<()> {
        categories::Entity::find_by_id(category_id)
            .filter(visible_to(Some(user_id)))
            .one(db)
            .await?
            .map(|_| ())
            .ok_or_else(category_not_found)
    }
}

fn visible_to(user_id: Option<i32>) -> Condition {
    let globals = categories::Column::UserId.is_null();
    match user_id {
        Some(user_id) => Condition::any()
            .add(categories::Column::UserId.eq(user_id))
            .add(globals),
        None => Condition::all().add(globals),
    }
}

fn category_not_found() -> EngineError {
    EngineError::not_found("Category not found")
}
