use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, categories, recipes};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a recipe category. Names are unique once normalized.
    pub async fn new_category(&self, name: &str, description: &str) -> ResultEngine<Uuid> {
        let (name, name_norm) = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            let exists = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category::new(name, description.trim());
            let mut model: categories::ActiveModel = (&category).into();
            model.name_norm = ActiveValue::Set(name_norm);
            model.insert(&db_tx).await?;
            Ok(category.id)
        })
    }

    pub async fn category(&self, category_id: Uuid) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(category_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id}")))?;
        Ok(model.into())
    }

    /// All categories ordered by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Delete a category. Rejected while a recipe belongs to it.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id}")))?;

            let used_by = recipes::Entity::find()
                .filter(recipes::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            if used_by > 0 {
                return Err(EngineError::Referenced(model.name));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
