use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Ingredient, ResultEngine, Unit, ingredients, recipe_items,
    util::{decimal_text, ensure_non_negative, ensure_places},
};

use super::{Engine, normalize_required_name, with_tx};

/// Ingredient cost is kept to 4 decimals.
const COST_PLACES: u32 = 4;

fn validate_cost(cost_per_unit: Decimal) -> ResultEngine<()> {
    ensure_non_negative(cost_per_unit, "ingredient cost")?;
    ensure_places(cost_per_unit, COST_PLACES, "ingredient cost")
}

impl Engine {
    /// Add an ingredient with its base unit and cost per base unit.
    pub async fn new_ingredient(
        &self,
        name: &str,
        base_unit: Unit,
        cost_per_unit: Decimal,
    ) -> ResultEngine<Uuid> {
        let (name, name_norm) = normalize_required_name(name, "ingredient")?;
        validate_cost(cost_per_unit)?;
        with_tx!(self, |db_tx| {
            let exists = ingredients::Entity::find()
                .filter(ingredients::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let ingredient = Ingredient::new(name, base_unit, cost_per_unit);
            let mut model: ingredients::ActiveModel = (&ingredient).into();
            model.name_norm = ActiveValue::Set(name_norm);
            model.insert(&db_tx).await?;
            Ok(ingredient.id)
        })
    }

    pub async fn ingredient(&self, ingredient_id: Uuid) -> ResultEngine<Ingredient> {
        ingredients::Entity::find_by_id(ingredient_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {ingredient_id}")))?
            .try_into()
    }

    /// All ingredients ordered by name.
    pub async fn list_ingredients(&self) -> ResultEngine<Vec<Ingredient>> {
        ingredients::Entity::find()
            .order_by_asc(ingredients::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Ingredient::try_from)
            .collect()
    }

    /// Change the cost per base unit. Every report reads it on the next load.
    pub async fn update_ingredient_cost(
        &self,
        ingredient_id: Uuid,
        cost_per_unit: Decimal,
    ) -> ResultEngine<()> {
        validate_cost(cost_per_unit)?;
        with_tx!(self, |db_tx| {
            let model = ingredients::Entity::find_by_id(ingredient_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {ingredient_id}")))?;

            let mut active: ingredients::ActiveModel = model.into();
            active.cost_per_unit = ActiveValue::Set(decimal_text(cost_per_unit));
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete an ingredient. Rejected while a recipe line uses it.
    pub async fn delete_ingredient(&self, ingredient_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = ingredients::Entity::find_by_id(ingredient_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {ingredient_id}")))?;

            let used_by = recipe_items::Entity::find()
                .filter(recipe_items::Column::IngredientId.eq(ingredient_id))
                .count(&db_tx)
                .await?;
            if used_by > 0 {
                return Err(EngineError::Referenced(model.name));
            }

            ingredients::Entity::delete_by_id(ingredient_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
