use std::collections::HashSet;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Catalog, EngineError, Recipe, RecipeComponent, RecipeItem, ResultEngine, Snapshot, categories,
    ingredients, menu_items,
    money::QUANTITY_PLACES,
    recipe_components, recipe_items, recipes,
    util::{ensure_non_negative, ensure_places, ensure_positive, normalize_display_name},
};

use super::{Engine, with_tx};

fn validate_recipe(recipe: &Recipe) -> ResultEngine<()> {
    ensure_positive(recipe.yield_total, "recipe yield")?;
    ensure_places(recipe.yield_total, QUANTITY_PLACES, "recipe yield")?;
    if let Some(weight) = recipe.portion_weight {
        ensure_positive(weight, "portion weight")?;
        ensure_places(weight, QUANTITY_PLACES, "portion weight")?;
    }
    Ok(())
}

fn validate_item(item: &RecipeItem) -> ResultEngine<()> {
    for (value, label) in [
        (item.gross_weight, "gross weight"),
        (item.net_weight, "net weight"),
        (item.correction_factor, "correction factor"),
    ] {
        if let Some(value) = value {
            ensure_non_negative(value, label)?;
            ensure_places(value, QUANTITY_PLACES, label)?;
        }
    }
    Ok(())
}

fn validate_component(component: &RecipeComponent) -> ResultEngine<()> {
    ensure_positive(component.quantity, "component quantity")?;
    ensure_places(component.quantity, QUANTITY_PLACES, "component quantity")
}

impl Engine {
    /// Store a new recipe together with its line items and components.
    ///
    /// The category, every ingredient and every sub-recipe must exist.
    pub async fn new_recipe(&self, mut recipe: Recipe) -> ResultEngine<Uuid> {
        recipe.title = normalize_display_name(&recipe.title, "recipe")?;
        validate_recipe(&recipe)?;
        recipe.items.iter().try_for_each(validate_item)?;
        recipe.components.iter().try_for_each(validate_component)?;

        with_tx!(self, |db_tx| {
            categories::Entity::find_by_id(recipe.category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound(format!("category {}", recipe.category_id))
                })?;

            let model: recipes::ActiveModel = (&recipe).into();
            model.insert(&db_tx).await?;

            for (position, item) in recipe.items.iter().enumerate() {
                Self::insert_item(&db_tx, recipe.id, position, item).await?;
            }
            for (position, component) in recipe.components.iter().enumerate() {
                if component.sub_recipe_id == recipe.id {
                    return Err(EngineError::CyclicRecipeGraph(format!(
                        "{} -> {}",
                        recipe.title, recipe.title
                    )));
                }
                Self::insert_component(&db_tx, recipe.id, position, component).await?;
            }

            tracing::debug!(recipe_id = %recipe.id, title = %recipe.title, "recipe created");
            Ok(recipe.id)
        })
    }

    /// Append a line item to a recipe.
    pub async fn add_recipe_item(&self, recipe_id: Uuid, item: RecipeItem) -> ResultEngine<Uuid> {
        validate_item(&item)?;
        with_tx!(self, |db_tx| {
            Self::require_recipe_model(&db_tx, recipe_id).await?;
            let position = recipe_items::Entity::find()
                .filter(recipe_items::Column::RecipeId.eq(recipe_id))
                .order_by_desc(recipe_items::Column::Position)
                .one(&db_tx)
                .await?
                .map_or(0, |last| usize::try_from(last.position).unwrap_or_default() + 1);
            Self::insert_item(&db_tx, recipe_id, position, &item).await?;
            Ok(item.id)
        })
    }

    /// Append a sub-recipe component to a recipe.
    ///
    /// Rejected with [`EngineError::CyclicRecipeGraph`] when the sub-recipe
    /// already contains `recipe_id`, directly or through its own components.
    pub async fn add_recipe_component(
        &self,
        recipe_id: Uuid,
        component: RecipeComponent,
    ) -> ResultEngine<Uuid> {
        validate_component(&component)?;
        with_tx!(self, |db_tx| {
            let parent = Self::require_recipe_model(&db_tx, recipe_id).await?;
            Self::ensure_acyclic(&db_tx, &parent, component.sub_recipe_id).await?;
            let position = recipe_components::Entity::find()
                .filter(recipe_components::Column::RecipeId.eq(recipe_id))
                .order_by_desc(recipe_components::Column::Position)
                .one(&db_tx)
                .await?
                .map_or(0, |last| usize::try_from(last.position).unwrap_or_default() + 1);
            Self::insert_component(&db_tx, recipe_id, position, &component).await?;
            Ok(component.id)
        })
    }

    pub async fn remove_recipe_item(&self, item_id: Uuid) -> ResultEngine<()> {
        let result = recipe_items::Entity::delete_by_id(item_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("recipe item {item_id}")));
        }
        Ok(())
    }

    pub async fn remove_recipe_component(&self, component_id: Uuid) -> ResultEngine<()> {
        let result = recipe_components::Entity::delete_by_id(component_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!(
                "recipe component {component_id}"
            )));
        }
        Ok(())
    }

    /// Return a recipe with its line items and components.
    pub async fn recipe(&self, recipe_id: Uuid) -> ResultEngine<Recipe> {
        with_tx!(self, |db_tx| Self::fetch_recipe(&db_tx, recipe_id).await)
    }

    /// All recipes ordered by title, without line items or components.
    pub async fn list_recipes(&self) -> ResultEngine<Vec<Recipe>> {
        recipes::Entity::find()
            .order_by_asc(recipes::Column::Title)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Recipe::try_from)
            .collect()
    }

    /// Load a recipe and everything it references in one transaction.
    pub async fn load_recipe(&self, recipe_id: Uuid) -> ResultEngine<Snapshot<Recipe>> {
        with_tx!(self, |db_tx| {
            let mut catalog = Catalog::new();
            Self::fetch_recipe_closure(&db_tx, vec![recipe_id], &mut catalog).await?;
            let root = catalog.recipe(recipe_id)?.clone();
            tracing::debug!(
                recipe_id = %recipe_id,
                recipes = catalog.recipes.len(),
                ingredients = catalog.ingredients.len(),
                "recipe snapshot loaded"
            );
            Ok(Snapshot { root, catalog })
        })
    }

    /// Delete a recipe with its line items and components.
    ///
    /// Menu items serving the recipe are deleted too. Rejected while another
    /// recipe uses it as a component.
    pub async fn delete_recipe(&self, recipe_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = Self::require_recipe_model(&db_tx, recipe_id).await?;

            let used_by = recipe_components::Entity::find()
                .filter(recipe_components::Column::SubRecipeId.eq(recipe_id))
                .count(&db_tx)
                .await?;
            if used_by > 0 {
                return Err(EngineError::Referenced(model.title));
            }

            menu_items::Entity::delete_many()
                .filter(menu_items::Column::RecipeId.eq(recipe_id))
                .exec(&db_tx)
                .await?;
            recipe_items::Entity::delete_many()
                .filter(recipe_items::Column::RecipeId.eq(recipe_id))
                .exec(&db_tx)
                .await?;
            recipe_components::Entity::delete_many()
                .filter(recipe_components::Column::RecipeId.eq(recipe_id))
                .exec(&db_tx)
                .await?;
            recipes::Entity::delete_by_id(recipe_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn insert_item(
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
        position: usize,
        item: &RecipeItem,
    ) -> ResultEngine<()> {
        ingredients::Entity::find_by_id(item.ingredient_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {}", item.ingredient_id)))?;

        let mut model: recipe_items::ActiveModel = item.into();
        model.recipe_id = ActiveValue::Set(recipe_id);
        model.position = ActiveValue::Set(i32::try_from(position).unwrap_or(i32::MAX));
        model.insert(db_tx).await?;
        Ok(())
    }

    async fn insert_component(
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
        position: usize,
        component: &RecipeComponent,
    ) -> ResultEngine<()> {
        Self::require_recipe_model(db_tx, component.sub_recipe_id).await?;

        let mut model: recipe_components::ActiveModel = component.into();
        model.recipe_id = ActiveValue::Set(recipe_id);
        model.position = ActiveValue::Set(i32::try_from(position).unwrap_or(i32::MAX));
        model.insert(db_tx).await?;
        Ok(())
    }

    /// Fail when `sub_recipe_id` reaches `parent` through stored components.
    async fn ensure_acyclic(
        db_tx: &DatabaseTransaction,
        parent: &recipes::Model,
        sub_recipe_id: Uuid,
    ) -> ResultEngine<()> {
        let sub = Self::require_recipe_model(db_tx, sub_recipe_id).await?;
        let mut pending = vec![sub_recipe_id];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if current == parent.id {
                return Err(EngineError::CyclicRecipeGraph(format!(
                    "{} -> {} -> {}",
                    parent.title, sub.title, parent.title
                )));
            }
            if !seen.insert(current) {
                continue;
            }
            let children = recipe_components::Entity::find()
                .filter(recipe_components::Column::RecipeId.eq(current))
                .all(db_tx)
                .await?;
            pending.extend(children.into_iter().map(|child| child.sub_recipe_id));
        }
        Ok(())
    }
}
