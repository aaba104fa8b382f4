use sea_orm::{DatabaseTransaction, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Catalog, EngineError, Event, Ingredient, MenuItem, Recipe, RecipeComponent, RecipeItem,
    ResultEngine, StaffParticipation, StaffRole, events, ingredients, menu_items,
    recipe_components, recipe_items, recipes, staff_participations, staff_roles,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_recipe_model(
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
    ) -> ResultEngine<recipes::Model> {
        recipes::Entity::find_by_id(recipe_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("recipe {recipe_id}")))
    }

    pub(super) async fn require_event_model(
        db_tx: &DatabaseTransaction,
        event_id: Uuid,
    ) -> ResultEngine<events::Model> {
        events::Entity::find_by_id(event_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("event {event_id}")))
    }

    /// Recipe with its line items and components in insertion order.
    pub(super) async fn fetch_recipe(
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
    ) -> ResultEngine<Recipe> {
        let model = Self::require_recipe_model(db_tx, recipe_id).await?;
        let items = model
            .find_related(recipe_items::Entity)
            .order_by_asc(recipe_items::Column::Position)
            .all(db_tx)
            .await?
            .into_iter()
            .map(RecipeItem::try_from)
            .collect::<ResultEngine<_>>()?;
        let components = model
            .find_related(recipe_components::Entity)
            .order_by_asc(recipe_components::Column::Position)
            .all(db_tx)
            .await?
            .into_iter()
            .map(RecipeComponent::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(Recipe {
            items,
            components,
            ..Recipe::try_from(model)?
        })
    }

    /// Event with its menu and staff in insertion order.
    pub(super) async fn fetch_event(
        db_tx: &DatabaseTransaction,
        event_id: Uuid,
    ) -> ResultEngine<Event> {
        let model = Self::require_event_model(db_tx, event_id).await?;
        let menu_items = model
            .find_related(menu_items::Entity)
            .order_by_asc(menu_items::Column::Position)
            .all(db_tx)
            .await?
            .into_iter()
            .map(MenuItem::try_from)
            .collect::<ResultEngine<_>>()?;
        let participations = model
            .find_related(staff_participations::Entity)
            .order_by_asc(staff_participations::Column::Position)
            .all(db_tx)
            .await?
            .into_iter()
            .map(StaffParticipation::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(Event {
            menu_items,
            participations,
            ..Event::try_from(model)?
        })
    }

    /// Add `roots` and everything reachable from them (sub-recipes and
    /// ingredients) to `catalog`.
    pub(super) async fn fetch_recipe_closure(
        db_tx: &DatabaseTransaction,
        roots: Vec<Uuid>,
        catalog: &mut Catalog,
    ) -> ResultEngine<()> {
        let mut pending = roots;
        while let Some(recipe_id) = pending.pop() {
            if catalog.recipes.contains_key(&recipe_id) {
                continue;
            }
            let recipe = Self::fetch_recipe(db_tx, recipe_id).await?;

            for item in &recipe.items {
                if catalog.ingredients.contains_key(&item.ingredient_id) {
                    continue;
                }
                let ingredient: Ingredient = ingredients::Entity::find_by_id(item.ingredient_id)
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound(format!("ingredient {}", item.ingredient_id))
                    })?
                    .try_into()?;
                catalog.insert_ingredient(ingredient);
            }

            pending.extend(
                recipe
                    .components
                    .iter()
                    .map(|component| component.sub_recipe_id),
            );
            catalog.insert_recipe(recipe);
        }
        Ok(())
    }

    pub(super) async fn fetch_staff_roles(
        db_tx: &DatabaseTransaction,
        event: &Event,
        catalog: &mut Catalog,
    ) -> ResultEngine<()> {
        for participation in &event.participations {
            if catalog.staff_roles.contains_key(&participation.role_id) {
                continue;
            }
            let role: StaffRole = staff_roles::Entity::find_by_id(participation.role_id)
                .one(db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound(format!("staff role {}", participation.role_id))
                })?
                .try_into()?;
            catalog.insert_staff_role(role);
        }
        Ok(())
    }
}
