use uuid::Uuid;

use crate::{
    Costing, EventPricing, RecipeCostSheet, ResultEngine, ShoppingListRow, SubRecipeDepth,
    shopping,
};

use super::Engine;

impl Engine {
    /// Technical sheet of a recipe, computed on a fresh snapshot.
    pub async fn recipe_cost_sheet(&self, recipe_id: Uuid) -> ResultEngine<RecipeCostSheet> {
        let snapshot = self.load_recipe(recipe_id).await?;
        Costing::new(&self.conversions, &snapshot.catalog).cost_sheet(&snapshot.root)
    }

    /// Priced quote of an event, computed on a fresh snapshot.
    pub async fn event_pricing(&self, event_id: Uuid) -> ResultEngine<EventPricing> {
        let snapshot = self.load_event(event_id).await?;
        Costing::new(&self.conversions, &snapshot.catalog).event_pricing(&snapshot.root)
    }

    /// Shopping list of an event using the configured sub-recipe depth.
    pub async fn shopping_list(&self, event_id: Uuid) -> ResultEngine<Vec<ShoppingListRow>> {
        self.shopping_list_with_depth(event_id, self.sub_recipe_depth)
            .await
    }

    pub async fn shopping_list_with_depth(
        &self,
        event_id: Uuid,
        depth: SubRecipeDepth,
    ) -> ResultEngine<Vec<ShoppingListRow>> {
        let snapshot = self.load_event(event_id).await?;
        shopping::shopping_list(&snapshot.catalog, &snapshot.root, depth)
    }
}
