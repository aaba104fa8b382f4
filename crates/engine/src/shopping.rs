//! Consolidated purchase list for an event.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Catalog, Event, Money, Recipe, ResultEngine, Unit, costing::cycle_error,
    money::round_quantity,
};

/// How far sub-recipes are expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubRecipeDepth {
    /// Menu recipes and the direct line items of their sub-recipes only.
    Direct,
    /// Every nesting level.
    #[default]
    Full,
}

/// One ingredient to buy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShoppingListRow {
    pub ingredient: String,
    /// Rounded to 3 places, in `unit`.
    pub quantity: Decimal,
    pub unit: Unit,
    pub total_cost: Money,
}

#[derive(Debug)]
struct Bucket {
    quantity: Decimal,
    unit: Unit,
    unit_cost: Decimal,
}

struct Aggregator<'a> {
    catalog: &'a Catalog,
    depth: SubRecipeDepth,
    buckets: BTreeMap<String, Bucket>,
    path: Vec<Uuid>,
}

impl<'a> Aggregator<'a> {
    fn add_recipe(&mut self, recipe: &'a Recipe, scale: Decimal, level: usize) -> ResultEngine<()> {
        let catalog = self.catalog;
        // Direct depth stops one level down, so only Full can loop.
        if self.depth == SubRecipeDepth::Full && self.path.contains(&recipe.id) {
            return Err(cycle_error(catalog, &self.path, recipe.id));
        }
        self.path.push(recipe.id);

        for item in &recipe.items {
            let ingredient = catalog.ingredient(item.ingredient_id)?;
            let quantity = item.net_quantity().unwrap_or_default() * scale;
            match self.buckets.get_mut(&ingredient.name) {
                Some(bucket) => {
                    if bucket.unit_cost != ingredient.cost_per_unit {
                        tracing::warn!(
                            ingredient = %ingredient.name,
                            "unit cost {} replaces {} in shopping list",
                            ingredient.cost_per_unit,
                            bucket.unit_cost
                        );
                    }
                    bucket.quantity += quantity;
                    bucket.unit = ingredient.base_unit;
                    bucket.unit_cost = ingredient.cost_per_unit;
                }
                None => {
                    self.buckets.insert(
                        ingredient.name.clone(),
                        Bucket {
                            quantity,
                            unit: ingredient.base_unit,
                            unit_cost: ingredient.cost_per_unit,
                        },
                    );
                }
            }
        }

        let expand = match self.depth {
            SubRecipeDepth::Full => true,
            SubRecipeDepth::Direct => level == 0,
        };
        if expand {
            for component in &recipe.components {
                let sub = catalog.recipe(component.sub_recipe_id)?;
                let sub_scale = if sub.yield_total.is_zero() {
                    Decimal::ZERO
                } else {
                    scale * component.quantity / sub.yield_total
                };
                self.add_recipe(sub, sub_scale, level + 1)?;
            }
        }

        self.path.pop();
        Ok(())
    }

    fn rows(self) -> Vec<ShoppingListRow> {
        self.buckets
            .into_iter()
            .map(|(ingredient, bucket)| ShoppingListRow {
                ingredient,
                quantity: round_quantity(bucket.quantity),
                unit: bucket.unit,
                total_cost: Money::new(bucket.quantity * bucket.unit_cost),
            })
            .collect()
    }
}

/// Ingredients needed to serve the whole menu of `event`, sorted by name.
///
/// Each menu recipe is scaled by `portions_per_person × headcount / yield`
/// (a zero yield counts as 1); each sub-recipe by the share of its yield the
/// parent consumes. Ingredients with the same name merge into one row and
/// the last unit cost seen wins. Row costs use the unrounded quantity; only
/// the reported quantity is rounded to 3 places.
pub fn shopping_list(
    catalog: &Catalog,
    event: &Event,
    depth: SubRecipeDepth,
) -> ResultEngine<Vec<ShoppingListRow>> {
    let mut aggregator = Aggregator {
        catalog,
        depth,
        buckets: BTreeMap::new(),
        path: Vec::new(),
    };

    for item in &event.menu_items {
        let recipe = catalog.recipe(item.recipe_id)?;
        let yield_total = if recipe.yield_total.is_zero() {
            Decimal::ONE
        } else {
            recipe.yield_total
        };
        let scale = item.portions_per_person * Decimal::from(event.headcount) / yield_total;
        aggregator.add_recipe(recipe, scale, 0)?;
    }

    Ok(aggregator.rows())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{EngineError, Ingredient, MenuItem, RecipeComponent, RecipeItem};

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn event(headcount: u32) -> Event {
        Event::new(
            "Dinner",
            NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            headcount,
        )
    }

    struct Pantry {
        catalog: Catalog,
        tomato: Uuid,
        onion: Uuid,
        salt: Uuid,
    }

    impl Pantry {
        fn new() -> Self {
            let mut catalog = Catalog::new();
            let tomato =
                catalog.insert_ingredient(Ingredient::new("Tomato", Unit::Kilogram, d("5.00")));
            let onion =
                catalog.insert_ingredient(Ingredient::new("Onion", Unit::Kilogram, d("4.00")));
            let salt = catalog.insert_ingredient(Ingredient::new("Salt", Unit::Gram, d("0.002")));
            Self {
                catalog,
                tomato,
                onion,
                salt,
            }
        }

        fn recipe(&mut self, title: &str, yield_total: &str, items: &[(Uuid, &str)]) -> Uuid {
            let mut recipe = Recipe::new(title, Uuid::new_v4(), d(yield_total), Unit::Kilogram);
            for (ingredient, quantity) in items {
                recipe.add_item(
                    RecipeItem::new(*ingredient, Unit::Kilogram).with_net_weight(d(quantity)),
                );
            }
            self.catalog.insert_recipe(recipe)
        }

        fn nest(&mut self, parent: Uuid, child: Uuid, quantity: &str) {
            let component = RecipeComponent::new(child, d(quantity), Unit::Kilogram);
            if let Some(recipe) = self.catalog.recipes.get_mut(&parent) {
                recipe.add_component(component);
            }
        }
    }

    #[test]
    fn merges_ingredient_across_recipes_sorted_by_name() {
        let mut pantry = Pantry::new();
        let (tomato, onion) = (pantry.tomato, pantry.onion);
        let sauce = pantry.recipe("Sauce", "2", &[(tomato, "2"), (onion, "0.5")]);
        let salad = pantry.recipe("Salad", "1", &[(tomato, "0.3")]);

        let mut dinner = event(10);
        dinner.add_menu_item(MenuItem::new(sauce, d("0.2")));
        dinner.add_menu_item(MenuItem::new(salad, d("0.1")));

        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        // sauce scale 0.2 × 10 / 2 = 1; salad scale 0.1 × 10 / 1 = 1
        assert_eq!(
            rows,
            vec![
                ShoppingListRow {
                    ingredient: "Onion".to_string(),
                    quantity: d("0.500"),
                    unit: Unit::Kilogram,
                    total_cost: Money::new(d("2.00")),
                },
                ShoppingListRow {
                    ingredient: "Tomato".to_string(),
                    quantity: d("2.300"),
                    unit: Unit::Kilogram,
                    total_cost: Money::new(d("11.50")),
                },
            ]
        );
    }

    #[test]
    fn sub_recipes_scaled_by_share_of_yield() {
        let mut pantry = Pantry::new();
        let (tomato, onion, salt) = (pantry.tomato, pantry.onion, pantry.salt);
        let base = pantry.recipe("Base", "4", &[(salt, "8")]);
        let sauce = pantry.recipe("Sauce", "2", &[(tomato, "2")]);
        let pasta = pantry.recipe("Pasta", "1", &[(onion, "0.1")]);
        pantry.nest(sauce, base, "1");
        pantry.nest(pasta, sauce, "0.5");

        let mut dinner = event(4);
        dinner.add_menu_item(MenuItem::new(pasta, d("0.5")));

        // pasta scale 2; sauce scale 2 × 0.5 / 2 = 0.5; base scale 0.5 × 1 / 4 = 0.125
        let full = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        let names: Vec<_> = full.iter().map(|row| row.ingredient.as_str()).collect();
        assert_eq!(names, ["Onion", "Salt", "Tomato"]);
        assert_eq!(full[0].quantity, d("0.200"));
        assert_eq!(full[1].quantity, d("1.000"));
        assert_eq!(full[1].unit, Unit::Gram);
        assert_eq!(full[2].quantity, d("1.000"));

        let direct = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Direct).unwrap();
        let names: Vec<_> = direct.iter().map(|row| row.ingredient.as_str()).collect();
        assert_eq!(names, ["Onion", "Tomato"]);
    }

    #[test]
    fn zero_yield_guards() {
        let mut pantry = Pantry::new();
        let (tomato, onion) = (pantry.tomato, pantry.onion);
        let stock = pantry.recipe("Stock", "0", &[(onion, "1")]);
        let soup = pantry.recipe("Soup", "0", &[(tomato, "1.5")]);
        pantry.nest(soup, stock, "1");

        let mut dinner = event(2);
        dinner.add_menu_item(MenuItem::new(soup, d("1")));

        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        assert_eq!(rows[0].ingredient, "Onion");
        assert_eq!(rows[0].quantity, Decimal::ZERO);
        assert_eq!(rows[0].total_cost, Money::ZERO);
        assert_eq!(rows[1].quantity, d("3.000"));
    }

    #[test]
    fn missing_quantity_counts_as_zero() {
        let mut pantry = Pantry::new();
        let mut recipe = Recipe::new("Dressing", Uuid::new_v4(), d("1"), Unit::Kilogram);
        recipe.add_item(RecipeItem::new(pantry.salt, Unit::ToTaste));
        let recipe = pantry.catalog.insert_recipe(recipe);

        let mut dinner = event(3);
        dinner.add_menu_item(MenuItem::new(recipe, d("1")));

        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, Decimal::ZERO);
    }

    #[test]
    fn quantities_round_half_up() {
        let mut pantry = Pantry::new();
        let tomato = pantry.tomato;
        let sauce = pantry.recipe("Sauce", "3", &[(tomato, "0.0015")]);

        let mut dinner = event(3);
        dinner.add_menu_item(MenuItem::new(sauce, d("1")));

        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        assert_eq!(rows[0].quantity, d("0.002"));
        assert_eq!(rows[0].total_cost, Money::new(d("0.01")));
    }

    #[test]
    fn cyclic_sub_recipes_fail_in_full_depth() {
        let mut pantry = Pantry::new();
        let tomato = pantry.tomato;
        let a = pantry.recipe("A", "1", &[(tomato, "1")]);
        let b = pantry.recipe("B", "1", &[(tomato, "1")]);
        pantry.nest(a, b, "1");
        pantry.nest(b, a, "1");

        let mut dinner = event(1);
        dinner.add_menu_item(MenuItem::new(a, d("1")));

        assert_eq!(
            shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full),
            Err(EngineError::CyclicRecipeGraph("A -> B -> A".to_string()))
        );
        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Direct).unwrap();
        assert_eq!(rows[0].quantity, d("2.000"));
    }

    #[test]
    fn self_referencing_recipe_in_direct_depth_expands_one_level() {
        let mut pantry = Pantry::new();
        let tomato = pantry.tomato;
        let a = pantry.recipe("A", "1", &[(tomato, "1")]);
        pantry.nest(a, a, "1");

        let mut dinner = event(1);
        dinner.add_menu_item(MenuItem::new(a, d("1")));

        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Direct).unwrap();
        assert_eq!(rows[0].quantity, d("2.000"));
        assert_eq!(rows[0].total_cost, Money::new(d("10.00")));
        assert_eq!(
            shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full),
            Err(EngineError::CyclicRecipeGraph("A -> A".to_string()))
        );
    }

    #[test]
    fn cost_uses_unrounded_quantity() {
        let mut pantry = Pantry::new();
        let saffron = pantry
            .catalog
            .insert_ingredient(Ingredient::new("Saffron", Unit::Kilogram, d("2000.0000")));
        let rice = pantry.recipe("Paella", "1", &[(saffron, "0.001")]);

        let mut dinner = event(2);
        dinner.add_menu_item(MenuItem::new(rice, d("0.2")));

        // 0.2 × 2 / 1 = 0.4 -> 0.0004 kg, shown as 0.000 but costed 0.80
        let rows = shopping_list(&pantry.catalog, &dinner, SubRecipeDepth::Full).unwrap();
        assert_eq!(rows[0].quantity, d("0.000"));
        assert_eq!(rows[0].total_cost, Money::new(d("0.80")));
    }
}
