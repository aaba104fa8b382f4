//! Recipe cost engine.
//!
//! Ingredient cost → line cost → recipe cost → cost per portion, recursing
//! through sub-recipes. Everything here is a pure function of a [`Catalog`]
//! snapshot and a [`ConversionTable`]; nothing is cached, so computing the
//! same value twice on the same snapshot gives the same result.
//!
//! Unit mismatches are absorbed, never surfaced:
//! - a line item whose unit has no direct factor to the ingredient's base
//!   unit is costed as if already in the base unit (a warning is logged and
//!   the line is flagged in the [`RecipeCostSheet`]);
//! - a component whose unit has no direct factor to the sub-recipe's yield
//!   unit contributes 0.00.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Catalog, ConversionTable, EngineError, Ingredient, Money, Recipe, RecipeComponent, RecipeItem,
    ResultEngine, Unit,
};

/// Costing context: a conversion table and the snapshot to read from.
#[derive(Clone, Copy, Debug)]
pub struct Costing<'a> {
    pub(crate) conversions: &'a ConversionTable,
    pub(crate) catalog: &'a Catalog,
}

/// Cost of one recipe line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineCost {
    pub cost: Money,
    /// The unit had no direct conversion and the quantity was taken 1:1.
    pub fallback: bool,
}

impl LineCost {
    const NOT_COSTED: LineCost = LineCost {
        cost: Money::ZERO,
        fallback: false,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineCostEntry {
    pub item_id: Uuid,
    pub ingredient: String,
    pub unit: Unit,
    pub base_unit: Unit,
    pub net_quantity: Option<Decimal>,
    pub household_measure: String,
    pub cost: Money,
    pub fallback: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentCostEntry {
    pub component_id: Uuid,
    pub sub_recipe_id: Uuid,
    pub sub_recipe: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub cost: Money,
}

/// The technical sheet of a recipe with every derived value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeCostSheet {
    pub recipe_id: Uuid,
    pub title: String,
    pub yield_total: Decimal,
    pub yield_unit: Unit,
    pub portion_weight: Option<Decimal>,
    pub lines: Vec<LineCostEntry>,
    pub components: Vec<ComponentCostEntry>,
    pub total_cost: Money,
    pub portion_count: Option<Decimal>,
    pub cost_per_portion: Option<Money>,
    pub warnings: Vec<String>,
}

impl<'a> Costing<'a> {
    pub fn new(conversions: &'a ConversionTable, catalog: &'a Catalog) -> Self {
        Self {
            conversions,
            catalog,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Cost of a recipe line, rounded to 2 places.
    ///
    /// "To taste" lines and lines without any recorded quantity cost 0.00.
    pub fn line_cost(&self, item: &RecipeItem) -> ResultEngine<LineCost> {
        let ingredient = self.catalog.ingredient(item.ingredient_id)?;
        Ok(self.line_cost_for(item, ingredient))
    }

    fn line_cost_for(&self, item: &RecipeItem, ingredient: &Ingredient) -> LineCost {
        if item.unit == Unit::ToTaste {
            return LineCost::NOT_COSTED;
        }
        let Some(quantity) = item.net_quantity() else {
            return LineCost::NOT_COSTED;
        };

        let (base_quantity, fallback) = if item.unit == ingredient.base_unit {
            (quantity, false)
        } else {
            match self.conversions.convert_ingredient(
                quantity,
                item.unit,
                ingredient.base_unit,
                &ingredient.name,
            ) {
                Ok(converted) => (converted, false),
                Err(err) => {
                    tracing::warn!(
                        ingredient = %ingredient.name,
                        recipe_id = %item.recipe_id,
                        "{err}; costing {quantity} {} as {}",
                        item.unit,
                        ingredient.base_unit
                    );
                    (quantity, true)
                }
            }
        };

        LineCost {
            cost: Money::new(base_quantity * ingredient.cost_per_unit),
            fallback,
        }
    }

    /// Cost of the share of a sub-recipe used by its parent.
    pub fn component_cost(&self, component: &RecipeComponent) -> ResultEngine<Money> {
        let mut path = vec![component.recipe_id];
        self.component_cost_on_path(component, &mut path)
    }

    /// Sum of line and component costs, rounded to 2 places.
    ///
    /// Fails with [`EngineError::CyclicRecipeGraph`] when the recipe
    /// contains itself through its components.
    pub fn total_cost(&self, recipe: &Recipe) -> ResultEngine<Money> {
        let mut path = Vec::new();
        self.total_cost_on_path(recipe, &mut path)
    }

    /// `total_cost / portion_count`, `None` when the portion count is not
    /// defined or not positive.
    pub fn cost_per_portion(&self, recipe: &Recipe) -> ResultEngine<Option<Money>> {
        let Some(portions) = recipe.portion_count() else {
            return Ok(None);
        };
        Ok(self.total_cost(recipe)?.per(portions))
    }

    /// Build the full technical sheet of `recipe`.
    pub fn cost_sheet(&self, recipe: &Recipe) -> ResultEngine<RecipeCostSheet> {
        let mut warnings = Vec::new();

        let mut lines = Vec::with_capacity(recipe.items.len());
        for item in &recipe.items {
            let ingredient = self.catalog.ingredient(item.ingredient_id)?;
            let line = self.line_cost_for(item, ingredient);
            if line.fallback {
                warnings.push(format!(
                    "{}: no conversion from {} to {}, quantity costed as {}",
                    ingredient.name, item.unit, ingredient.base_unit, ingredient.base_unit
                ));
            }
            lines.push(LineCostEntry {
                item_id: item.id,
                ingredient: ingredient.name.clone(),
                unit: item.unit,
                base_unit: ingredient.base_unit,
                net_quantity: item.net_quantity(),
                household_measure: item.household_measure.clone(),
                cost: line.cost,
                fallback: line.fallback,
            });
        }

        let mut components = Vec::with_capacity(recipe.components.len());
        for component in &recipe.components {
            let sub = self.catalog.recipe(component.sub_recipe_id)?;
            if self.component_quantity(component, sub).is_none() {
                warnings.push(format!(
                    "{}: no conversion from {} to {}, component not costed",
                    sub.title, component.unit, sub.yield_unit
                ));
            }
            let mut path = vec![recipe.id];
            components.push(ComponentCostEntry {
                component_id: component.id,
                sub_recipe_id: sub.id,
                sub_recipe: sub.title.clone(),
                quantity: component.quantity,
                unit: component.unit,
                cost: self.component_cost_on_path(component, &mut path)?,
            });
        }

        let total_cost = Money::new(
            lines
                .iter()
                .map(|line| line.cost)
                .chain(components.iter().map(|component| component.cost))
                .sum::<Money>()
                .amount(),
        );
        let portion_count = recipe.portion_count();
        let cost_per_portion = portion_count.and_then(|portions| total_cost.per(portions));

        Ok(RecipeCostSheet {
            recipe_id: recipe.id,
            title: recipe.title.clone(),
            yield_total: recipe.yield_total,
            yield_unit: recipe.yield_unit,
            portion_weight: recipe.portion_weight,
            lines,
            components,
            total_cost,
            portion_count,
            cost_per_portion,
            warnings,
        })
    }

    fn total_cost_on_path(&self, recipe: &Recipe, path: &mut Vec<Uuid>) -> ResultEngine<Money> {
        if path.contains(&recipe.id) {
            return Err(cycle_error(self.catalog, path, recipe.id));
        }
        path.push(recipe.id);

        let mut total = Money::ZERO;
        for item in &recipe.items {
            total += self.line_cost(item)?.cost;
        }
        for component in &recipe.components {
            total += self.component_cost_on_path(component, path)?;
        }

        path.pop();
        Ok(Money::new(total.amount()))
    }

    fn component_cost_on_path(
        &self,
        component: &RecipeComponent,
        path: &mut Vec<Uuid>,
    ) -> ResultEngine<Money> {
        let sub = self.catalog.recipe(component.sub_recipe_id)?;
        if path.contains(&sub.id) {
            return Err(cycle_error(self.catalog, path, sub.id));
        }

        let Some(quantity) = self.component_quantity(component, sub) else {
            return Ok(Money::ZERO);
        };
        if quantity.is_zero() || sub.yield_total.is_zero() {
            return Ok(Money::ZERO);
        }

        let fraction = quantity / sub.yield_total;
        Ok(self.total_cost_on_path(sub, path)?.scale(fraction))
    }

    /// Component quantity in the sub-recipe's yield unit. No lenient
    /// fallback here: the fraction of yield needs matching units.
    fn component_quantity(&self, component: &RecipeComponent, sub: &Recipe) -> Option<Decimal> {
        match self
            .conversions
            .convert(component.quantity, component.unit, sub.yield_unit)
        {
            Ok(quantity) => Some(quantity),
            Err(_) if component.unit == sub.yield_unit => Some(component.quantity),
            Err(_) => None,
        }
    }
}

pub(crate) fn cycle_error(catalog: &Catalog, path: &[Uuid], repeated: Uuid) -> EngineError {
    let title = |id: &Uuid| {
        catalog
            .recipes
            .get(id)
            .map_or_else(|| id.to_string(), |recipe| recipe.title.clone())
    };
    let start = path.iter().position(|id| *id == repeated).unwrap_or(0);
    let chain = path[start..]
        .iter()
        .chain(std::iter::once(&repeated))
        .map(title)
        .collect::<Vec<_>>()
        .join(" -> ");
    EngineError::CyclicRecipeGraph(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ingredient, RecipeComponent, RecipeItem};

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn money(value: &str) -> Money {
        Money::new(d(value))
    }

    struct Kitchen {
        catalog: Catalog,
        table: ConversionTable,
        tomato: Uuid,
        category: Uuid,
    }

    impl Kitchen {
        fn new() -> Self {
            let mut catalog = Catalog::new();
            let tomato =
                catalog.insert_ingredient(Ingredient::new("Tomato", Unit::Kilogram, d("5.00")));
            Self {
                catalog,
                table: ConversionTable::standard(),
                tomato,
                category: Uuid::new_v4(),
            }
        }

        fn costing(&self) -> Costing<'_> {
            Costing::new(&self.table, &self.catalog)
        }

        /// "Sauce": 2 kg tomato, yields 2 kg, 0.5 kg portions.
        fn sauce(&mut self) -> Uuid {
            let mut sauce = Recipe::new("Sauce", self.category, d("2.000"), Unit::Kilogram)
                .with_portion_weight(d("0.5"));
            sauce.add_item(RecipeItem::new(self.tomato, Unit::Kilogram).with_net_weight(d("2.000")));
            self.catalog.insert_recipe(sauce)
        }

        fn recipe(&self, id: Uuid) -> &Recipe {
            self.catalog.recipe(id).unwrap()
        }
    }

    #[test]
    fn sauce_costs_ten_with_four_portions() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let costing = kitchen.costing();
        let recipe = kitchen.recipe(sauce);

        assert_eq!(costing.total_cost(recipe).unwrap(), money("10.00"));
        assert_eq!(recipe.portion_count(), Some(d("4.00")));
        assert_eq!(costing.cost_per_portion(recipe).unwrap(), Some(money("2.50")));
    }

    #[test]
    fn sub_recipe_costed_by_fraction_of_yield() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let mut pasta = Recipe::new("Pasta Dish", kitchen.category, d("1"), Unit::Kilogram);
        pasta.add_component(RecipeComponent::new(sauce, d("1.000"), Unit::Kilogram));
        let pasta = kitchen.catalog.insert_recipe(pasta);

        let costing = kitchen.costing();
        let recipe = kitchen.recipe(pasta);
        assert_eq!(
            costing.component_cost(&recipe.components[0]).unwrap(),
            money("5.00")
        );
        assert_eq!(costing.total_cost(recipe).unwrap(), money("5.00"));
    }

    #[test]
    fn component_converted_to_yield_unit() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let mut pasta = Recipe::new("Pasta Dish", kitchen.category, d("1"), Unit::Kilogram);
        pasta.add_component(RecipeComponent::new(sauce, d("500"), Unit::Gram));
        let pasta = kitchen.catalog.insert_recipe(pasta);

        let costing = kitchen.costing();
        assert_eq!(
            costing.total_cost(kitchen.recipe(pasta)).unwrap(),
            money("2.50")
        );
    }

    #[test]
    fn line_cost_converts_to_base_unit() {
        let kitchen = Kitchen::new();
        let costing = kitchen.costing();
        let item = RecipeItem::new(kitchen.tomato, Unit::Gram).with_net_weight(d("250"));
        assert_eq!(
            costing.line_cost(&item).unwrap(),
            LineCost {
                cost: money("1.25"),
                fallback: false
            }
        );
    }

    #[test]
    fn unmapped_line_unit_falls_back_to_base_unit() {
        let kitchen = Kitchen::new();
        let costing = kitchen.costing();
        let item = RecipeItem::new(kitchen.tomato, Unit::Cup).with_net_weight(d("3"));
        assert_eq!(
            costing.line_cost(&item).unwrap(),
            LineCost {
                cost: money("15.00"),
                fallback: true
            }
        );
    }

    #[test]
    fn unmapped_component_unit_contributes_nothing() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let mut pasta = Recipe::new("Pasta Dish", kitchen.category, d("1"), Unit::Kilogram);
        pasta.add_component(RecipeComponent::new(sauce, d("3"), Unit::Cup));
        let pasta = kitchen.catalog.insert_recipe(pasta);

        let costing = kitchen.costing();
        let recipe = kitchen.recipe(pasta);
        assert_eq!(
            costing.component_cost(&recipe.components[0]).unwrap(),
            Money::ZERO
        );

        let sheet = costing.cost_sheet(recipe).unwrap();
        assert_eq!(sheet.total_cost, Money::ZERO);
        assert_eq!(sheet.warnings.len(), 1);
    }

    #[test]
    fn to_taste_and_empty_lines_cost_nothing() {
        let kitchen = Kitchen::new();
        let costing = kitchen.costing();
        let to_taste = RecipeItem::new(kitchen.tomato, Unit::ToTaste).with_net_weight(d("1"));
        let empty = RecipeItem::new(kitchen.tomato, Unit::Kilogram);
        assert_eq!(costing.line_cost(&to_taste).unwrap().cost, Money::ZERO);
        assert_eq!(costing.line_cost(&empty).unwrap().cost, Money::ZERO);
    }

    #[test]
    fn piece_weight_approximation() {
        let mut kitchen = Kitchen::new();
        let onion = kitchen
            .catalog
            .insert_ingredient(Ingredient::new("Cebola", Unit::Kilogram, d("4.00")));
        let costing = kitchen.costing();
        let item = RecipeItem::new(onion, Unit::Piece).with_net_weight(d("2"));
        // 2 onions ≈ 0.300 kg
        assert_eq!(costing.line_cost(&item).unwrap().cost, money("1.20"));
    }

    #[test]
    fn total_cost_is_order_invariant() {
        let mut kitchen = Kitchen::new();
        let oil = kitchen
            .catalog
            .insert_ingredient(Ingredient::new("Olive oil", Unit::Liter, d("32.9000")));
        let sauce = kitchen.sauce();

        let mut forward = Recipe::new("Dish", kitchen.category, d("1"), Unit::Kilogram);
        forward.add_item(RecipeItem::new(oil, Unit::Milliliter).with_net_weight(d("45")));
        forward.add_item(
            RecipeItem::new(kitchen.tomato, Unit::Gram)
                .with_gross_weight(d("333"))
                .with_correction_factor(d("1.1")),
        );
        forward.add_component(RecipeComponent::new(sauce, d("0.333"), Unit::Kilogram));

        let mut backward = forward.clone();
        backward.id = Uuid::new_v4();
        backward.items.reverse();
        backward.components.reverse();

        let forward = kitchen.catalog.insert_recipe(forward);
        let backward = kitchen.catalog.insert_recipe(backward);
        let costing = kitchen.costing();

        let forward_total = costing.total_cost(kitchen.recipe(forward)).unwrap();
        let backward_total = costing.total_cost(kitchen.recipe(backward)).unwrap();
        assert_eq!(forward_total, backward_total);

        let recipe = kitchen.recipe(forward);
        let lines: Money = recipe
            .items
            .iter()
            .map(|item| costing.line_cost(item).unwrap().cost)
            .sum();
        let components: Money = recipe
            .components
            .iter()
            .map(|component| costing.component_cost(component).unwrap())
            .sum();
        assert_eq!(forward_total, lines + components);
    }

    #[test]
    fn zero_yield_sub_recipe_contributes_nothing() {
        let mut kitchen = Kitchen::new();
        let mut stock = Recipe::new("Stock", kitchen.category, Decimal::ZERO, Unit::Liter);
        stock.add_item(RecipeItem::new(kitchen.tomato, Unit::Kilogram).with_net_weight(d("1")));
        let stock = kitchen.catalog.insert_recipe(stock);
        let mut soup = Recipe::new("Soup", kitchen.category, d("1"), Unit::Liter);
        soup.add_component(RecipeComponent::new(stock, d("1"), Unit::Liter));
        let soup = kitchen.catalog.insert_recipe(soup);

        let costing = kitchen.costing();
        assert_eq!(costing.total_cost(kitchen.recipe(soup)).unwrap(), Money::ZERO);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut kitchen = Kitchen::new();
        let mut a = Recipe::new("A", kitchen.category, d("1"), Unit::Kilogram);
        let mut b = Recipe::new("B", kitchen.category, d("1"), Unit::Kilogram);
        a.add_component(RecipeComponent::new(b.id, d("1"), Unit::Kilogram));
        b.add_component(RecipeComponent::new(a.id, d("1"), Unit::Kilogram));
        let a = kitchen.catalog.insert_recipe(a);
        kitchen.catalog.insert_recipe(b);

        let costing = kitchen.costing();
        assert_eq!(
            costing.total_cost(kitchen.recipe(a)),
            Err(EngineError::CyclicRecipeGraph("A -> B -> A".to_string()))
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut kitchen = Kitchen::new();
        let mut a = Recipe::new("A", kitchen.category, d("1"), Unit::Kilogram);
        a.add_component(RecipeComponent::new(a.id, d("1"), Unit::Kilogram));
        let a = kitchen.catalog.insert_recipe(a);

        let costing = kitchen.costing();
        let recipe = kitchen.recipe(a);
        assert!(matches!(
            costing.component_cost(&recipe.components[0]),
            Err(EngineError::CyclicRecipeGraph(_))
        ));
    }

    #[test]
    fn shared_sub_recipe_is_not_a_cycle() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let mut dish = Recipe::new("Dish", kitchen.category, d("1"), Unit::Kilogram);
        dish.add_component(RecipeComponent::new(sauce, d("1"), Unit::Kilogram));
        dish.add_component(RecipeComponent::new(sauce, d("0.5"), Unit::Kilogram));
        let dish = kitchen.catalog.insert_recipe(dish);

        let costing = kitchen.costing();
        assert_eq!(
            costing.total_cost(kitchen.recipe(dish)).unwrap(),
            money("7.50")
        );
    }

    #[test]
    fn missing_ingredient_is_not_found() {
        let kitchen = Kitchen::new();
        let costing = kitchen.costing();
        let item = RecipeItem::new(Uuid::new_v4(), Unit::Kilogram).with_net_weight(d("1"));
        assert!(matches!(
            costing.line_cost(&item),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn recomputing_is_idempotent() {
        let mut kitchen = Kitchen::new();
        let sauce = kitchen.sauce();
        let costing = kitchen.costing();
        let recipe = kitchen.recipe(sauce);
        let first = costing.cost_sheet(recipe).unwrap();
        let second = costing.cost_sheet(recipe).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_cost, costing.total_cost(recipe).unwrap());
    }
}
