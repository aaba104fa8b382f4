//! The module contains the `Recipe` (technical sheet) struct and its table.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, RecipeComponent, RecipeItem, Unit,
    money::round_half_up,
    util::{decimal_text, parse_decimal, parse_optional_decimal, parse_unit},
};

/// A recipe.
///
/// Owns its ordered line items and sub-recipe components. A recipe can be
/// used as a component by many parents; it is shared, not owned.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    /// Kitchen discipline, e.g. "Cold kitchen" or "Bakery".
    pub discipline: String,
    pub cooking_method: String,
    pub cooking_time_min: u32,
    pub prep_time_min: u32,
    pub photo: Option<String>,
    pub preparation: String,
    pub notes: String,
    /// Total quantity produced, expressed in `yield_unit`.
    pub yield_total: Decimal,
    pub yield_unit: Unit,
    /// Quantity of one serving, in `yield_unit`.
    pub portion_weight: Option<Decimal>,
    pub items: Vec<RecipeItem>,
    pub components: Vec<RecipeComponent>,
}

impl Recipe {
    pub fn new(
        title: impl Into<String>,
        category_id: Uuid,
        yield_total: Decimal,
        yield_unit: Unit,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category_id,
            discipline: String::new(),
            cooking_method: String::new(),
            cooking_time_min: 0,
            prep_time_min: 0,
            photo: None,
            preparation: String::new(),
            notes: String::new(),
            yield_total,
            yield_unit,
            portion_weight: None,
            items: Vec::new(),
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_portion_weight(mut self, portion_weight: Decimal) -> Self {
        self.portion_weight = Some(portion_weight);
        self
    }

    /// Append a line item, attaching it to this recipe.
    pub fn add_item(&mut self, mut item: RecipeItem) -> &RecipeItem {
        item.recipe_id = self.id;
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Append a sub-recipe component, attaching it to this recipe.
    pub fn add_component(&mut self, mut component: RecipeComponent) -> &RecipeComponent {
        component.recipe_id = self.id;
        self.components.push(component);
        &self.components[self.components.len() - 1]
    }

    /// Number of servings: `yield_total / portion_weight`, rounded to 2
    /// places. `None` without a positive portion weight.
    #[must_use]
    pub fn portion_count(&self) -> Option<Decimal> {
        self.portion_weight
            .filter(|weight| *weight > Decimal::ZERO)
            .map(|weight| round_half_up(self.yield_total / weight, 2))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    pub discipline: String,
    pub cooking_method: String,
    pub cooking_time_min: i32,
    pub prep_time_min: i32,
    pub photo: Option<String>,
    pub preparation: String,
    pub notes: String,
    pub yield_total: String,
    pub yield_unit: String,
    pub portion_weight: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::recipe_items::Entity")]
    Items,
    #[sea_orm(has_many = "super::recipe_components::Entity")]
    Components,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::recipe_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::recipe_components::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build a recipe from its row; items and components are loaded separately.
impl TryFrom<Model> for Recipe {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            category_id: value.category_id,
            cooking_time_min: u32::try_from(value.cooking_time_min).unwrap_or_default(),
            prep_time_min: u32::try_from(value.prep_time_min).unwrap_or_default(),
            yield_total: parse_decimal(&value.yield_total, "recipe yield")?,
            yield_unit: parse_unit(&value.yield_unit)?,
            portion_weight: parse_optional_decimal(
                value.portion_weight.as_deref(),
                "portion weight",
            )?,
            title: value.title,
            discipline: value.discipline,
            cooking_method: value.cooking_method,
            photo: value.photo,
            preparation: value.preparation,
            notes: value.notes,
            items: Vec::new(),
            components: Vec::new(),
        })
    }
}

impl From<&Recipe> for ActiveModel {
    fn from(value: &Recipe) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            title: ActiveValue::Set(value.title.clone()),
            category_id: ActiveValue::Set(value.category_id),
            discipline: ActiveValue::Set(value.discipline.clone()),
            cooking_method: ActiveValue::Set(value.cooking_method.clone()),
            cooking_time_min: ActiveValue::Set(
                i32::try_from(value.cooking_time_min).unwrap_or(i32::MAX),
            ),
            prep_time_min: ActiveValue::Set(i32::try_from(value.prep_time_min).unwrap_or(i32::MAX)),
            photo: ActiveValue::Set(value.photo.clone()),
            preparation: ActiveValue::Set(value.preparation.clone()),
            notes: ActiveValue::Set(value.notes.clone()),
            yield_total: ActiveValue::Set(decimal_text(value.yield_total)),
            yield_unit: ActiveValue::Set(value.yield_unit.code().to_string()),
            portion_weight: ActiveValue::Set(value.portion_weight.map(decimal_text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn portion_count_needs_positive_portion_weight() {
        let recipe = Recipe::new("Sauce", Uuid::new_v4(), d("2.000"), Unit::Kilogram);
        assert_eq!(recipe.portion_count(), None);

        let zero = recipe.clone().with_portion_weight(Decimal::ZERO);
        assert_eq!(zero.portion_count(), None);

        let halves = recipe.clone().with_portion_weight(d("0.5"));
        assert_eq!(halves.portion_count(), Some(d("4.00")));

        let thirds = recipe.with_portion_weight(d("0.3"));
        assert_eq!(thirds.portion_count(), Some(d("6.67")));
    }

    #[test]
    fn added_lines_are_attached_to_the_recipe() {
        let mut recipe = Recipe::new("Sauce", Uuid::new_v4(), d("1"), Unit::Kilogram);
        let item_recipe = recipe
            .add_item(RecipeItem::new(Uuid::new_v4(), Unit::Kilogram))
            .recipe_id;
        let component_recipe = recipe
            .add_component(RecipeComponent::new(
                Uuid::new_v4(),
                d("1"),
                Unit::Kilogram,
            ))
            .recipe_id;
        assert_eq!(item_recipe, recipe.id);
        assert_eq!(component_recipe, recipe.id);
    }
}
