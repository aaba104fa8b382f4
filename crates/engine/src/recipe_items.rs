//! Recipe line items: one ingredient used by a recipe.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Unit,
    money::round_quantity,
    util::{decimal_text, parse_optional_decimal, parse_unit},
};

/// One ingredient line of a recipe.
///
/// Weights are expressed in `unit`. Gross is the as-purchased quantity, the
/// correction factor accounts for trim loss and net is the usable quantity
/// that gets costed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeItem {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub unit: Unit,
    pub gross_weight: Option<Decimal>,
    pub net_weight: Option<Decimal>,
    pub correction_factor: Option<Decimal>,
    /// Free text such as "2 cups"; informative only.
    pub household_measure: String,
}

impl RecipeItem {
    pub fn new(ingredient_id: Uuid, unit: Unit) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_id: Uuid::nil(),
            ingredient_id,
            unit,
            gross_weight: None,
            net_weight: None,
            correction_factor: None,
            household_measure: String::new(),
        }
    }

    #[must_use]
    pub fn with_net_weight(mut self, net_weight: Decimal) -> Self {
        self.net_weight = Some(net_weight);
        self
    }

    #[must_use]
    pub fn with_gross_weight(mut self, gross_weight: Decimal) -> Self {
        self.gross_weight = Some(gross_weight);
        self
    }

    #[must_use]
    pub fn with_correction_factor(mut self, correction_factor: Decimal) -> Self {
        self.correction_factor = Some(correction_factor);
        self
    }

    #[must_use]
    pub fn with_household_measure(mut self, label: impl Into<String>) -> Self {
        self.household_measure = label.into();
        self
    }

    /// Usable quantity, in `unit`.
    ///
    /// Net weight when recorded; otherwise gross × correction factor rounded
    /// to 3 places (a zero factor counts as missing); otherwise gross.
    #[must_use]
    pub fn net_quantity(&self) -> Option<Decimal> {
        if let Some(net) = self.net_weight {
            return Some(net);
        }
        match (self.gross_weight, self.correction_factor) {
            (Some(gross), Some(factor)) if !factor.is_zero() => Some(round_quantity(gross * factor)),
            (gross, _) => gross,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub position: i32,
    pub ingredient_id: Uuid,
    pub unit: String,
    pub gross_weight: Option<String>,
    pub net_weight: Option<String>,
    pub correction_factor: Option<String>,
    pub household_measure: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipe,
    #[sea_orm(
        belongs_to = "super::ingredients::Entity",
        from = "Column::IngredientId",
        to = "super::ingredients::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Ingredient,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RecipeItem {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            recipe_id: value.recipe_id,
            ingredient_id: value.ingredient_id,
            unit: parse_unit(&value.unit)?,
            gross_weight: parse_optional_decimal(value.gross_weight.as_deref(), "gross weight")?,
            net_weight: parse_optional_decimal(value.net_weight.as_deref(), "net weight")?,
            correction_factor: parse_optional_decimal(
                value.correction_factor.as_deref(),
                "correction factor",
            )?,
            household_measure: value.household_measure,
        })
    }
}

impl From<&RecipeItem> for ActiveModel {
    fn from(value: &RecipeItem) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            recipe_id: ActiveValue::Set(value.recipe_id),
            position: ActiveValue::NotSet,
            ingredient_id: ActiveValue::Set(value.ingredient_id),
            unit: ActiveValue::Set(value.unit.code().to_string()),
            gross_weight: ActiveValue::Set(value.gross_weight.map(decimal_text)),
            net_weight: ActiveValue::Set(value.net_weight.map(decimal_text)),
            correction_factor: ActiveValue::Set(value.correction_factor.map(decimal_text)),
            household_measure: ActiveValue::Set(value.household_measure.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn item() -> RecipeItem {
        RecipeItem::new(Uuid::new_v4(), Unit::Kilogram)
    }

    #[test]
    fn net_weight_wins() {
        let item = item()
            .with_net_weight(d("0.800"))
            .with_gross_weight(d("1.000"))
            .with_correction_factor(d("0.5"));
        assert_eq!(item.net_quantity(), Some(d("0.800")));
    }

    #[test]
    fn gross_times_correction_factor() {
        let item = item()
            .with_gross_weight(d("1.235"))
            .with_correction_factor(d("0.85"));
        // 1.04975 rounds half-up to 3 places
        assert_eq!(item.net_quantity(), Some(d("1.050")));
    }

    #[test]
    fn gross_alone_or_with_zero_factor() {
        assert_eq!(
            item().with_gross_weight(d("2")).net_quantity(),
            Some(d("2"))
        );
        assert_eq!(
            item()
                .with_gross_weight(d("2"))
                .with_correction_factor(Decimal::ZERO)
                .net_quantity(),
            Some(d("2"))
        );
    }

    #[test]
    fn nothing_recorded() {
        assert_eq!(item().net_quantity(), None);
        assert_eq!(
            item().with_correction_factor(d("0.9")).net_quantity(),
            None
        );
    }
}
