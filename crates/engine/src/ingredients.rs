//! The module contains the `Ingredient` struct and its table.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Unit,
    util::{decimal_text, parse_decimal, parse_unit},
};

/// An ingredient.
///
/// The ingredient is the cost basis of every derived value: a recipe line
/// converts its quantity into `base_unit` and multiplies by `cost_per_unit`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ingredient {
    /// Stable identifier for this ingredient.
    pub id: Uuid,
    /// Unique (under name normalization) display name.
    pub name: String,
    pub base_unit: Unit,
    /// Cost of one `base_unit`, up to 4 decimals.
    pub cost_per_unit: Decimal,
    pub photo: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, base_unit: Unit, cost_per_unit: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_unit,
            cost_per_unit,
            photo: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
    pub base_unit: String,
    pub cost_per_unit: String,
    pub photo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_items::Entity")]
    RecipeItems,
}

impl Related<super::recipe_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Ingredient {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            base_unit: parse_unit(&value.base_unit)?,
            cost_per_unit: parse_decimal(&value.cost_per_unit, "ingredient cost")?,
            name: value.name,
            photo: value.photo,
        })
    }
}

impl From<&Ingredient> for ActiveModel {
    fn from(value: &Ingredient) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::NotSet,
            base_unit: ActiveValue::Set(value.base_unit.code().to_string()),
            cost_per_unit: ActiveValue::Set(decimal_text(value.cost_per_unit)),
            photo: ActiveValue::Set(value.photo.clone()),
        }
    }
}
