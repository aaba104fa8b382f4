//! Sub-recipe components: another recipe's yield used as an ingredient.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Unit,
    util::{decimal_text, parse_decimal, parse_unit},
};

/// `quantity` (in `unit`) of the sub-recipe's yield used by the parent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeComponent {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub sub_recipe_id: Uuid,
    pub quantity: Decimal,
    pub unit: Unit,
}

impl RecipeComponent {
    pub fn new(sub_recipe_id: Uuid, quantity: Decimal, unit: Unit) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_id: Uuid::nil(),
            sub_recipe_id,
            quantity,
            unit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_components")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub position: i32,
    pub sub_recipe_id: Uuid,
    pub quantity: String,
    pub unit: String,
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
        belongs_to = "super::recipes::Entity",
        from = "Column::SubRecipeId",
        to = "super::recipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    SubRecipe,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RecipeComponent {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            recipe_id: value.recipe_id,
            sub_recipe_id: value.sub_recipe_id,
            quantity: parse_decimal(&value.quantity, "component quantity")?,
            unit: parse_unit(&value.unit)?,
        })
    }
}

impl From<&RecipeComponent> for ActiveModel {
    fn from(value: &RecipeComponent) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            recipe_id: ActiveValue::Set(value.recipe_id),
            position: ActiveValue::NotSet,
            sub_recipe_id: ActiveValue::Set(value.sub_recipe_id),
            quantity: ActiveValue::Set(decimal_text(value.quantity)),
            unit: ActiveValue::Set(value.unit.code().to_string()),
        }
    }
}
