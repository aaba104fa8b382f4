//! Menu items: a recipe served at an event.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError,
    util::{decimal_text, parse_decimal},
};

/// A recipe on an event's menu, served `portions_per_person` times per guest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub event_id: Uuid,
    pub recipe_id: Uuid,
    pub portions_per_person: Decimal,
    pub photo: Option<String>,
}

impl MenuItem {
    pub fn new(recipe_id: Uuid, portions_per_person: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            recipe_id,
            portions_per_person,
            photo: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub position: i32,
    pub recipe_id: Uuid,
    pub portions_per_person: String,
    pub photo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipe,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MenuItem {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            event_id: value.event_id,
            recipe_id: value.recipe_id,
            portions_per_person: parse_decimal(&value.portions_per_person, "portions per person")?,
            photo: value.photo,
        })
    }
}

impl From<&MenuItem> for ActiveModel {
    fn from(value: &MenuItem) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            event_id: ActiveValue::Set(value.event_id),
            position: ActiveValue::NotSet,
            recipe_id: ActiveValue::Set(value.recipe_id),
            portions_per_person: ActiveValue::Set(decimal_text(value.portions_per_person)),
            photo: ActiveValue::Set(value.photo.clone()),
        }
    }
}
