//! The module contains the `Event` (catering job) struct and its table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, MenuItem, Money, StaffParticipation,
    util::{decimal_text, parse_decimal},
};

/// Default profit margin, in percent.
pub const DEFAULT_PROFIT_MARGIN_PERCENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// A catered event.
///
/// Aggregates a menu (recipes served per guest) and the staff hired for the
/// job into one priced quote. Menu items and participations are owned and
/// deleted together with the event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    /// Number of guests.
    pub headcount: u32,
    /// Overheads not tied to a recipe or a role (transport, rentals).
    pub indirect_cost: Money,
    pub profit_margin_percent: Decimal,
    pub menu_items: Vec<MenuItem>,
    pub participations: Vec<StaffParticipation>,
}

impl Event {
    pub fn new(name: impl Into<String>, date: NaiveDate, headcount: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            headcount,
            indirect_cost: Money::ZERO,
            profit_margin_percent: DEFAULT_PROFIT_MARGIN_PERCENT,
            menu_items: Vec::new(),
            participations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_indirect_cost(mut self, indirect_cost: Money) -> Self {
        self.indirect_cost = indirect_cost;
        self
    }

    #[must_use]
    pub fn with_profit_margin(mut self, percent: Decimal) -> Self {
        self.profit_margin_percent = percent;
        self
    }

    /// Append a menu item, attaching it to this event.
    pub fn add_menu_item(&mut self, mut item: MenuItem) -> &MenuItem {
        item.event_id = self.id;
        self.menu_items.push(item);
        &self.menu_items[self.menu_items.len() - 1]
    }

    /// Append a staff participation, attaching it to this event.
    pub fn add_participation(&mut self, mut participation: StaffParticipation) -> &StaffParticipation {
        participation.event_id = self.id;
        self.participations.push(participation);
        &self.participations[self.participations.len() - 1]
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub date: Date,
    pub headcount: i32,
    pub indirect_cost: String,
    pub profit_margin_percent: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_items::Entity")]
    MenuItems,
    #[sea_orm(has_many = "super::staff_participations::Entity")]
    Participations,
}

impl Related<super::menu_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl Related<super::staff_participations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build an event from its row; menu and staff are loaded separately.
impl TryFrom<Model> for Event {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let headcount = u32::try_from(value.headcount)
            .map_err(|_| EngineError::InvalidAmount("headcount must be >= 0".to_string()))?;
        Ok(Self {
            id: value.id,
            name: value.name,
            date: value.date,
            headcount,
            indirect_cost: Money::new(parse_decimal(&value.indirect_cost, "indirect cost")?),
            profit_margin_percent: parse_decimal(&value.profit_margin_percent, "profit margin")?,
            menu_items: Vec::new(),
            participations: Vec::new(),
        })
    }
}

impl From<&Event> for ActiveModel {
    fn from(value: &Event) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            date: ActiveValue::Set(value.date),
            headcount: ActiveValue::Set(i32::try_from(value.headcount).unwrap_or(i32::MAX)),
            indirect_cost: ActiveValue::Set(decimal_text(value.indirect_cost.amount())),
            profit_margin_percent: ActiveValue::Set(decimal_text(value.profit_margin_percent)),
        }
    }
}
