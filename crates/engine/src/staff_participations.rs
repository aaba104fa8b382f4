//! Staff hired for an event.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Money,
    util::{decimal_text, parse_decimal, parse_optional_decimal},
};

/// `headcount` people of one role working `hours` each.
///
/// `hourly_rate` overrides the role default when set to a non-zero amount.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffParticipation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub role_id: Uuid,
    pub headcount: u32,
    pub hours: Decimal,
    pub hourly_rate: Option<Money>,
}

impl StaffParticipation {
    pub fn new(role_id: Uuid, headcount: u32, hours: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            role_id,
            headcount,
            hours,
            hourly_rate: None,
        }
    }

    #[must_use]
    pub fn with_hourly_rate(mut self, rate: Money) -> Self {
        self.hourly_rate = Some(rate);
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff_participations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub position: i32,
    pub role_id: Uuid,
    pub headcount: i32,
    pub hours: String,
    pub hourly_rate: Option<String>,
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
        belongs_to = "super::staff_roles::Entity",
        from = "Column::RoleId",
        to = "super::staff_roles::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Role,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::staff_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StaffParticipation {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let headcount = u32::try_from(value.headcount)
            .map_err(|_| EngineError::InvalidAmount("headcount must be >= 1".to_string()))?;
        Ok(Self {
            id: value.id,
            event_id: value.event_id,
            role_id: value.role_id,
            headcount,
            hours: parse_decimal(&value.hours, "hours")?,
            hourly_rate: parse_optional_decimal(value.hourly_rate.as_deref(), "hourly rate")?
                .map(Money::new),
        })
    }
}

impl From<&StaffParticipation> for ActiveModel {
    fn from(value: &StaffParticipation) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            event_id: ActiveValue::Set(value.event_id),
            position: ActiveValue::NotSet,
            role_id: ActiveValue::Set(value.role_id),
            headcount: ActiveValue::Set(i32::try_from(value.headcount).unwrap_or(i32::MAX)),
            hours: ActiveValue::Set(decimal_text(value.hours)),
            hourly_rate: ActiveValue::Set(value.hourly_rate.map(|rate| decimal_text(rate.amount()))),
        }
    }
}
