//! Staff role catalog (cook, waiter, ...), independent of events.

use rust_decimal::Decimal;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Money,
    util::{decimal_text, parse_decimal},
};

/// Hourly rate used when a role is created without one.
pub const DEFAULT_HOURLY_RATE: Decimal = Decimal::from_parts(2000, 0, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffRole {
    pub id: Uuid,
    pub name: String,
    pub default_hourly_rate: Money,
}

impl StaffRole {
    pub fn new(name: impl Into<String>, default_hourly_rate: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            default_hourly_rate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff_roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
    pub default_hourly_rate: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::staff_participations::Entity")]
    Participations,
}

impl Related<super::staff_participations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StaffRole {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            name: value.name,
            default_hourly_rate: Money::new(parse_decimal(
                &value.default_hourly_rate,
                "hourly rate",
            )?),
        })
    }
}

impl From<&StaffRole> for ActiveModel {
    fn from(value: &StaffRole) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::NotSet,
            default_hourly_rate: ActiveValue::Set(decimal_text(value.default_hourly_rate.amount())),
        }
    }
}
