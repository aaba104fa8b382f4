use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, StaffRole, staff_participations, staff_roles,
    staff_roles::DEFAULT_HOURLY_RATE,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a staff role. Without a rate the role is paid the default 20.00/h.
    pub async fn new_staff_role(
        &self,
        name: &str,
        default_hourly_rate: Option<Money>,
    ) -> ResultEngine<Uuid> {
        let (name, name_norm) = normalize_required_name(name, "staff role")?;
        let rate = default_hourly_rate.unwrap_or(Money::new(DEFAULT_HOURLY_RATE));
        if rate.is_negative() {
            return Err(EngineError::InvalidAmount(
                "hourly rate must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let exists = staff_roles::Entity::find()
                .filter(staff_roles::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let role = StaffRole::new(name, rate);
            let mut model: staff_roles::ActiveModel = (&role).into();
            model.name_norm = ActiveValue::Set(name_norm);
            model.insert(&db_tx).await?;
            Ok(role.id)
        })
    }

    pub async fn staff_role(&self, role_id: Uuid) -> ResultEngine<StaffRole> {
        staff_roles::Entity::find_by_id(role_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("staff role {role_id}")))?
            .try_into()
    }

    /// All staff roles ordered by name.
    pub async fn list_staff_roles(&self) -> ResultEngine<Vec<StaffRole>> {
        staff_roles::Entity::find()
            .order_by_asc(staff_roles::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(StaffRole::try_from)
            .collect()
    }

    /// Delete a staff role. Rejected while an event still hires it.
    pub async fn delete_staff_role(&self, role_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = staff_roles::Entity::find_by_id(role_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("staff role {role_id}")))?;

            let used_by = staff_participations::Entity::find()
                .filter(staff_participations::Column::RoleId.eq(role_id))
                .count(&db_tx)
                .await?;
            if used_by > 0 {
                return Err(EngineError::Referenced(model.name));
            }

            staff_roles::Entity::delete_by_id(role_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
