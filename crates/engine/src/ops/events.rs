use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Catalog, EngineError, Event, MenuItem, ResultEngine, Snapshot, StaffParticipation, events,
    menu_items, staff_participations, staff_roles,
    util::{ensure_non_negative, ensure_places, ensure_positive, normalize_display_name},
};

use super::{Engine, with_tx};

/// Margin, portions per person and hours are kept to 2 decimals.
const EVENT_PLACES: u32 = 2;

fn validate_event(event: &Event) -> ResultEngine<()> {
    if event.headcount == 0 {
        return Err(EngineError::InvalidAmount(
            "headcount must be > 0".to_string(),
        ));
    }
    if event.indirect_cost.is_negative() {
        return Err(EngineError::InvalidAmount(
            "indirect cost must be >= 0".to_string(),
        ));
    }
    ensure_places(event.profit_margin_percent, EVENT_PLACES, "profit margin")
}

fn validate_menu_item(item: &MenuItem) -> ResultEngine<()> {
    ensure_positive(item.portions_per_person, "portions per person")?;
    ensure_places(item.portions_per_person, EVENT_PLACES, "portions per person")
}

fn validate_participation(participation: &StaffParticipation) -> ResultEngine<()> {
    if participation.headcount == 0 {
        return Err(EngineError::InvalidAmount(
            "staff headcount must be >= 1".to_string(),
        ));
    }
    ensure_non_negative(participation.hours, "hours")?;
    ensure_places(participation.hours, EVENT_PLACES, "hours")?;
    if participation.hourly_rate.is_some_and(|rate| rate.is_negative()) {
        return Err(EngineError::InvalidAmount(
            "hourly rate must be >= 0".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Store a new event together with its menu and staff.
    pub async fn new_event(&self, mut event: Event) -> ResultEngine<Uuid> {
        event.name = normalize_display_name(&event.name, "event")?;
        validate_event(&event)?;
        event.menu_items.iter().try_for_each(validate_menu_item)?;
        event
            .participations
            .iter()
            .try_for_each(validate_participation)?;

        with_tx!(self, |db_tx| {
            let model: events::ActiveModel = (&event).into();
            model.insert(&db_tx).await?;

            for (position, item) in event.menu_items.iter().enumerate() {
                Self::insert_menu_item(&db_tx, event.id, position, item).await?;
            }
            for (position, participation) in event.participations.iter().enumerate() {
                Self::insert_participation(&db_tx, event.id, position, participation).await?;
            }

            tracing::debug!(event_id = %event.id, name = %event.name, "event created");
            Ok(event.id)
        })
    }

    /// Put a recipe on the menu of an event.
    pub async fn add_menu_item(&self, event_id: Uuid, item: MenuItem) -> ResultEngine<Uuid> {
        validate_menu_item(&item)?;
        with_tx!(self, |db_tx| {
            Self::require_event_model(&db_tx, event_id).await?;
            let position = menu_items::Entity::find()
                .filter(menu_items::Column::EventId.eq(event_id))
                .order_by_desc(menu_items::Column::Position)
                .one(&db_tx)
                .await?
                .map_or(0, |last| usize::try_from(last.position).unwrap_or_default() + 1);
            Self::insert_menu_item(&db_tx, event_id, position, &item).await?;
            Ok(item.id)
        })
    }

    /// Hire staff of one role for an event.
    pub async fn add_staff_participation(
        &self,
        event_id: Uuid,
        participation: StaffParticipation,
    ) -> ResultEngine<Uuid> {
        validate_participation(&participation)?;
        with_tx!(self, |db_tx| {
            Self::require_event_model(&db_tx, event_id).await?;
            let position = staff_participations::Entity::find()
                .filter(staff_participations::Column::EventId.eq(event_id))
                .order_by_desc(staff_participations::Column::Position)
                .one(&db_tx)
                .await?
                .map_or(0, |last| usize::try_from(last.position).unwrap_or_default() + 1);
            Self::insert_participation(&db_tx, event_id, position, &participation).await?;
            Ok(participation.id)
        })
    }

    pub async fn remove_menu_item(&self, menu_item_id: Uuid) -> ResultEngine<()> {
        let result = menu_items::Entity::delete_by_id(menu_item_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("menu item {menu_item_id}")));
        }
        Ok(())
    }

    pub async fn remove_staff_participation(&self, participation_id: Uuid) -> ResultEngine<()> {
        let result = staff_participations::Entity::delete_by_id(participation_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!(
                "staff participation {participation_id}"
            )));
        }
        Ok(())
    }

    /// Update headcount, indirect cost and margin of an event.
    pub async fn update_event_terms(&self, event_id: Uuid, terms: &Event) -> ResultEngine<()> {
        validate_event(terms)?;
        with_tx!(self, |db_tx| {
            let model = Self::require_event_model(&db_tx, event_id).await?;
            let mut active: events::ActiveModel = model.into();
            let update: events::ActiveModel = terms.into();
            active.headcount = update.headcount;
            active.indirect_cost = update.indirect_cost;
            active.profit_margin_percent = update.profit_margin_percent;
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Return an event with its menu and staff.
    pub async fn event(&self, event_id: Uuid) -> ResultEngine<Event> {
        with_tx!(self, |db_tx| Self::fetch_event(&db_tx, event_id).await)
    }

    /// All events, most recent first.
    pub async fn list_events(&self) -> ResultEngine<Vec<Event>> {
        events::Entity::find()
            .order_by_desc(events::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    /// Load an event, its recipes (with sub-recipes), ingredients and staff
    /// roles in one transaction.
    pub async fn load_event(&self, event_id: Uuid) -> ResultEngine<Snapshot<Event>> {
        with_tx!(self, |db_tx| {
            let event = Self::fetch_event(&db_tx, event_id).await?;
            let mut catalog = Catalog::new();
            let roots = event.menu_items.iter().map(|item| item.recipe_id).collect();
            Self::fetch_recipe_closure(&db_tx, roots, &mut catalog).await?;
            Self::fetch_staff_roles(&db_tx, &event, &mut catalog).await?;
            tracing::debug!(
                event_id = %event_id,
                recipes = catalog.recipes.len(),
                ingredients = catalog.ingredients.len(),
                staff_roles = catalog.staff_roles.len(),
                "event snapshot loaded"
            );
            Ok(Snapshot {
                root: event,
                catalog,
            })
        })
    }

    /// Delete an event with its menu and staff.
    pub async fn delete_event(&self, event_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_event_model(&db_tx, event_id).await?;
            menu_items::Entity::delete_many()
                .filter(menu_items::Column::EventId.eq(event_id))
                .exec(&db_tx)
                .await?;
            staff_participations::Entity::delete_many()
                .filter(staff_participations::Column::EventId.eq(event_id))
                .exec(&db_tx)
                .await?;
            events::Entity::delete_by_id(event_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn insert_menu_item(
        db_tx: &DatabaseTransaction,
        event_id: Uuid,
        position: usize,
        item: &MenuItem,
    ) -> ResultEngine<()> {
        Self::require_recipe_model(db_tx, item.recipe_id).await?;

        let mut model: menu_items::ActiveModel = item.into();
        model.event_id = ActiveValue::Set(event_id);
        model.position = ActiveValue::Set(i32::try_from(position).unwrap_or(i32::MAX));
        model.insert(db_tx).await?;
        Ok(())
    }

    async fn insert_participation(
        db_tx: &DatabaseTransaction,
        event_id: Uuid,
        position: usize,
        participation: &StaffParticipation,
    ) -> ResultEngine<()> {
        staff_roles::Entity::find_by_id(participation.role_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("staff role {}", participation.role_id))
            })?;

        let mut model: staff_participations::ActiveModel = participation.into();
        model.event_id = ActiveValue::Set(event_id);
        model.position = ActiveValue::Set(i32::try_from(position).unwrap_or(i32::MAX));
        model.insert(db_tx).await?;
        Ok(())
    }
}
