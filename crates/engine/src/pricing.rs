//! Event cost aggregation and sale pricing.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{Costing, Event, MenuItem, Money, ResultEngine, StaffParticipation, StaffRole};

/// Priced menu line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuItemCost {
    pub menu_item_id: Uuid,
    pub recipe_id: Uuid,
    pub recipe: String,
    pub portions_per_person: Decimal,
    pub cost_per_portion: Option<Money>,
    pub cost: Money,
}

/// Priced staff line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticipationCost {
    pub participation_id: Uuid,
    pub role: String,
    pub headcount: u32,
    pub hours: Decimal,
    pub hourly_rate: Money,
    pub unit_cost: Money,
    pub cost: Money,
}

/// Full quote for an event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventPricing {
    pub event_id: Uuid,
    pub name: String,
    pub headcount: u32,
    pub menu: Vec<MenuItemCost>,
    pub staff: Vec<ParticipationCost>,
    pub recipes_cost: Money,
    pub staff_cost: Money,
    pub indirect_cost: Money,
    pub total_cost: Money,
    pub profit_margin_percent: Decimal,
    pub sale_price: Money,
    pub estimated_profit: Money,
    pub cost_per_person: Money,
    pub sale_price_per_person: Money,
}

/// Hourly rate actually paid: the override unless absent or zero.
fn effective_rate(participation: &StaffParticipation, role: &StaffRole) -> Money {
    participation
        .hourly_rate
        .filter(|rate| !rate.is_zero())
        .unwrap_or(role.default_hourly_rate)
}

/// `total × (1 + margin / 100)`, rounded.
fn marked_up(total: Money, margin_percent: Decimal) -> Money {
    total.scale(Decimal::ONE + margin_percent / Decimal::ONE_HUNDRED)
}

fn per_head(amount: Money, headcount: u32) -> Money {
    amount.per(Decimal::from(headcount)).unwrap_or(Money::ZERO)
}

impl Costing<'_> {
    /// Cost of serving `item` to every guest of `event`.
    ///
    /// 0.00 when the recipe has no cost per portion.
    pub fn menu_item_cost(&self, event: &Event, item: &MenuItem) -> ResultEngine<Money> {
        Ok(self.price_menu_item(event, item)?.cost)
    }

    fn price_menu_item(&self, event: &Event, item: &MenuItem) -> ResultEngine<MenuItemCost> {
        let recipe = self.catalog.recipe(item.recipe_id)?;
        let cost_per_portion = self.cost_per_portion(recipe)?;
        let cost = match cost_per_portion {
            Some(cpp) if !cpp.is_zero() => {
                cpp.scale(Decimal::from(event.headcount) * item.portions_per_person)
            }
            _ => Money::ZERO,
        };
        Ok(MenuItemCost {
            menu_item_id: item.id,
            recipe_id: recipe.id,
            recipe: recipe.title.clone(),
            portions_per_person: item.portions_per_person,
            cost_per_portion,
            cost,
        })
    }

    /// Sum of the menu item costs.
    pub fn recipes_cost(&self, event: &Event) -> ResultEngine<Money> {
        event
            .menu_items
            .iter()
            .map(|item| self.menu_item_cost(event, item))
            .sum()
    }

    /// `round(hours × rate) × headcount`.
    pub fn participation_cost(&self, participation: &StaffParticipation) -> ResultEngine<Money> {
        Ok(self.price_participation(participation)?.cost)
    }

    fn price_participation(
        &self,
        participation: &StaffParticipation,
    ) -> ResultEngine<ParticipationCost> {
        let role = self.catalog.staff_role(participation.role_id)?;
        let hourly_rate = effective_rate(participation, role);
        let unit_cost = hourly_rate.scale(participation.hours);
        Ok(ParticipationCost {
            participation_id: participation.id,
            role: role.name.clone(),
            headcount: participation.headcount,
            hours: participation.hours,
            hourly_rate,
            unit_cost,
            cost: unit_cost.scale(Decimal::from(participation.headcount)),
        })
    }

    /// Sum of the participation costs.
    pub fn staff_cost(&self, event: &Event) -> ResultEngine<Money> {
        event
            .participations
            .iter()
            .map(|participation| self.participation_cost(participation))
            .sum()
    }

    /// Recipes + staff + indirect costs.
    pub fn event_total_cost(&self, event: &Event) -> ResultEngine<Money> {
        Ok(self.recipes_cost(event)? + self.staff_cost(event)? + event.indirect_cost)
    }

    pub fn sale_price(&self, event: &Event) -> ResultEngine<Money> {
        Ok(marked_up(
            self.event_total_cost(event)?,
            event.profit_margin_percent,
        ))
    }

    pub fn estimated_profit(&self, event: &Event) -> ResultEngine<Money> {
        let total = self.event_total_cost(event)?;
        Ok(marked_up(total, event.profit_margin_percent) - total)
    }

    /// Total cost per guest, 0.00 without guests.
    pub fn cost_per_person(&self, event: &Event) -> ResultEngine<Money> {
        Ok(per_head(self.event_total_cost(event)?, event.headcount))
    }

    /// Sale price per guest, 0.00 without guests.
    pub fn sale_price_per_person(&self, event: &Event) -> ResultEngine<Money> {
        Ok(per_head(self.sale_price(event)?, event.headcount))
    }

    /// Price every line of `event` and derive the quote.
    pub fn event_pricing(&self, event: &Event) -> ResultEngine<EventPricing> {
        let menu = event
            .menu_items
            .iter()
            .map(|item| self.price_menu_item(event, item))
            .collect::<ResultEngine<Vec<_>>>()?;
        let staff = event
            .participations
            .iter()
            .map(|participation| self.price_participation(participation))
            .collect::<ResultEngine<Vec<_>>>()?;

        let recipes_cost: Money = menu.iter().map(|line| line.cost).sum();
        let staff_cost: Money = staff.iter().map(|line| line.cost).sum();
        let total_cost = recipes_cost + staff_cost + event.indirect_cost;
        let sale_price = marked_up(total_cost, event.profit_margin_percent);

        Ok(EventPricing {
            event_id: event.id,
            name: event.name.clone(),
            headcount: event.headcount,
            menu,
            staff,
            recipes_cost,
            staff_cost,
            indirect_cost: event.indirect_cost,
            total_cost,
            profit_margin_percent: event.profit_margin_percent,
            sale_price,
            estimated_profit: sale_price - total_cost,
            cost_per_person: per_head(total_cost, event.headcount),
            sale_price_per_person: per_head(sale_price, event.headcount),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{Catalog, ConversionTable, Ingredient, Recipe, RecipeItem, Unit};

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn money(value: &str) -> Money {
        Money::new(d(value))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    /// Sauce at 2.50 per portion, one cook and one waiter role.
    fn catalog() -> (Catalog, Uuid, Uuid, Uuid) {
        let mut catalog = Catalog::new();
        let tomato =
            catalog.insert_ingredient(Ingredient::new("Tomato", Unit::Kilogram, d("5.00")));
        let mut sauce = Recipe::new("Sauce", Uuid::new_v4(), d("2.000"), Unit::Kilogram)
            .with_portion_weight(d("0.5"));
        sauce.add_item(RecipeItem::new(tomato, Unit::Kilogram).with_net_weight(d("2")));
        let sauce = catalog.insert_recipe(sauce);
        let cook = catalog.insert_staff_role(StaffRole::new("Cook", money("20.00")));
        let waiter = catalog.insert_staff_role(StaffRole::new("Waiter", money("12.50")));
        (catalog, sauce, cook, waiter)
    }

    #[test]
    fn event_quote() {
        let (catalog, sauce, cook, _) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        let mut event = Event::new("Wedding", date(), 10)
            .with_indirect_cost(money("10.00"))
            .with_profit_margin(d("30"));
        event.add_menu_item(MenuItem::new(sauce, d("1")));
        event.add_participation(StaffParticipation::new(cook, 2, d("4")));

        let item = &event.menu_items[0];
        assert_eq!(costing.menu_item_cost(&event, item).unwrap(), money("25.00"));
        assert_eq!(costing.staff_cost(&event).unwrap(), money("160.00"));
        assert_eq!(costing.event_total_cost(&event).unwrap(), money("195.00"));
        assert_eq!(costing.sale_price(&event).unwrap(), money("253.50"));
        assert_eq!(costing.estimated_profit(&event).unwrap(), money("58.50"));
        assert_eq!(costing.cost_per_person(&event).unwrap(), money("19.50"));
        assert_eq!(costing.sale_price_per_person(&event).unwrap(), money("25.35"));

        let pricing = costing.event_pricing(&event).unwrap();
        assert_eq!(pricing.total_cost, money("195.00"));
        assert_eq!(pricing.sale_price, money("253.50"));
        assert_eq!(pricing.staff[0].unit_cost, money("80.00"));
    }

    #[test]
    fn override_rate_wins_unless_zero() {
        let (catalog, _, cook, waiter) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        let custom = StaffParticipation::new(cook, 1, d("2.5")).with_hourly_rate(money("30.00"));
        assert_eq!(costing.participation_cost(&custom).unwrap(), money("75.00"));

        let zero = StaffParticipation::new(waiter, 3, d("2")).with_hourly_rate(Money::ZERO);
        assert_eq!(costing.participation_cost(&zero).unwrap(), money("75.00"));
    }

    #[test]
    fn unit_cost_rounds_before_headcount() {
        let (catalog, _, _, waiter) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        // 12.50 × 0.333 = 4.1625 -> 4.16, × 3 = 12.48
        let participation = StaffParticipation::new(waiter, 3, d("0.333"));
        assert_eq!(
            costing.participation_cost(&participation).unwrap(),
            money("12.48")
        );
    }

    #[test]
    fn zero_margin_sells_at_cost() {
        let (catalog, sauce, _, _) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        let mut event = Event::new("Lunch", date(), 4).with_profit_margin(Decimal::ZERO);
        event.add_menu_item(MenuItem::new(sauce, d("1")));

        let pricing = costing.event_pricing(&event).unwrap();
        assert_eq!(pricing.total_cost, money("10.00"));
        assert_eq!(pricing.sale_price, money("10.00"));
        assert_eq!(pricing.estimated_profit, Money::ZERO);
    }

    #[test]
    fn fractional_margin_rounds_half_up() {
        let (catalog, _, _, _) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        // 10.05 × 1.125 = 11.30625 -> 11.31
        let event = Event::new("Brunch", date(), 2)
            .with_indirect_cost(money("10.05"))
            .with_profit_margin(d("12.5"));
        let pricing = costing.event_pricing(&event).unwrap();
        assert_eq!(pricing.sale_price, money("11.31"));
        assert_eq!(pricing.estimated_profit, money("1.26"));
        assert_eq!(pricing.sale_price_per_person, money("5.66"));
    }

    #[test]
    fn no_guests_means_no_per_person_values() {
        let (catalog, sauce, cook, _) = catalog();
        let table = ConversionTable::standard();
        let costing = Costing::new(&table, &catalog);

        let mut event = Event::new("Setup day", date(), 0);
        event.add_menu_item(MenuItem::new(sauce, d("1")));
        event.add_participation(StaffParticipation::new(cook, 1, d("1")));

        let pricing = costing.event_pricing(&event).unwrap();
        assert_eq!(pricing.recipes_cost, Money::ZERO);
        assert_eq!(pricing.total_cost, money("20.00"));
        assert_eq!(pricing.cost_per_person, Money::ZERO);
        assert_eq!(pricing.sale_price_per_person, Money::ZERO);
    }

    #[test]
    fn recipe_without_portions_costs_nothing_on_the_menu() {
        let (mut catalog, _, _, _) = catalog();
        let table = ConversionTable::standard();
        let tomato = *catalog.ingredients.keys().next().unwrap();
        let mut bulk = Recipe::new("Bulk", Uuid::new_v4(), d("1"), Unit::Kilogram);
        bulk.add_item(RecipeItem::new(tomato, Unit::Kilogram).with_net_weight(d("1")));
        let bulk = catalog.insert_recipe(bulk);
        let costing = Costing::new(&table, &catalog);

        let mut event = Event::new("Party", date(), 20);
        event.add_menu_item(MenuItem::new(bulk, d("1")));
        assert_eq!(costing.recipes_cost(&event).unwrap(), Money::ZERO);
    }
}
