//! Costing core for technical sheets and catered events.
//!
//! The pure part ([`Costing`], [`shopping_list`]) works on an in-memory
//! [`Catalog`]; [`Engine`] stores the entity graph with sea-orm and loads the
//! snapshots the pure part consumes.

pub use catalog::{Catalog, Snapshot};
pub use categories::Category;
pub use costing::{ComponentCostEntry, Costing, LineCost, LineCostEntry, RecipeCostSheet};
pub use error::EngineError;
pub use events::{DEFAULT_PROFIT_MARGIN_PERCENT, Event};
pub use ingredients::Ingredient;
pub use menu_items::MenuItem;
pub use money::{MONEY_PLACES, Money, QUANTITY_PLACES, round_half_up, round_quantity};
pub use ops::{Engine, EngineBuilder};
pub use pricing::{EventPricing, MenuItemCost, ParticipationCost};
pub use recipe_components::RecipeComponent;
pub use recipe_items::RecipeItem;
pub use recipes::Recipe;
pub use shopping::{ShoppingListRow, SubRecipeDepth, shopping_list};
pub use staff_participations::StaffParticipation;
pub use staff_roles::{DEFAULT_HOURLY_RATE, StaffRole};
pub use units::{ConversionTable, Unit};

mod catalog;
mod categories;
mod costing;
mod error;
mod events;
mod ingredients;
mod menu_items;
mod money;
mod ops;
mod pricing;
mod recipe_components;
mod recipe_items;
mod recipes;
mod shopping;
mod staff_participations;
mod staff_roles;
mod units;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
