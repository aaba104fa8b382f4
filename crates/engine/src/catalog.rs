//! In-memory snapshot of the entity graph handed to the costing engine.
//!
//! The persistence layer resolves every reference up front and fills a
//! [`Catalog`] keyed by id; costing never queries storage on its own.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{EngineError, Ingredient, Recipe, ResultEngine, StaffRole};

/// Arena of ingredients, recipes and staff roles keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub ingredients: HashMap<Uuid, Ingredient>,
    pub recipes: HashMap<Uuid, Recipe>,
    pub staff_roles: HashMap<Uuid, StaffRole>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ingredient(&mut self, ingredient: Ingredient) -> Uuid {
        let id = ingredient.id;
        self.ingredients.insert(id, ingredient);
        id
    }

    pub fn insert_recipe(&mut self, recipe: Recipe) -> Uuid {
        let id = recipe.id;
        self.recipes.insert(id, recipe);
        id
    }

    pub fn insert_staff_role(&mut self, role: StaffRole) -> Uuid {
        let id = role.id;
        self.staff_roles.insert(id, role);
        id
    }

    pub fn ingredient(&self, id: Uuid) -> ResultEngine<&Ingredient> {
        self.ingredients
            .get(&id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {id}")))
    }

    pub fn recipe(&self, id: Uuid) -> ResultEngine<&Recipe> {
        self.recipes
            .get(&id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("recipe {id}")))
    }

    pub fn staff_role(&self, id: Uuid) -> ResultEngine<&StaffRole> {
        self.staff_roles
            .get(&id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("staff role {id}")))
    }
}

/// A loaded root entity together with everything it references.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    pub root: T,
    pub catalog: Catalog,
}
