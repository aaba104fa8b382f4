use sea_orm::DatabaseConnection;

use crate::{
    ConversionTable, ResultEngine, SubRecipeDepth,
    util::{normalize_display_name, normalize_name_key},
};

mod categories;
mod events;
mod ingredients;
mod loader;
mod recipes;
mod reports;
mod staff;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Persistence collaborator of the costing core.
///
/// Stores the entity graph, enforces referential protection and hands out
/// consistent snapshots (one transaction per load) to the pure costing code.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    conversions: ConversionTable,
    sub_recipe_depth: SubRecipeDepth,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The conversion table used by every report.
    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    pub fn sub_recipe_depth(&self) -> SubRecipeDepth {
        self.sub_recipe_depth
    }
}

/// Display name and uniqueness key of a user supplied name.
fn normalize_required_name(value: &str, label: &str) -> ResultEngine<(String, String)> {
    let display = normalize_display_name(value, label)?;
    let key = normalize_name_key(&display, label)?;
    Ok((display, key))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    conversions: Option<ConversionTable>,
    sub_recipe_depth: SubRecipeDepth,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the standard conversion table.
    pub fn conversions(mut self, conversions: ConversionTable) -> EngineBuilder {
        self.conversions = Some(conversions);
        self
    }

    pub fn sub_recipe_depth(mut self, depth: SubRecipeDepth) -> EngineBuilder {
        self.sub_recipe_depth = depth;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            conversions: self.conversions.unwrap_or_else(ConversionTable::standard),
            sub_recipe_depth: self.sub_recipe_depth,
        })
    }
}
