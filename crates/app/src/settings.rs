//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden with `COZINHA__*` environment
//! variables (e.g. `COZINHA__APP__LEVEL=debug`).
use std::str::FromStr;

use config::{Config, ConfigError, Environment, File};
use engine::{ConversionTable, SubRecipeDepth, Unit};
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("cozinha.db".to_string())
    }
}

/// Extra direct factor, e.g. `{ from = "xic", to = "g", factor = "120" }`.
#[derive(Debug, Deserialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub factor: String,
}

/// Kilograms per piece of a named ingredient.
#[derive(Debug, Deserialize)]
pub struct PieceWeight {
    pub ingredient: String,
    pub kg: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Costing {
    #[serde(default)]
    pub sub_recipe_depth: SubRecipeDepth,
    #[serde(default)]
    pub conversions: Vec<Conversion>,
    #[serde(default)]
    pub piece_weights: Vec<PieceWeight>,
}

impl Costing {
    /// The standard table with the configured factors and piece weights
    /// merged over it.
    pub fn conversion_table(
        &self,
    ) -> Result<ConversionTable, Box<dyn std::error::Error + Send + Sync>> {
        let mut table = ConversionTable::standard();
        for conversion in &self.conversions {
            table = table.with_factor(
                Unit::from_str(&conversion.from)?,
                Unit::from_str(&conversion.to)?,
                Decimal::from_str(conversion.factor.trim())?,
            )?;
        }
        for weight in &self.piece_weights {
            let kilograms = Decimal::from_str(weight.kg.trim())?;
            table = table.with_piece_weight(&weight.ingredient, kilograms)?;
        }
        Ok(table)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub costing: Costing,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("COZINHA").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_without_file() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(matches!(settings.database, Database::Sqlite(ref path) if path == "cozinha.db"));
        assert_eq!(settings.costing.sub_recipe_depth, SubRecipeDepth::Full);
    }

    #[test]
    fn costing_section_extends_the_standard_table() {
        let settings = parse(
            r#"
            database = "memory"

            [app]
            level = "debug"

            [costing]
            sub_recipe_depth = "direct"

            [[costing.conversions]]
            from = "xic"
            to = "g"
            factor = "120"

            [[costing.piece_weights]]
            ingredient = "Tomate"
            kg = "0.12"
            "#,
        );
        assert!(matches!(settings.database, Database::Memory));
        assert_eq!(settings.costing.sub_recipe_depth, SubRecipeDepth::Direct);

        let table = settings.costing.conversion_table().unwrap();
        assert_eq!(table.factor(Unit::Cup, Unit::Gram), Some(Decimal::new(120, 0)));
        assert_eq!(
            table.factor(Unit::Kilogram, Unit::Gram),
            Some(Decimal::new(1000, 0))
        );
        assert_eq!(table.piece_weight("tomate"), Some(Decimal::new(12, 2)));
    }

    #[test]
    fn bad_unit_code_is_rejected() {
        let settings = parse(
            r#"
            [[costing.conversions]]
            from = "bushel"
            to = "kg"
            factor = "27"
            "#,
        );
        assert!(settings.costing.conversion_table().is_err());
    }
}
