//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a referenced entity is missing.
//! - [`NoDirectConversion`] thrown by the conversion table when a unit pair
//!   has no direct factor. Costing absorbs it through its fallback policy.
//! - [`CyclicRecipeGraph`] thrown when a recipe contains itself, directly or
//!   through one of its sub-recipes.
//! - [`Referenced`] thrown when deleting an entity that is still in use.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`NoDirectConversion`]: EngineError::NoDirectConversion
//!  [`CyclicRecipeGraph`]: EngineError::CyclicRecipeGraph
//!  [`Referenced`]: EngineError::Referenced
use sea_orm::DbErr;
use thiserror::Error;

use crate::Unit;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("No direct conversion from {from} to {to}")]
    NoDirectConversion { from: Unit, to: Unit },
    #[error("Cyclic recipe graph: {0}")]
    CyclicRecipeGraph(String),
    #[error("\"{0}\" is still referenced")]
    Referenced(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (
                Self::NoDirectConversion { from: fa, to: ta },
                Self::NoDirectConversion { from: fb, to: tb },
            ) => fa == fb && ta == tb,
            (Self::CyclicRecipeGraph(a), Self::CyclicRecipeGraph(b)) => a == b,
            (Self::Referenced(a), Self::Referenced(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
