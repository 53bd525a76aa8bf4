//! `CREATE DATABASE` statements.

use alloc::format;
use alloc::string::String;

use super::Ident;

/// A database definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Database name.
    pub name: Ident,
    /// `IF NOT EXISTS` was present.
    pub if_not_exists: bool,
}

impl Database {
    /// Create a new database definition with the given name.
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            if_not_exists: false,
        }
    }

    /// The identity key of this database.
    #[must_use]
    pub fn id(&self) -> String {
        format!("database#{}", self.name.lower())
    }
}
