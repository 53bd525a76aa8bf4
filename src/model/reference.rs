//! Foreign-key reference clauses.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use sha2::{Digest, Sha256};

use super::{Ident, IndexColumn};

/// The `MATCH` mode of a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceMatch {
    /// No `MATCH` clause.
    #[default]
    None,
    /// `MATCH FULL`.
    Full,
    /// `MATCH PARTIAL`.
    Partial,
    /// `MATCH SIMPLE`.
    Simple,
}

/// The action taken when a referenced row is deleted or updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceOption {
    /// No clause.
    #[default]
    None,
    /// `RESTRICT`.
    Restrict,
    /// `CASCADE`.
    Cascade,
    /// `SET NULL`.
    SetNull,
    /// `NO ACTION`.
    NoAction,
}

/// The `REFERENCES` clause of a foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The referenced table.
    pub table_name: Ident,
    /// The referenced columns, in order.
    pub columns: Vec<IndexColumn>,
    /// `MATCH` mode.
    pub match_mode: ReferenceMatch,
    /// `ON DELETE` action.
    pub on_delete: ReferenceOption,
    /// `ON UPDATE` action.
    pub on_update: ReferenceOption,
}

impl Reference {
    /// Create a reference to the given table with no columns yet.
    pub fn new(table_name: impl Into<Ident>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            match_mode: ReferenceMatch::None,
            on_delete: ReferenceOption::None,
            on_update: ReferenceOption::None,
        }
    }

    /// The identity key: a content hash over every field.
    #[must_use]
    pub fn id(&self) -> String {
        let mut content = String::new();
        write!(
            content,
            "{}.{:?}.{:?}.{:?}",
            self.table_name, self.match_mode, self.on_delete, self.on_update
        )
        .unwrap();
        for col in &self.columns {
            write!(content, "{}.", col.id()).unwrap();
        }

        let digest = Sha256::digest(content.as_bytes());
        let mut id = String::from("reference#");
        for byte in digest {
            write!(id, "{byte:02x}").unwrap();
        }
        id
    }
}
