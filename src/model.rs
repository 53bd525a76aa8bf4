//! The table model: typed statements produced by the parser and consumed
//! by the formatter and the differ.
//!
//! Every model node has an `id()` — a deterministic string key the differ
//! uses to match entities across two schemas. Named nodes derive the key
//! from their lowercased name; indexes and references, which are often
//! anonymous, derive it from a content hash instead.

mod column;
mod database;
mod ident;
mod index;
mod reference;
mod table;

pub use column::{ColumnType, DefaultValue, Length, NullState, TableColumn};
pub use database::Database;
pub use ident::Ident;
pub use index::{Index, IndexColumn, IndexKind, IndexOption, IndexType, SortDirection};
pub use reference::{Reference, ReferenceMatch, ReferenceOption};
pub use table::{Table, TableOption};

use alloc::string::String;

/// A parsed top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A `CREATE DATABASE` statement.
    Database(Database),
    /// A `CREATE TABLE` statement.
    Table(Table),
}

impl Statement {
    /// The identity key of the statement.
    pub fn id(&self) -> String {
        match self {
            Statement::Database(d) => d.id(),
            Statement::Table(t) => t.id(),
        }
    }
}

/// Find the table with the given ID in a statement list.
pub fn lookup_table<'a>(stmts: &'a [Statement], id: &str) -> Option<&'a Table> {
    stmts.iter().find_map(|stmt| match stmt {
        Statement::Table(t) if t.id() == id => Some(t),
        _ => None,
    })
}
