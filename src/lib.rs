#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod diff;
pub mod format;
pub mod lexer;
pub mod model;
pub mod parser;

// Re-export main types
pub use diff::{DiffConfig, DiffError};
pub use format::FormatConfig;
pub use lexer::{Token, TokenType};
pub use model::{
    ColumnType, Database, DefaultValue, Ident, Index, IndexColumn, IndexKind, IndexOption,
    IndexType, Length, NullState, Reference, ReferenceMatch, ReferenceOption, SortDirection,
    Statement, Table, TableColumn, TableOption,
};
pub use parser::{ParseError, Parser};
