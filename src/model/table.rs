//! Table definitions and the table-level normalization pass.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::{Ident, Index, IndexColumn, IndexKind, IndexType, TableColumn};

/// A table option, such as `ENGINE = InnoDB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOption {
    /// Option key, e.g. `ENGINE` or `DEFAULT CHARACTER SET`.
    pub key: String,
    /// Option value.
    pub value: String,
    /// Whether the value renders single-quoted.
    pub need_quotes: bool,
}

impl TableOption {
    /// Create a table option.
    pub fn new(key: impl Into<String>, value: impl Into<String>, need_quotes: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            need_quotes,
        }
    }
}

/// A table definition.
///
/// `like_table` and the usual body (columns and indexes) are mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: Ident,
    /// `TEMPORARY` was present.
    pub temporary: bool,
    /// `IF NOT EXISTS` was present.
    pub if_not_exists: bool,
    /// `LIKE other_table` form.
    pub like_table: Option<Ident>,
    /// Column definitions, in declaration order.
    pub columns: Vec<TableColumn>,
    /// Indexes, in declaration order.
    pub indexes: Vec<Index>,
    /// Table options, in declaration order.
    pub options: Vec<TableOption>,
}

impl Table {
    /// Create a new, empty table with the given name.
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            temporary: false,
            if_not_exists: false,
            like_table: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            options: Vec::new(),
        }
    }

    /// The identity key of this table.
    #[must_use]
    pub fn id(&self) -> String {
        format!("table#{}", self.name.lower())
    }

    /// Find a column by its ID.
    #[must_use]
    pub fn lookup_column(&self, id: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|col| col.id() == id)
    }

    /// Find the declaration position of a column by its ID.
    #[must_use]
    pub fn lookup_column_order(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.id() == id)
    }

    /// Find the column declared immediately before the one with the given
    /// ID. Returns `None` for the first column (and for unknown IDs).
    #[must_use]
    pub fn lookup_column_before(&self, id: &str) -> Option<&TableColumn> {
        let pos = self.lookup_column_order(id)?;
        pos.checked_sub(1).map(|before| &self.columns[before])
    }

    /// Find an index by its ID.
    #[must_use]
    pub fn lookup_index(&self, id: &str) -> Option<&Index> {
        self.indexes.iter().find(|idx| idx.id() == id)
    }

    /// Rewrite this table into its canonical form.
    ///
    /// Column-level `PRIMARY KEY` and `UNIQUE` move off the column and
    /// become table-level indexes (a unique index is named after its
    /// column, as MySQL names it). For every foreign key with a
    /// `CONSTRAINT` symbol that does not already name an index, the index
    /// MySQL creates implicitly is materialized right before the foreign
    /// key. Without this, a schema would never compare clean against the
    /// output of `SHOW CREATE TABLE`.
    ///
    /// Normalization is idempotent.
    #[must_use]
    pub fn normalize(&self) -> Table {
        let table_id = self.id();
        let mut lifted: Vec<Index> = Vec::new();
        let mut columns: Vec<TableColumn> = Vec::new();

        for col in &self.columns {
            let mut ncol = col.normalize();

            // column_definition [UNIQUE [KEY] | [PRIMARY] KEY] means the
            // same thing as a table-level index declaration
            if ncol.primary {
                let mut index = Index::new(IndexKind::PrimaryKey, &table_id);
                index.index_type = IndexType::None;
                index.columns.push(IndexColumn::new(ncol.name.clone()));
                lifted.push(index);
                ncol.primary = false;
            } else if ncol.unique {
                let mut index = Index::new(IndexKind::Unique, &table_id);
                // an unnamed unique index is named after its first column
                index.name = Some(ncol.name.clone());
                index.index_type = IndexType::None;
                index.columns.push(IndexColumn::new(ncol.name.clone()));
                lifted.push(index);
                ncol.unique = false;
            }

            columns.push(ncol);
        }

        let mut indexes: Vec<Index> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for idx in &self.indexes {
            if idx.kind == IndexKind::ForeignKey {
                if let Some(sym) = &idx.constraint_name {
                    if !seen.contains(sym.as_str()) {
                        // materialize the implicitly created index, unless
                        // the schema already declares one under this name
                        let mut implicit = Index::new(IndexKind::Normal, &table_id);
                        implicit.name = Some(sym.clone());
                        implicit.index_type = idx.index_type;
                        implicit.columns = idx.columns.clone();
                        indexes.push(implicit);
                    }
                }
            }
            indexes.push(idx.clone());
            if let Some(name) = &idx.name {
                seen.insert(String::from(name.as_str()));
            }
        }

        let mut table = Table::new(self.name.clone());
        table.temporary = self.temporary;
        table.if_not_exists = self.if_not_exists;
        table.like_table = self.like_table.clone();
        table.columns = columns;
        lifted.extend(indexes);
        table.indexes = lifted;
        table.options = self.options.clone();
        table
    }
}
