//! Schema diffing: compute the ALTER statements that migrate one schema
//! into another.
//!
//! The differ matches tables, columns, and indexes across the two schemas
//! by their IDs, with set operations over `BTreeSet<String>` so every
//! iteration that feeds output runs in ascending ID order. The output is
//! byte-for-byte deterministic.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::format::{self, FormatConfig};
use crate::model::{self, Ident, Index, IndexKind, Statement, Table};
use crate::parser::{ParseError, Parser};

/// Differ configuration.
#[derive(Debug, Clone, Default)]
pub struct DiffConfig {
    /// Bracket the output in `BEGIN` / `SET FOREIGN_KEY_CHECKS` /
    /// `COMMIT` statements.
    pub transaction: bool,
    /// The schema as the database actually has it (the concatenated
    /// `SHOW CREATE TABLE` output). Consulted only to recover names for
    /// dropping unnamed indexes; never a source of structural truth.
    pub current_schema: Option<String>,
    /// Indent for the body of generated `CREATE TABLE` statements.
    pub indent: String,
}

/// Errors produced while diffing two schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The source (migrate-from) schema did not parse.
    #[error("failed to parse the source schema: {0}")]
    ParseFrom(#[source] ParseError),
    /// The target (migrate-to) schema did not parse.
    #[error("failed to parse the target schema: {0}")]
    ParseTo(#[source] ParseError),
    /// The current schema did not parse.
    #[error("failed to parse the current schema: {0}")]
    ParseCurrent(#[source] ParseError),
    /// An index must be dropped but has no name, and the current schema
    /// does not provide one either.
    #[error("cannot drop index without a name: {id}")]
    UnnamedIndexDrop {
        /// ID of the nameless index.
        id: String,
    },
    /// An ID taken from a schema failed to resolve in that same schema;
    /// this indicates a corrupted model.
    #[error("lookup failed for {what}: {id}")]
    LookupFailed {
        /// What kind of node failed to resolve.
        what: &'static str,
        /// The ID that failed to resolve.
        id: String,
    },
    /// The output sink failed.
    #[error("failed to write diff output")]
    Write(#[from] core::fmt::Error),
}

/// Compare two parsed schemas and return the migration statements, in
/// execution order. Statements carry no trailing `;`.
///
/// # Errors
///
/// See [`DiffError`].
pub fn diff(
    from: &[Statement],
    to: &[Statement],
    config: &DiffConfig,
) -> Result<Vec<String>, DiffError> {
    let current_stmts;
    let current = match &config.current_schema {
        Some(src) => {
            current_stmts = Parser::new(src).parse().map_err(DiffError::ParseCurrent)?;
            Some(current_stmts.as_slice())
        }
        None => None,
    };

    let from_set = table_ids(from);
    let to_set = table_ids(to);
    let format_config = FormatConfig {
        indent: config.indent.clone(),
    };

    let mut result: Vec<String> = Vec::new();
    if config.transaction {
        result.push("BEGIN".to_string());
        result.push("SET FOREIGN_KEY_CHECKS = 0".to_string());
    }

    // drop tables that are no longer wanted
    for id in from_set.difference(&to_set) {
        let table = lookup(from, id)?;
        result.push(format!("DROP TABLE {}", table.name.quoted()));
    }

    // create the new ones
    for id in to_set.difference(&from_set) {
        let table = lookup(to, id)?;
        let mut buf = String::new();
        format::table(&mut buf, table, &format_config)?;
        result.push(buf);
    }

    // alter the survivors
    for id in from_set.intersection(&to_set) {
        let before = lookup(from, id)?;
        let after = lookup(to, id)?;
        let current_table = current.and_then(|stmts| model::lookup_table(stmts, id));

        let mut alter = AlterCtx::new(before, after, current_table);
        alter.run()?;
        if !alter.buf.is_empty() {
            result.push(alter.buf);
        }
    }

    if config.transaction {
        result.push("SET FOREIGN_KEY_CHECKS = 1".to_string());
        result.push("COMMIT".to_string());
    }
    Ok(result)
}

/// Diff two parsed schemas and write the statements to `dst`, each
/// terminated by `;\n`.
///
/// # Errors
///
/// See [`DiffError`].
pub fn statements<W: core::fmt::Write>(
    dst: &mut W,
    from: &[Statement],
    to: &[Statement],
    config: &DiffConfig,
) -> Result<(), DiffError> {
    for stmt in diff(from, to, config)? {
        dst.write_str(&stmt)?;
        dst.write_str(";\n")?;
    }
    Ok(())
}

/// Diff two schema sources and write the statements to `dst`.
///
/// # Errors
///
/// See [`DiffError`].
pub fn strings<W: core::fmt::Write>(
    dst: &mut W,
    from: &str,
    to: &str,
    config: &DiffConfig,
) -> Result<(), DiffError> {
    let from = Parser::new(from).parse().map_err(DiffError::ParseFrom)?;
    let to = Parser::new(to).parse().map_err(DiffError::ParseTo)?;
    statements(dst, &from, &to, config)
}

fn table_ids(stmts: &[Statement]) -> BTreeSet<String> {
    stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::Table(t) => Some(t.id()),
            _ => None,
        })
        .collect()
}

fn lookup<'a>(stmts: &'a [Statement], id: &str) -> Result<&'a Table, DiffError> {
    model::lookup_table(stmts, id).ok_or_else(|| DiffError::LookupFailed {
        what: "table",
        id: id.to_string(),
    })
}

/// Per-table diff state. All alter specifications for one table collect
/// into a single `ALTER TABLE` statement, in an order MySQL can execute:
/// indexes drop before the columns they cover, foreign keys drop before
/// the indexes they depend on, and plain indexes are added before foreign
/// keys so the names of implicitly created indexes stay predictable.
struct AlterCtx<'a> {
    from: &'a Table,
    to: &'a Table,
    current: Option<&'a Table>,
    from_columns: BTreeSet<String>,
    to_columns: BTreeSet<String>,
    from_indexes: BTreeSet<String>,
    to_indexes: BTreeSet<String>,
    buf: String,
}

impl<'a> AlterCtx<'a> {
    fn new(from: &'a Table, to: &'a Table, current: Option<&'a Table>) -> Self {
        Self {
            from_columns: from.columns.iter().map(|c| c.id()).collect(),
            to_columns: to.columns.iter().map(|c| c.id()).collect(),
            from_indexes: from.indexes.iter().map(|i| i.id()).collect(),
            to_indexes: to.indexes.iter().map(|i| i.id()).collect(),
            from,
            to,
            current,
            buf: String::new(),
        }
    }

    fn run(&mut self) -> Result<(), DiffError> {
        self.drop_indexes()?;
        self.drop_columns()?;
        self.add_columns()?;
        self.change_columns()?;
        self.add_indexes()
    }

    /// Open a new alter specification.
    fn begin(&mut self) {
        if self.buf.is_empty() {
            self.buf.push_str("ALTER TABLE ");
            self.buf.push_str(&self.from.name.quoted());
            self.buf.push(' ');
        } else {
            self.buf.push_str(", ");
        }
    }

    fn drop_indexes(&mut self) -> Result<(), DiffError> {
        let ids: Vec<String> = self
            .from_indexes
            .difference(&self.to_indexes)
            .cloned()
            .collect();

        // plain index drops run after the foreign-key drops; MySQL will
        // not drop an index a foreign key still depends on
        let mut lazy: Vec<Ident> = Vec::new();
        for id in &ids {
            let from = self.from;
            let index = from.lookup_index(id).ok_or_else(|| DiffError::LookupFailed {
                what: "index",
                id: id.clone(),
            })?;

            if index.kind == IndexKind::PrimaryKey {
                self.begin();
                self.buf.push_str("DROP PRIMARY KEY");
                continue;
            }

            let name = match index.drop_name() {
                Some(name) => name.clone(),
                None => self.guess_index_name(index)?,
            };
            if index.kind == IndexKind::ForeignKey {
                self.begin();
                write!(self.buf, "DROP FOREIGN KEY {}", name.quoted())?;
            } else {
                lazy.push(name);
            }
        }

        for name in lazy {
            self.begin();
            write!(self.buf, "DROP INDEX {}", name.quoted())?;
        }
        Ok(())
    }

    /// Recover the name of an unnamed index from the currently deployed
    /// schema: an index over there with the same definition, whose name no
    /// index in the source schema already claims.
    fn guess_index_name(&self, target: &Index) -> Result<Ident, DiffError> {
        let Some(current) = self.current else {
            return Err(DiffError::UnnamedIndexDrop { id: target.id() });
        };

        'candidates: for candidate in &current.indexes {
            if !candidate.same_definition(target) {
                continue;
            }
            let Some(name) = candidate.drop_name() else {
                continue;
            };
            for index in &self.from.indexes {
                if index.drop_name() == Some(name) {
                    continue 'candidates;
                }
            }
            return Ok(name.clone());
        }
        Err(DiffError::UnnamedIndexDrop { id: target.id() })
    }

    fn drop_columns(&mut self) -> Result<(), DiffError> {
        let ids: Vec<String> = self
            .from_columns
            .difference(&self.to_columns)
            .cloned()
            .collect();
        for id in &ids {
            let from = self.from;
            let column = from
                .lookup_column(id)
                .ok_or_else(|| DiffError::LookupFailed {
                    what: "column",
                    id: id.clone(),
                })?;
            let name = column.name.quoted();
            self.begin();
            self.buf.push_str("DROP COLUMN ");
            self.buf.push_str(&name);
        }
        Ok(())
    }

    /// Add the new columns with explicit `FIRST` / `AFTER` anchors so the
    /// final column order matches the target declaration order. Columns
    /// anchored on pre-existing columns go first (sorted by name); columns
    /// anchored on other new columns follow in target declaration order,
    /// so every anchor exists by the time it is referenced.
    fn add_columns(&mut self) -> Result<(), DiffError> {
        let to = self.to;

        let mut first_column: Option<String> = None;
        let mut before_to_next: BTreeMap<String, String> = BTreeMap::new();
        let mut next_to_before: BTreeMap<String, String> = BTreeMap::new();

        for id in self.to_columns.difference(&self.from_columns) {
            match to.lookup_column_before(id) {
                None => first_column = Some(id.clone()),
                Some(before) => {
                    before_to_next.insert(before.id(), id.clone());
                    next_to_before.insert(id.clone(), before.id());
                }
            }
        }

        // the column with no predecessor is always safe to add
        let mut batch: Vec<String> = Vec::new();
        if let Some(id) = first_column {
            batch.push(id);
        }

        // columns whose anchor already exists in the source table
        let mut anchored: Vec<String> = Vec::new();
        for id in self.to_columns.intersection(&self.from_columns) {
            if let Some(next) = before_to_next.remove(id) {
                next_to_before.remove(&next);
                anchored.push(next);
            }
        }
        anchored.sort();
        batch.extend(anchored);

        // what is left anchors on other new columns; emit in target order
        let mut remaining: Vec<String> = before_to_next.into_values().collect();
        remaining.sort_by_key(|id| to.lookup_column_order(id).unwrap_or(usize::MAX));
        batch.extend(remaining);

        self.write_add_columns(&batch)
    }

    fn write_add_columns(&mut self, ids: &[String]) -> Result<(), DiffError> {
        let to = self.to;
        for id in ids {
            let column = to.lookup_column(id).ok_or_else(|| DiffError::LookupFailed {
                what: "column",
                id: id.clone(),
            })?;
            let before = to.lookup_column_before(id);

            self.begin();
            self.buf.push_str("ADD COLUMN ");
            format::table_column(&mut self.buf, column)?;
            match before {
                Some(before) => write!(self.buf, " AFTER {}", before.name.quoted())?,
                None => self.buf.push_str(" FIRST"),
            }
        }
        Ok(())
    }

    fn change_columns(&mut self) -> Result<(), DiffError> {
        let from = self.from;
        let to = self.to;
        let ids: Vec<String> = self
            .from_columns
            .intersection(&self.to_columns)
            .cloned()
            .collect();

        for id in &ids {
            let lookup_failed = || DiffError::LookupFailed {
                what: "column",
                id: id.clone(),
            };
            let before = from.lookup_column(id).ok_or_else(lookup_failed)?;
            let after = to.lookup_column(id).ok_or_else(lookup_failed)?;
            if before == after {
                continue;
            }

            self.begin();
            write!(self.buf, "CHANGE COLUMN {} ", after.name.quoted())?;
            format::table_column(&mut self.buf, after)?;
        }
        Ok(())
    }

    fn add_indexes(&mut self) -> Result<(), DiffError> {
        let to = self.to;
        let ids: Vec<String> = self
            .to_indexes
            .difference(&self.from_indexes)
            .cloned()
            .collect();

        // foreign keys go last; adding one may implicitly create an index
        // that would collide with a later ADD INDEX
        let mut lazy: Vec<&Index> = Vec::new();
        for id in &ids {
            let index = to.lookup_index(id).ok_or_else(|| DiffError::LookupFailed {
                what: "index",
                id: id.clone(),
            })?;
            if index.kind == IndexKind::ForeignKey {
                lazy.push(index);
                continue;
            }
            self.begin();
            self.buf.push_str("ADD ");
            format::index(&mut self.buf, index)?;
        }

        for index in lazy {
            self.begin();
            self.buf.push_str("ADD ");
            format::index(&mut self.buf, index)?;
        }
        Ok(())
    }
}
