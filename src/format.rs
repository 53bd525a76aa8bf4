//! Rendering model nodes back to canonical SQL text.
//!
//! The formatter is a plain tree-walk over the model. Formatting a
//! normalized table and re-parsing the output yields the same model, which
//! is what makes the differ's `CREATE TABLE` and `ADD COLUMN` output safe
//! to feed back to MySQL.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::model::{
    Database, Index, IndexColumn, IndexKind, IndexType, NullState, Reference, ReferenceMatch,
    ReferenceOption, SortDirection, Statement, Table, TableColumn, TableOption,
};

/// Formatter configuration.
#[derive(Debug, Clone, Default)]
pub struct FormatConfig {
    /// Prefix for the column and index lines inside a `CREATE TABLE` body.
    pub indent: String,
}

impl FormatConfig {
    /// An indent of `n` repetitions of `unit`.
    #[must_use]
    pub fn indent(unit: &str, n: usize) -> Self {
        Self {
            indent: unit.repeat(n.max(1)),
        }
    }
}

/// Render a statement list as schema SQL, one statement per `;\n`.
///
/// Only `CREATE TABLE` statements appear in the output: the deploy flow
/// manages a single database, so `CREATE DATABASE` statements are parsed
/// but not part of the rendered schema.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn statements<W: Write>(
    dst: &mut W,
    stmts: &[Statement],
    config: &FormatConfig,
) -> fmt::Result {
    for stmt in stmts {
        if let Statement::Table(t) = stmt {
            table(dst, t, config)?;
            dst.write_str(";\n")?;
        }
    }
    Ok(())
}

/// Render a `CREATE DATABASE` statement, without the trailing `;`.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn database<W: Write>(dst: &mut W, d: &Database) -> fmt::Result {
    dst.write_str("CREATE DATABASE")?;
    if d.if_not_exists {
        dst.write_str(" IF NOT EXISTS")?;
    }
    write!(dst, " {}", d.name.quoted())
}

/// Render a `CREATE TABLE` statement, without the trailing `;`.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn table<W: Write>(dst: &mut W, t: &Table, config: &FormatConfig) -> fmt::Result {
    dst.write_str("CREATE")?;
    if t.temporary {
        dst.write_str(" TEMPORARY")?;
    }
    dst.write_str(" TABLE")?;
    if t.if_not_exists {
        dst.write_str(" IF NOT EXISTS")?;
    }
    write!(dst, " {}", t.name.quoted())?;

    if let Some(like) = &t.like_table {
        return write!(dst, " LIKE {}", like.quoted());
    }

    dst.write_str(" (")?;
    for (i, col) in t.columns.iter().enumerate() {
        write!(dst, "\n{}", config.indent)?;
        table_column(dst, col)?;
        if i < t.columns.len() - 1 || !t.indexes.is_empty() {
            dst.write_str(",")?;
        }
    }
    for (i, idx) in t.indexes.iter().enumerate() {
        write!(dst, "\n{}", config.indent)?;
        index(dst, idx)?;
        if i < t.indexes.len() - 1 {
            dst.write_str(",")?;
        }
    }
    dst.write_str("\n)")?;

    if !t.options.is_empty() {
        dst.write_str(" ")?;
        for (i, option) in t.options.iter().enumerate() {
            table_option(dst, option)?;
            if i < t.options.len() - 1 {
                dst.write_str(", ")?;
            }
        }
    }
    Ok(())
}

fn table_option<W: Write>(dst: &mut W, option: &TableOption) -> fmt::Result {
    if option.need_quotes {
        write!(dst, "{} = ", option.key)?;
        quoted_value(dst, &option.value)
    } else {
        write!(dst, "{} = {}", option.key, option.value)
    }
}

/// Render a single column definition, e.g. `` `id` INT (11) NOT NULL ``.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn table_column<W: Write>(dst: &mut W, col: &TableColumn) -> fmt::Result {
    write!(dst, "{} {}", col.name.quoted(), col.ctype)?;

    if !col.enum_values.is_empty() || !col.set_values.is_empty() {
        let values = if col.enum_values.is_empty() {
            &col.set_values
        } else {
            &col.enum_values
        };
        dst.write_str(" (")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                dst.write_str(",")?;
            }
            quoted_value(dst, value)?;
        }
        dst.write_str(")")?;
    } else if let Some(length) = &col.length {
        match &length.decimals {
            Some(decimals) => write!(dst, " ({},{})", length.length, decimals)?,
            None => write!(dst, " ({})", length.length)?,
        }
    }

    if col.unsigned {
        dst.write_str(" UNSIGNED")?;
    }
    if col.zero_fill {
        dst.write_str(" ZEROFILL")?;
    }
    if col.binary {
        dst.write_str(" BINARY")?;
    }
    if let Some(charset) = &col.character_set {
        write!(dst, " CHARACTER SET {}", quoted(charset))?;
    }
    if let Some(collation) = &col.collation {
        write!(dst, " COLLATE {}", quoted(collation))?;
    }
    if let Some(expr) = &col.auto_update {
        write!(dst, " ON UPDATE {expr}")?;
    }
    match col.null_state {
        NullState::None => {}
        NullState::Null => dst.write_str(" NULL")?,
        NullState::NotNull => dst.write_str(" NOT NULL")?,
    }
    if let Some(srid) = col.srid {
        write!(dst, " SRID {srid}")?;
    }
    if let Some(default) = &col.default {
        if default.quoted {
            dst.write_str(" DEFAULT ")?;
            quoted_value(dst, &default.value)?;
        } else {
            write!(dst, " DEFAULT {}", default.value)?;
        }
    }
    if col.auto_increment {
        dst.write_str(" AUTO_INCREMENT")?;
    }
    if col.unique {
        dst.write_str(" UNIQUE KEY")?;
    }
    if col.primary {
        dst.write_str(" PRIMARY KEY")?;
    } else if col.key {
        dst.write_str(" KEY")?;
    }
    if let Some(comment) = &col.comment {
        dst.write_str(" COMMENT ")?;
        quoted_value(dst, comment)?;
    }
    Ok(())
}

/// Render an index or constraint definition.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn index<W: Write>(dst: &mut W, idx: &Index) -> fmt::Result {
    if let Some(sym) = &idx.constraint_name {
        write!(dst, "CONSTRAINT {} ", sym.quoted())?;
    }

    dst.write_str(match idx.kind {
        IndexKind::PrimaryKey => "PRIMARY KEY",
        IndexKind::Normal => "INDEX",
        IndexKind::Unique => "UNIQUE INDEX",
        IndexKind::FullText => "FULLTEXT INDEX",
        IndexKind::Spatial => "SPATIAL INDEX",
        IndexKind::ForeignKey => "FOREIGN KEY",
    })?;

    if let Some(name) = &idx.name {
        write!(dst, " {}", name.quoted())?;
    }
    match idx.index_type {
        IndexType::None => {}
        IndexType::Btree => dst.write_str(" USING BTREE")?,
        IndexType::Hash => dst.write_str(" USING HASH")?,
    }

    dst.write_str(" (")?;
    for (i, col) in idx.columns.iter().enumerate() {
        if i > 0 {
            dst.write_str(", ")?;
        }
        index_column(dst, col)?;
    }
    dst.write_str(")")?;

    for option in &idx.options {
        if option.key == "WITH PARSER" {
            if option.need_quotes {
                write!(dst, " WITH PARSER {}", quoted(&option.value))?;
            } else {
                write!(dst, " WITH PARSER {}", option.value)?;
            }
        } else {
            write!(dst, " {} = {}", option.key, option.value)?;
        }
    }

    if let Some(r) = &idx.reference {
        dst.write_str(" ")?;
        reference(dst, r)?;
    }
    Ok(())
}

fn index_column<W: Write>(dst: &mut W, col: &IndexColumn) -> fmt::Result {
    dst.write_str(&col.name.quoted())?;
    if let Some(length) = &col.length {
        write!(dst, "({length})")?;
    }
    match col.sort_direction {
        SortDirection::None => {}
        SortDirection::Ascending => dst.write_str(" ASC")?,
        SortDirection::Descending => dst.write_str(" DESC")?,
    }
    Ok(())
}

/// Render a `REFERENCES` clause.
///
/// # Errors
///
/// Forwards errors from the sink.
pub fn reference<W: Write>(dst: &mut W, r: &Reference) -> fmt::Result {
    write!(dst, "REFERENCES {} (", r.table_name.quoted())?;
    for (i, col) in r.columns.iter().enumerate() {
        if i > 0 {
            dst.write_str(", ")?;
        }
        index_column(dst, col)?;
    }
    dst.write_str(")")?;

    match r.match_mode {
        ReferenceMatch::None => {}
        ReferenceMatch::Full => dst.write_str(" MATCH FULL")?,
        ReferenceMatch::Partial => dst.write_str(" MATCH PARTIAL")?,
        ReferenceMatch::Simple => dst.write_str(" MATCH SIMPLE")?,
    }
    reference_option(dst, "ON DELETE", r.on_delete)?;
    reference_option(dst, "ON UPDATE", r.on_update)?;
    Ok(())
}

fn reference_option<W: Write>(dst: &mut W, prefix: &str, option: ReferenceOption) -> fmt::Result {
    let action = match option {
        ReferenceOption::None => return Ok(()),
        ReferenceOption::Restrict => "RESTRICT",
        ReferenceOption::Cascade => "CASCADE",
        ReferenceOption::SetNull => "SET NULL",
        ReferenceOption::NoAction => "NO ACTION",
    };
    write!(dst, " {prefix} {action}")
}

/// Backquote a name that the model stores as a plain string.
fn quoted(name: &str) -> String {
    crate::model::Ident::new(name).quoted()
}

/// Single-quote a value, doubling any embedded quote so the lexer reads
/// the same text back.
fn quoted_value<W: Write>(dst: &mut W, value: &str) -> fmt::Result {
    dst.write_str("'")?;
    for c in value.chars() {
        if c == '\'' {
            dst.write_str("''")?;
        } else {
            write!(dst, "{c}")?;
        }
    }
    dst.write_str("'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn format_source(input: &str) -> String {
        let stmts = Parser::new(input).parse().unwrap();
        let mut out = String::new();
        statements(&mut out, &stmts, &FormatConfig::default()).unwrap();
        out
    }

    #[test]
    fn test_indent() {
        let stmts = Parser::new("CREATE TABLE t (id INT NOT NULL)").parse().unwrap();
        let mut out = String::new();
        statements(&mut out, &stmts, &FormatConfig::indent(" ", 2)).unwrap();
        assert_eq!(out, "CREATE TABLE `t` (\n  `id` INT (11) NOT NULL\n);\n");
    }

    #[test]
    fn test_databases_are_not_rendered() {
        assert_eq!(format_source("CREATE DATABASE hoge"), "");
    }

    #[test]
    fn test_format_database_node() {
        let mut out = String::new();
        let mut db = crate::model::Database::new("hoge");
        db.if_not_exists = true;
        database(&mut out, &db).unwrap();
        assert_eq!(out, "CREATE DATABASE IF NOT EXISTS `hoge`");
    }

    #[test]
    fn test_reference_actions() {
        let out = format_source(
            "CREATE TABLE t (c INT, FOREIGN KEY fk (c) REFERENCES f (id) ON DELETE NO ACTION ON UPDATE CASCADE)",
        );
        assert!(
            out.contains("REFERENCES `f` (`id`) ON DELETE NO ACTION ON UPDATE CASCADE"),
            "{out}"
        );
    }

    #[test]
    fn test_set_column_values() {
        let out =
            format_source("CREATE TABLE t (s SET('a', 'b') NOT NULL, e ENUM('x') NOT NULL)");
        assert!(out.contains("`s` SET ('a','b') NOT NULL"), "{out}");
        assert!(out.contains("`e` ENUM ('x') NOT NULL"), "{out}");
    }
}
