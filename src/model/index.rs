//! Index definitions.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use sha2::{Digest, Sha256};

use super::{Ident, Reference};

/// Sort direction of an index column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// No explicit direction.
    #[default]
    None,
    /// `ASC`.
    Ascending,
    /// `DESC`.
    Descending,
}

/// The kind (purpose) of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// `PRIMARY KEY`.
    PrimaryKey,
    /// Plain `INDEX` / `KEY`.
    Normal,
    /// `UNIQUE INDEX`.
    Unique,
    /// `FULLTEXT INDEX`.
    FullText,
    /// `SPATIAL INDEX`.
    Spatial,
    /// `FOREIGN KEY`.
    ForeignKey,
}

/// The algorithm used by an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexType {
    /// No explicit `USING` clause.
    #[default]
    None,
    /// `USING BTREE`.
    Btree,
    /// `USING HASH`.
    Hash,
}

/// A column within an index: a name, an optional prefix length, and an
/// optional sort direction.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    /// Column name.
    pub name: Ident,
    /// Optional prefix length, e.g. the `(196)` in `` `col`(196) ``.
    pub length: Option<String>,
    /// Optional `ASC` / `DESC`.
    pub sort_direction: SortDirection,
}

impl IndexColumn {
    /// A plain index column reference with no length or direction.
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            length: None,
            sort_direction: SortDirection::None,
        }
    }

    /// The identity key of this index column.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.length {
            Some(length) => format!("index_column#{}-{}", self.name.lower(), length),
            None => format!("index_column#{}", self.name.lower()),
        }
    }
}

/// An index option, such as `WITH PARSER ngram`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOption {
    /// Option key.
    pub key: String,
    /// Option value.
    pub value: String,
    /// Whether the value renders quoted.
    pub need_quotes: bool,
}

/// An index on a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// ID of the parent table. Stored as a string rather than a pointer so
    /// the model stays acyclic and trivially cloneable.
    pub table: String,
    /// The kind of index.
    pub kind: IndexKind,
    /// The `USING` algorithm.
    pub index_type: IndexType,
    /// The index name, if any.
    pub name: Option<Ident>,
    /// The `CONSTRAINT` symbol, if any.
    pub constraint_name: Option<Ident>,
    /// The indexed columns, in order.
    pub columns: Vec<IndexColumn>,
    /// The referenced table for foreign keys.
    pub reference: Option<Reference>,
    /// Index options (`WITH PARSER`, `KEY_BLOCK_SIZE`, ...).
    pub options: Vec<IndexOption>,
}

impl Index {
    /// Create a new, empty index of the given kind on the given table ID.
    pub fn new(kind: IndexKind, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            index_type: IndexType::None,
            name: None,
            constraint_name: None,
            columns: Vec::new(),
            reference: None,
            options: Vec::new(),
        }
    }

    /// The name to use when dropping this index: the explicit name if
    /// present, otherwise the constraint symbol.
    #[must_use]
    pub fn drop_name(&self) -> Option<&Ident> {
        self.name.as_ref().or(self.constraint_name.as_ref())
    }

    /// The identity key of this index.
    ///
    /// An index may or may not have a name, so the key is a content hash
    /// over everything that defines the index: table, constraint symbol,
    /// kind, type, the column list in order, and the reference.
    #[must_use]
    pub fn id(&self) -> String {
        let mut content = String::new();
        let sym = self
            .constraint_name
            .as_ref()
            .map_or("none", |sym| sym.as_str());
        write!(content, "{}.{}.{:?}.{:?}", self.table, sym, self.kind, self.index_type).unwrap();
        for col in &self.columns {
            write!(content, ".{}", col.id()).unwrap();
        }
        if let Some(reference) = &self.reference {
            write!(content, ".{}", reference.id()).unwrap();
        }

        let digest = Sha256::digest(content.as_bytes());
        let mut id = match &self.name {
            Some(name) => format!("index#{name}#"),
            None => String::from("index#"),
        };
        for byte in digest {
            write!(id, "{byte:02x}").unwrap();
        }
        id
    }

    /// Whether `other` has the same definition as `self`, names excluded.
    /// Used to recover the server-assigned name of an anonymous index from
    /// the currently deployed schema.
    #[must_use]
    pub fn same_definition(&self, other: &Index) -> bool {
        self.table == other.table
            && self.kind == other.kind
            && self.index_type == other.index_type
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.id() == b.id())
            && match (&self.reference, &other.reference) {
                (Some(a), Some(b)) => a.id() == b.id(),
                (None, None) => true,
                _ => false,
            }
    }
}
