//! Column definitions and their normalization rules.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::Ident;

/// The MySQL DDL column type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ColumnType {
    Bit,
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Numeric,
    Real,
    Bool,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
    Char,
    VarChar,
    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    TinyText,
    Text,
    MediumText,
    LongText,
    Enum,
    Set,
    Json,
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl ColumnType {
    /// The SQL spelling of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Bit => "BIT",
            ColumnType::TinyInt => "TINYINT",
            ColumnType::SmallInt => "SMALLINT",
            ColumnType::MediumInt => "MEDIUMINT",
            ColumnType::Int => "INT",
            ColumnType::Integer => "INTEGER",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::Real => "REAL",
            ColumnType::Bool => "BOOL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Year => "YEAR",
            ColumnType::Char => "CHAR",
            ColumnType::VarChar => "VARCHAR",
            ColumnType::Binary => "BINARY",
            ColumnType::VarBinary => "VARBINARY",
            ColumnType::TinyBlob => "TINYBLOB",
            ColumnType::Blob => "BLOB",
            ColumnType::MediumBlob => "MEDIUMBLOB",
            ColumnType::LongBlob => "LONGBLOB",
            ColumnType::TinyText => "TINYTEXT",
            ColumnType::Text => "TEXT",
            ColumnType::MediumText => "MEDIUMTEXT",
            ColumnType::LongText => "LONGTEXT",
            ColumnType::Enum => "ENUM",
            ColumnType::Set => "SET",
            ColumnType::Json => "JSON",
            ColumnType::Geometry => "GEOMETRY",
            ColumnType::Point => "POINT",
            ColumnType::LineString => "LINESTRING",
            ColumnType::Polygon => "POLYGON",
            ColumnType::MultiPoint => "MULTIPOINT",
            ColumnType::MultiLineString => "MULTILINESTRING",
            ColumnType::MultiPolygon => "MULTIPOLYGON",
            ColumnType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// The canonical type this one rewrites to during normalization.
    /// `INTEGER` is `INT`, `BOOL`/`BOOLEAN` are `TINYINT`, `NUMERIC` is
    /// `DECIMAL`; every other type is its own synonym.
    #[must_use]
    pub fn synonym(self) -> ColumnType {
        match self {
            ColumnType::Integer => ColumnType::Int,
            ColumnType::Bool | ColumnType::Boolean => ColumnType::TinyInt,
            ColumnType::Numeric => ColumnType::Decimal,
            other => other,
        }
    }

    /// Numeric types whose quoted defaults get unquoted.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::MediumInt
                | ColumnType::Int
                | ColumnType::Integer
                | ColumnType::BigInt
                | ColumnType::Float
                | ColumnType::Double
                | ColumnType::Decimal
                | ColumnType::Numeric
                | ColumnType::Real
        )
    }

    /// TEXT and BLOB types cannot have defaults, implicit or otherwise.
    #[must_use]
    pub fn is_text_or_blob(self) -> bool {
        matches!(
            self,
            ColumnType::TinyText
                | ColumnType::Text
                | ColumnType::MediumText
                | ColumnType::LongText
                | ColumnType::TinyBlob
                | ColumnType::Blob
                | ColumnType::MediumBlob
                | ColumnType::LongBlob
        )
    }
}

impl core::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The display length of a column type, e.g. the `(10,2)` in
/// `DECIMAL (10,2)`. Lengths are kept as the source digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Length {
    /// The length itself.
    pub length: String,
    /// The optional number of decimals.
    pub decimals: Option<String>,
}

impl Length {
    /// A length without decimals.
    pub fn new(length: impl Into<String>) -> Self {
        Self {
            length: length.into(),
            decimals: None,
        }
    }

    /// A length with decimals.
    pub fn with_decimals(length: impl Into<String>, decimals: impl Into<String>) -> Self {
        Self {
            length: length.into(),
            decimals: Some(decimals.into()),
        }
    }
}

/// Whether a column was declared `NULL`, `NOT NULL`, or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullState {
    /// No explicit declaration.
    #[default]
    None,
    /// Explicit `NULL`.
    Null,
    /// Explicit `NOT NULL`.
    NotNull,
}

/// A `DEFAULT` clause value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
    /// The value text.
    pub value: String,
    /// Whether the value renders single-quoted.
    pub quoted: bool,
}

impl DefaultValue {
    /// An unquoted default, e.g. a number or `CURRENT_TIMESTAMP`.
    pub fn raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// A quoted string default.
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }
}

/// A column definition of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    /// Column name.
    pub name: Ident,
    /// Column type.
    pub ctype: ColumnType,
    /// Optional display length.
    pub length: Option<Length>,
    /// `NULL` / `NOT NULL` declaration.
    pub null_state: NullState,
    /// `CHARACTER SET` clause.
    pub character_set: Option<String>,
    /// `COLLATE` clause.
    pub collation: Option<String>,
    /// `DEFAULT` clause.
    pub default: Option<DefaultValue>,
    /// `COMMENT` clause.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, e.g. `CURRENT_TIMESTAMP`.
    pub auto_update: Option<String>,
    /// `ENUM` value list.
    pub enum_values: Vec<String>,
    /// `SET` value list.
    pub set_values: Vec<String>,
    /// `AUTO_INCREMENT` flag.
    pub auto_increment: bool,
    /// `BINARY` type attribute.
    pub binary: bool,
    /// Column-level `KEY`.
    pub key: bool,
    /// Column-level `PRIMARY KEY`.
    pub primary: bool,
    /// Column-level `UNIQUE`.
    pub unique: bool,
    /// `UNSIGNED` type attribute.
    pub unsigned: bool,
    /// `ZEROFILL` type attribute.
    pub zero_fill: bool,
    /// `SRID` attribute for spatial columns.
    pub srid: Option<u32>,
}

impl TableColumn {
    /// Create a new column with the given name and type.
    pub fn new(name: impl Into<Ident>, ctype: ColumnType) -> Self {
        Self {
            name: name.into(),
            ctype,
            length: None,
            null_state: NullState::None,
            character_set: None,
            collation: None,
            default: None,
            comment: None,
            auto_update: None,
            enum_values: Vec::new(),
            set_values: Vec::new(),
            auto_increment: false,
            binary: false,
            key: false,
            primary: false,
            unique: false,
            unsigned: false,
            zero_fill: false,
            srid: None,
        }
    }

    /// The identity key of this column.
    #[must_use]
    pub fn id(&self) -> String {
        format!("tablecol#{}", self.name.lower())
    }

    /// The display length MySQL assigns when the declaration omits one.
    /// Types without an implicit length return `None`.
    #[must_use]
    pub fn native_length(&self) -> Option<Length> {
        let unsigned = usize::from(self.unsigned);
        let size = match self.ctype {
            // BOOL and BOOLEAN are TINYINT(1)
            ColumnType::Bool | ColumnType::Boolean => 1,
            ColumnType::TinyInt => 4 - unsigned,
            ColumnType::SmallInt => 6 - unsigned,
            ColumnType::MediumInt => 9 - unsigned,
            ColumnType::Int | ColumnType::Integer => 11 - unsigned,
            ColumnType::BigInt => 20,
            // DECIMAL(M) means DECIMAL(M,0), and M defaults to 10
            // https://dev.mysql.com/doc/refman/8.0/en/fixed-point-types.html
            ColumnType::Decimal | ColumnType::Numeric => {
                return Some(Length::with_decimals("10", "0"));
            }
            _ => return None,
        };
        Some(Length::new(size.to_string()))
    }

    /// Rewrite this column into its canonical form: fill in the native
    /// length, replace the type with its synonym, collapse explicit `NULL`
    /// into the unspecified state, unquote numeric defaults, rewrite
    /// boolean `TRUE`/`FALSE` defaults to `1`/`0`, and give nullable
    /// non-TEXT/BLOB columns their implicit `DEFAULT NULL`.
    #[must_use]
    pub fn normalize(&self) -> TableColumn {
        let mut col = self.clone();

        if col.length.is_none() {
            col.length = self.native_length();
        }

        if col.null_state == NullState::Null {
            col.null_state = NullState::None;
        }

        match &mut col.default {
            Some(default) => {
                if self.ctype.is_numeric() {
                    default.quoted = false;
                } else if matches!(self.ctype, ColumnType::Bool | ColumnType::Boolean) {
                    match default.value.as_str() {
                        "TRUE" => *default = DefaultValue::raw("1"),
                        "FALSE" => *default = DefaultValue::raw("0"),
                        _ => {}
                    }
                }
            }
            None => {
                if !self.ctype.is_text_or_blob() && col.null_state != NullState::NotNull {
                    col.default = Some(DefaultValue::raw("NULL"));
                }
            }
        }

        col.ctype = self.ctype.synonym();
        col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(ctype: ColumnType) -> TableColumn {
        let mut c = TableColumn::new("c", ctype);
        c.null_state = NullState::NotNull;
        c
    }

    #[test]
    fn test_native_lengths() {
        let cases = [
            (ColumnType::TinyInt, false, Some(Length::new("4"))),
            (ColumnType::TinyInt, true, Some(Length::new("3"))),
            (ColumnType::SmallInt, false, Some(Length::new("6"))),
            (ColumnType::SmallInt, true, Some(Length::new("5"))),
            (ColumnType::MediumInt, false, Some(Length::new("9"))),
            (ColumnType::MediumInt, true, Some(Length::new("8"))),
            (ColumnType::Int, false, Some(Length::new("11"))),
            (ColumnType::Int, true, Some(Length::new("10"))),
            (ColumnType::Integer, false, Some(Length::new("11"))),
            (ColumnType::BigInt, false, Some(Length::new("20"))),
            (ColumnType::BigInt, true, Some(Length::new("20"))),
            (ColumnType::Bool, false, Some(Length::new("1"))),
            (
                ColumnType::Decimal,
                false,
                Some(Length::with_decimals("10", "0")),
            ),
            (ColumnType::VarChar, false, None),
            (ColumnType::Text, false, None),
        ];
        for (ctype, unsigned, want) in cases {
            let mut c = col(ctype);
            c.unsigned = unsigned;
            assert_eq!(c.native_length(), want, "{ctype:?} unsigned={unsigned}");
        }
    }

    #[test]
    fn test_normalize_synonym_and_length() {
        let n = col(ColumnType::Integer).normalize();
        assert_eq!(n.ctype, ColumnType::Int);
        assert_eq!(n.length, Some(Length::new("11")));
    }

    #[test]
    fn test_normalize_explicit_null_collapses() {
        let mut c = col(ColumnType::Int);
        c.null_state = NullState::Null;
        let n = c.normalize();
        assert_eq!(n.null_state, NullState::None);
    }

    #[test]
    fn test_normalize_unquotes_numeric_default() {
        let mut c = col(ColumnType::Int);
        c.default = Some(DefaultValue::quoted("0"));
        let n = c.normalize();
        assert_eq!(n.default, Some(DefaultValue::raw("0")));
    }

    #[test]
    fn test_normalize_boolean_defaults() {
        let mut c = col(ColumnType::Boolean);
        c.default = Some(DefaultValue::raw("TRUE"));
        let n = c.normalize();
        assert_eq!(n.ctype, ColumnType::TinyInt);
        assert_eq!(n.length, Some(Length::new("1")));
        assert_eq!(n.default, Some(DefaultValue::raw("1")));
    }

    #[test]
    fn test_normalize_implicit_default_null() {
        let mut c = TableColumn::new("c", ColumnType::Int);
        c.null_state = NullState::None;
        let n = c.normalize();
        assert_eq!(n.default, Some(DefaultValue::raw("NULL")));

        // TEXT and BLOB types never get one
        let t = TableColumn::new("c", ColumnType::Text).normalize();
        assert_eq!(t.default, None);
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut c = TableColumn::new("c", ColumnType::Boolean);
        c.default = Some(DefaultValue::raw("FALSE"));
        let once = c.normalize();
        assert_eq!(once.normalize(), once);

        let mut c = TableColumn::new("c", ColumnType::Integer);
        c.null_state = NullState::Null;
        let once = c.normalize();
        assert_eq!(once.normalize(), once);
    }
}
