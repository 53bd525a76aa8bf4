//! Lexer for the MySQL DDL subset.
//!
//! The lexer turns a source string into a flat vector of positioned
//! [`Token`]s. Whitespace and comments are emitted as tokens of their own
//! (the parser filters them), so every byte of the input is accounted for
//! and error messages can point back into the source.

use alloc::string::String;
use alloc::vec::Vec;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub ttype: TokenType,
    /// The literal value. For quoted identifiers this is the unescaped
    /// inner text; for everything else, the raw source slice.
    pub value: String,
    /// Byte offset of the first character.
    pub pos: usize,
    /// 1-based source line.
    pub line: usize,
    /// Column of the first character. The counter resets to 0 on a newline,
    /// so the first token on a continuation line reports column 0.
    pub col: usize,
    /// Set on the end-of-input token.
    pub eof: bool,
}

/// The kinds of tokens the lexer understands.
///
/// Reserved words get a variant each; any other word is an [`Ident`].
///
/// [`Ident`]: TokenType::Ident
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TokenType {
    Illegal,
    Eof,
    Space,
    Ident,
    BacktickIdent,
    DoubleQuoteIdent,
    SingleQuoteIdent,
    Number,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    Slash,
    Asterisk,
    Dash,
    Plus,
    Equal,
    Comment,

    Action,
    Asc,
    AutoIncrement,
    AvgRowLength,
    Bigint,
    Binary,
    Bit,
    Blob,
    Bool,
    Boolean,
    Btree,
    Cascade,
    Char,
    Character,
    Charset,
    Check,
    Checksum,
    Collate,
    CommentKeyword,
    Compact,
    Compressed,
    Connection,
    Constraint,
    Create,
    CurrentTimestamp,
    Data,
    Database,
    Date,
    Datetime,
    Decimal,
    Default,
    DelayKeyWrite,
    Delete,
    Desc,
    Directory,
    Disk,
    Double,
    Drop,
    Dynamic,
    Engine,
    Enum,
    Exists,
    False,
    First,
    Fixed,
    Float,
    Foreign,
    Full,
    Fulltext,
    Geometry,
    GeometryCollection,
    Hash,
    If,
    Index,
    InsertMethod,
    Int,
    Integer,
    Json,
    KeyBlockSize,
    Key,
    Last,
    Like,
    Linestring,
    Longblob,
    Longtext,
    Match,
    MaxRows,
    Mediumblob,
    Mediumint,
    Mediumtext,
    Memory,
    MinRows,
    Multilinestring,
    Multipoint,
    Multipolygon,
    No,
    Not,
    Now,
    Null,
    Numeric,
    On,
    PackKeys,
    Parser,
    Partial,
    Password,
    Point,
    Polygon,
    Primary,
    Real,
    Redundant,
    References,
    Restrict,
    RowFormat,
    Set,
    Simple,
    Smallint,
    Spatial,
    Srid,
    StatsAutoRecalc,
    StatsPersistent,
    StatsSamplePages,
    Storage,
    Table,
    Tablespace,
    Temporary,
    Text,
    Time,
    Timestamp,
    Tinyblob,
    Tinyint,
    Tinytext,
    True,
    Union,
    Unique,
    Unsigned,
    Update,
    Use,
    Using,
    Varbinary,
    Varchar,
    With,
    Year,
    Zerofill,
}

impl core::fmt::Display for TokenType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TokenType {
    /// The SQL-facing name of the token, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Space => "SPACE",
            TokenType::Ident => "IDENT",
            TokenType::BacktickIdent => "BACKTICK_IDENT",
            TokenType::DoubleQuoteIdent => "DOUBLE_QUOTE_IDENT",
            TokenType::SingleQuoteIdent => "SINGLE_QUOTE_IDENT",
            TokenType::Number => "NUMBER",
            TokenType::LParen => "LPAREN",
            TokenType::RParen => "RPAREN",
            TokenType::Comma => "COMMA",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Dot => "DOT",
            TokenType::Slash => "SLASH",
            TokenType::Asterisk => "ASTERISK",
            TokenType::Dash => "DASH",
            TokenType::Plus => "PLUS",
            TokenType::Equal => "EQUAL",
            TokenType::Comment => "COMMENT_IDENT",
            TokenType::Action => "ACTION",
            TokenType::Asc => "ASC",
            TokenType::AutoIncrement => "AUTO_INCREMENT",
            TokenType::AvgRowLength => "AVG_ROW_LENGTH",
            TokenType::Bigint => "BIGINT",
            TokenType::Binary => "BINARY",
            TokenType::Bit => "BIT",
            TokenType::Blob => "BLOB",
            TokenType::Bool => "BOOL",
            TokenType::Boolean => "BOOLEAN",
            TokenType::Btree => "BTREE",
            TokenType::Cascade => "CASCADE",
            TokenType::Char => "CHAR",
            TokenType::Character => "CHARACTER",
            TokenType::Charset => "CHARSET",
            TokenType::Check => "CHECK",
            TokenType::Checksum => "CHECKSUM",
            TokenType::Collate => "COLLATE",
            TokenType::CommentKeyword => "COMMENT",
            TokenType::Compact => "COMPACT",
            TokenType::Compressed => "COMPRESSED",
            TokenType::Connection => "CONNECTION",
            TokenType::Constraint => "CONSTRAINT",
            TokenType::Create => "CREATE",
            TokenType::CurrentTimestamp => "CURRENT_TIMESTAMP",
            TokenType::Data => "DATA",
            TokenType::Database => "DATABASE",
            TokenType::Date => "DATE",
            TokenType::Datetime => "DATETIME",
            TokenType::Decimal => "DECIMAL",
            TokenType::Default => "DEFAULT",
            TokenType::DelayKeyWrite => "DELAY_KEY_WRITE",
            TokenType::Delete => "DELETE",
            TokenType::Desc => "DESC",
            TokenType::Directory => "DIRECTORY",
            TokenType::Disk => "DISK",
            TokenType::Double => "DOUBLE",
            TokenType::Drop => "DROP",
            TokenType::Dynamic => "DYNAMIC",
            TokenType::Engine => "ENGINE",
            TokenType::Enum => "ENUM",
            TokenType::Exists => "EXISTS",
            TokenType::False => "FALSE",
            TokenType::First => "FIRST",
            TokenType::Fixed => "FIXED",
            TokenType::Float => "FLOAT",
            TokenType::Foreign => "FOREIGN",
            TokenType::Full => "FULL",
            TokenType::Fulltext => "FULLTEXT",
            TokenType::Geometry => "GEOMETRY",
            TokenType::GeometryCollection => "GEOMETRYCOLLECTION",
            TokenType::Hash => "HASH",
            TokenType::If => "IF",
            TokenType::Index => "INDEX",
            TokenType::InsertMethod => "INSERT_METHOD",
            TokenType::Int => "INT",
            TokenType::Integer => "INTEGER",
            TokenType::Json => "JSON",
            TokenType::KeyBlockSize => "KEY_BLOCK_SIZE",
            TokenType::Key => "KEY",
            TokenType::Last => "LAST",
            TokenType::Like => "LIKE",
            TokenType::Linestring => "LINESTRING",
            TokenType::Longblob => "LONGBLOB",
            TokenType::Longtext => "LONGTEXT",
            TokenType::Match => "MATCH",
            TokenType::MaxRows => "MAX_ROWS",
            TokenType::Mediumblob => "MEDIUMBLOB",
            TokenType::Mediumint => "MEDIUMINT",
            TokenType::Mediumtext => "MEDIUMTEXT",
            TokenType::Memory => "MEMORY",
            TokenType::MinRows => "MIN_ROWS",
            TokenType::Multilinestring => "MULTILINESTRING",
            TokenType::Multipoint => "MULTIPOINT",
            TokenType::Multipolygon => "MULTIPOLYGON",
            TokenType::No => "NO",
            TokenType::Not => "NOT",
            TokenType::Now => "NOW",
            TokenType::Null => "NULL",
            TokenType::Numeric => "NUMERIC",
            TokenType::On => "ON",
            TokenType::PackKeys => "PACK_KEYS",
            TokenType::Parser => "PARSER",
            TokenType::Partial => "PARTIAL",
            TokenType::Password => "PASSWORD",
            TokenType::Point => "POINT",
            TokenType::Polygon => "POLYGON",
            TokenType::Primary => "PRIMARY",
            TokenType::Real => "REAL",
            TokenType::Redundant => "REDUNDANT",
            TokenType::References => "REFERENCES",
            TokenType::Restrict => "RESTRICT",
            TokenType::RowFormat => "ROW_FORMAT",
            TokenType::Set => "SET",
            TokenType::Simple => "SIMPLE",
            TokenType::Smallint => "SMALLINT",
            TokenType::Spatial => "SPATIAL",
            TokenType::Srid => "SRID",
            TokenType::StatsAutoRecalc => "STATS_AUTO_RECALC",
            TokenType::StatsPersistent => "STATS_PERSISTENT",
            TokenType::StatsSamplePages => "STATS_SAMPLE_PAGES",
            TokenType::Storage => "STORAGE",
            TokenType::Table => "TABLE",
            TokenType::Tablespace => "TABLESPACE",
            TokenType::Temporary => "TEMPORARY",
            TokenType::Text => "TEXT",
            TokenType::Time => "TIME",
            TokenType::Timestamp => "TIMESTAMP",
            TokenType::Tinyblob => "TINYBLOB",
            TokenType::Tinyint => "TINYINT",
            TokenType::Tinytext => "TINYTEXT",
            TokenType::True => "TRUE",
            TokenType::Union => "UNION",
            TokenType::Unique => "UNIQUE",
            TokenType::Unsigned => "UNSIGNED",
            TokenType::Update => "UPDATE",
            TokenType::Use => "USE",
            TokenType::Using => "USING",
            TokenType::Varbinary => "VARBINARY",
            TokenType::Varchar => "VARCHAR",
            TokenType::With => "WITH",
            TokenType::Year => "YEAR",
            TokenType::Zerofill => "ZEROFILL",
        }
    }
}

/// Map an uppercased word to its reserved-word token type.
fn keyword(upper: &str) -> Option<TokenType> {
    Some(match upper {
        "ACTION" => TokenType::Action,
        "ASC" => TokenType::Asc,
        "AUTO_INCREMENT" => TokenType::AutoIncrement,
        "AVG_ROW_LENGTH" => TokenType::AvgRowLength,
        "BIGINT" => TokenType::Bigint,
        "BINARY" => TokenType::Binary,
        "BIT" => TokenType::Bit,
        "BLOB" => TokenType::Blob,
        "BOOL" => TokenType::Bool,
        "BOOLEAN" => TokenType::Boolean,
        "BTREE" => TokenType::Btree,
        "CASCADE" => TokenType::Cascade,
        "CHAR" => TokenType::Char,
        "CHARACTER" => TokenType::Character,
        "CHARSET" => TokenType::Charset,
        "CHECK" => TokenType::Check,
        "CHECKSUM" => TokenType::Checksum,
        "COLLATE" => TokenType::Collate,
        "COMMENT" => TokenType::CommentKeyword,
        "COMPACT" => TokenType::Compact,
        "COMPRESSED" => TokenType::Compressed,
        "CONNECTION" => TokenType::Connection,
        "CONSTRAINT" => TokenType::Constraint,
        "CREATE" => TokenType::Create,
        "CURRENT_TIMESTAMP" => TokenType::CurrentTimestamp,
        "DATA" => TokenType::Data,
        "DATABASE" => TokenType::Database,
        "DATE" => TokenType::Date,
        "DATETIME" => TokenType::Datetime,
        "DECIMAL" => TokenType::Decimal,
        "DEFAULT" => TokenType::Default,
        "DELAY_KEY_WRITE" => TokenType::DelayKeyWrite,
        "DELETE" => TokenType::Delete,
        "DESC" => TokenType::Desc,
        "DIRECTORY" => TokenType::Directory,
        "DISK" => TokenType::Disk,
        "DOUBLE" => TokenType::Double,
        "DROP" => TokenType::Drop,
        "DYNAMIC" => TokenType::Dynamic,
        "ENGINE" => TokenType::Engine,
        "ENUM" => TokenType::Enum,
        "EXISTS" => TokenType::Exists,
        "FALSE" => TokenType::False,
        "FIRST" => TokenType::First,
        "FIXED" => TokenType::Fixed,
        "FLOAT" => TokenType::Float,
        "FOREIGN" => TokenType::Foreign,
        "FULL" => TokenType::Full,
        "FULLTEXT" => TokenType::Fulltext,
        "GEOMETRY" => TokenType::Geometry,
        "GEOMETRYCOLLECTION" => TokenType::GeometryCollection,
        "HASH" => TokenType::Hash,
        "IF" => TokenType::If,
        "INDEX" => TokenType::Index,
        "INSERT_METHOD" => TokenType::InsertMethod,
        "INT" => TokenType::Int,
        "INTEGER" => TokenType::Integer,
        "JSON" => TokenType::Json,
        "KEY_BLOCK_SIZE" => TokenType::KeyBlockSize,
        "KEY" => TokenType::Key,
        "LAST" => TokenType::Last,
        "LIKE" => TokenType::Like,
        "LINESTRING" => TokenType::Linestring,
        "LONGBLOB" => TokenType::Longblob,
        "LONGTEXT" => TokenType::Longtext,
        "MATCH" => TokenType::Match,
        "MAX_ROWS" => TokenType::MaxRows,
        "MEDIUMBLOB" => TokenType::Mediumblob,
        "MEDIUMINT" => TokenType::Mediumint,
        "MEDIUMTEXT" => TokenType::Mediumtext,
        "MEMORY" => TokenType::Memory,
        "MIN_ROWS" => TokenType::MinRows,
        "MULTILINESTRING" => TokenType::Multilinestring,
        "MULTIPOINT" => TokenType::Multipoint,
        "MULTIPOLYGON" => TokenType::Multipolygon,
        "NO" => TokenType::No,
        "NOT" => TokenType::Not,
        "NOW" => TokenType::Now,
        "NULL" => TokenType::Null,
        "NUMERIC" => TokenType::Numeric,
        "ON" => TokenType::On,
        "PACK_KEYS" => TokenType::PackKeys,
        "PARSER" => TokenType::Parser,
        "PARTIAL" => TokenType::Partial,
        "PASSWORD" => TokenType::Password,
        "POINT" => TokenType::Point,
        "POLYGON" => TokenType::Polygon,
        "PRIMARY" => TokenType::Primary,
        "REAL" => TokenType::Real,
        "REDUNDANT" => TokenType::Redundant,
        "REFERENCES" => TokenType::References,
        "RESTRICT" => TokenType::Restrict,
        "ROW_FORMAT" => TokenType::RowFormat,
        "SET" => TokenType::Set,
        "SIMPLE" => TokenType::Simple,
        "SMALLINT" => TokenType::Smallint,
        "SPATIAL" => TokenType::Spatial,
        "SRID" => TokenType::Srid,
        "STATS_AUTO_RECALC" => TokenType::StatsAutoRecalc,
        "STATS_PERSISTENT" => TokenType::StatsPersistent,
        "STATS_SAMPLE_PAGES" => TokenType::StatsSamplePages,
        "STORAGE" => TokenType::Storage,
        "TABLE" => TokenType::Table,
        "TABLESPACE" => TokenType::Tablespace,
        "TEMPORARY" => TokenType::Temporary,
        "TEXT" => TokenType::Text,
        "TIME" => TokenType::Time,
        "TIMESTAMP" => TokenType::Timestamp,
        "TINYBLOB" => TokenType::Tinyblob,
        "TINYINT" => TokenType::Tinyint,
        "TINYTEXT" => TokenType::Tinytext,
        "TRUE" => TokenType::True,
        "UNION" => TokenType::Union,
        "UNIQUE" => TokenType::Unique,
        "UNSIGNED" => TokenType::Unsigned,
        "UPDATE" => TokenType::Update,
        "USE" => TokenType::Use,
        "USING" => TokenType::Using,
        "VARBINARY" => TokenType::Varbinary,
        "VARCHAR" => TokenType::Varchar,
        "WITH" => TokenType::With,
        "YEAR" => TokenType::Year,
        "ZEROFILL" => TokenType::Zerofill,
        _ => return None,
    })
}

/// Tokenize `input`. The returned vector always ends with an EOF token;
/// malformed input surfaces as an [`TokenType::Illegal`] token rather than
/// an error, and the parser reports it with position information.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).run()
}

#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    col: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    out: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            out: Vec::new(),
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn emit(&mut self, ttype: TokenType, start: Mark) {
        let value = String::from(&self.input[start.pos..self.pos]);
        self.emit_value(ttype, start, value);
    }

    fn emit_value(&mut self, ttype: TokenType, start: Mark, value: String) {
        self.out.push(Token {
            ttype,
            value,
            pos: start.pos,
            line: start.line,
            col: start.col,
            eof: false,
        });
    }

    fn emit_eof(&mut self) {
        self.out.push(Token {
            ttype: TokenType::Eof,
            value: String::new(),
            pos: self.input.len(),
            line: self.line,
            col: self.col,
            eof: true,
        });
    }

    fn run(mut self) -> Vec<Token> {
        loop {
            let start = self.mark();
            let Some(c) = self.peek_char() else {
                self.emit_eof();
                return self.out;
            };

            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    while matches!(self.peek_char(), Some(' ' | '\t' | '\r' | '\n')) {
                        self.bump();
                    }
                    self.emit(TokenType::Space, start);
                }
                'a'..='z' | 'A'..='Z' => {
                    self.run_ident();
                    let word = &self.input[start.pos..self.pos];
                    let mut upper = String::from(word);
                    upper.make_ascii_uppercase();
                    let ttype = keyword(&upper).unwrap_or(TokenType::Ident);
                    self.emit(ttype, start);
                }
                '0'..='9' => {
                    self.run_number();
                    self.emit(TokenType::Number, start);
                }
                '`' | '"' | '\'' => {
                    let ttype = match c {
                        '`' => TokenType::BacktickIdent,
                        '"' => TokenType::DoubleQuoteIdent,
                        _ => TokenType::SingleQuoteIdent,
                    };
                    match self.run_quote(c) {
                        Some(value) => self.emit_value(ttype, start, value),
                        None => {
                            // unterminated literal; stop lexing here
                            self.emit(TokenType::Illegal, start);
                            self.emit_eof();
                            return self.out;
                        }
                    }
                }
                '/' => {
                    self.bump();
                    if self.peek_char() == Some('*') {
                        self.run_c_comment();
                        self.emit(TokenType::Comment, start);
                    } else {
                        self.emit(TokenType::Slash, start);
                    }
                }
                '-' => {
                    self.bump();
                    match self.peek_char() {
                        Some('-') => {
                            self.bump();
                            // `-- ` needs the whitespace; `--1` is a number
                            if matches!(self.peek_char(), Some(' ' | '\t' | '\r' | '\n') | None) {
                                self.run_to_eol();
                                self.emit(TokenType::Comment, start);
                            } else {
                                self.emit(TokenType::Dash, start);
                            }
                        }
                        Some('0'..='9') => {
                            self.run_number();
                            self.emit(TokenType::Number, start);
                        }
                        _ => self.emit(TokenType::Dash, start),
                    }
                }
                '#' => {
                    self.run_to_eol();
                    self.emit(TokenType::Comment, start);
                }
                '(' => {
                    self.bump();
                    self.emit(TokenType::LParen, start);
                }
                ')' => {
                    self.bump();
                    self.emit(TokenType::RParen, start);
                }
                ';' => {
                    self.bump();
                    self.emit(TokenType::Semicolon, start);
                }
                ',' => {
                    self.bump();
                    self.emit(TokenType::Comma, start);
                }
                '.' => {
                    self.bump();
                    if matches!(self.peek_char(), Some('0'..='9')) {
                        self.run_number();
                        self.emit(TokenType::Number, start);
                    } else {
                        self.emit(TokenType::Dot, start);
                    }
                }
                '+' => {
                    self.bump();
                    if matches!(self.peek_char(), Some('0'..='9')) {
                        self.run_number();
                        self.emit(TokenType::Number, start);
                    } else {
                        self.emit(TokenType::Plus, start);
                    }
                }
                '=' => {
                    self.bump();
                    self.emit(TokenType::Equal, start);
                }
                '*' => {
                    self.bump();
                    self.emit(TokenType::Asterisk, start);
                }
                _ => {
                    self.bump();
                    self.emit(TokenType::Illegal, start);
                }
            }
        }
    }

    fn run_ident(&mut self) {
        while matches!(
            self.peek_char(),
            Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_')
        ) {
            self.bump();
        }
    }

    // https://dev.mysql.com/doc/refman/8.0/en/number-literals.html
    fn run_number(&mut self) {
        self.run_digits();
        if self.peek_char() == Some('.') {
            self.bump();
            self.run_digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.bump();
            if self.peek_char() == Some('-') {
                self.bump();
            }
            self.run_digits();
        }
    }

    fn run_digits(&mut self) {
        while matches!(self.peek_char(), Some('0'..='9')) {
            self.bump();
        }
    }

    /// Consume a quoted literal, returning the unescaped inner text.
    /// A doubled delimiter or a backslash-delimiter pair escapes the
    /// delimiter; a backslash before anything else stays a backslash.
    fn run_quote(&mut self, quote: char) -> Option<String> {
        self.bump(); // opening delimiter
        let mut value = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                if self.peek_char() == Some(quote) {
                    self.bump();
                    value.push(quote);
                } else {
                    return Some(value);
                }
            } else if c == '\\' {
                if self.peek_char() == Some(quote) {
                    self.bump();
                    value.push(quote);
                } else {
                    value.push('\\');
                }
            } else {
                value.push(c);
            }
        }
    }

    // https://dev.mysql.com/doc/refman/8.0/en/comments.html
    fn run_c_comment(&mut self) {
        self.bump(); // the '*'
        while let Some(c) = self.bump() {
            if c == '*' && self.peek_char() == Some('/') {
                self.bump();
                return;
            }
        }
    }

    fn run_to_eol(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(input: &str) -> Vec<TokenType> {
        lex(input)
            .into_iter()
            .filter(|t| t.ttype != TokenType::Space)
            .map(|t| t.ttype)
            .collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            types("CREATE TABLE hoge"),
            [
                TokenType::Create,
                TokenType::Table,
                TokenType::Ident,
                TokenType::Eof
            ]
        );
        // case-insensitive
        assert_eq!(
            types("create table hoge"),
            [
                TokenType::Create,
                TokenType::Table,
                TokenType::Ident,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn test_backtick_ident_unescaped() {
        let tokens = lex("`foo``bar`");
        assert_eq!(tokens[0].ttype, TokenType::BacktickIdent);
        assert_eq!(tokens[0].value, "foo`bar");
    }

    #[test]
    fn test_single_quote_backslash_escape() {
        let tokens = lex(r"'it\'s'");
        assert_eq!(tokens[0].ttype, TokenType::SingleQuoteIdent);
        assert_eq!(tokens[0].value, "it's");
        // backslash before anything else is kept
        let tokens = lex(r"'a\b'");
        assert_eq!(tokens[0].value, "a\\b");
    }

    #[test]
    fn test_unterminated_quote_is_illegal() {
        let tokens = lex("'oops");
        assert_eq!(tokens[0].ttype, TokenType::Illegal);
    }

    #[test]
    fn test_numbers() {
        for src in ["42", "-42", "+42", "4.2", ".5", "1e10", "1.5e-3"] {
            let tokens = lex(src);
            assert_eq!(tokens[0].ttype, TokenType::Number, "lexing {src}");
            assert_eq!(tokens[0].value, src, "lexing {src}");
        }
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            types("/* c comment */ # hash\n-- dash comment\nCREATE"),
            [
                TokenType::Comment,
                TokenType::Comment,
                TokenType::Comment,
                TokenType::Create,
                TokenType::Eof
            ]
        );
        // `--` not followed by whitespace is no comment
        assert_eq!(
            types("--1"),
            [TokenType::Dash, TokenType::Number, TokenType::Eof]
        );
        let tokens = lex("--1");
        assert_eq!(tokens[0].value, "--");
    }

    #[test]
    fn test_positions() {
        let tokens = lex("CREATE\nTABLE");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        // the SPACE token swallows the newline; TABLE starts the next line
        assert_eq!(tokens[2].ttype, TokenType::Table);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].pos, 7);
    }

    #[test]
    fn test_eof_token() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].eof);
        assert_eq!(tokens[0].ttype, TokenType::Eof);
    }
}
