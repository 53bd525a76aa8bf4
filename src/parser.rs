//! Recursive-descent parser for the MySQL DDL subset.
//!
//! The parser walks a pre-lexed token vector through an index cursor, so
//! lookahead and pushback are just integer arithmetic. Whitespace and
//! comment tokens are filtered transparently at the point of consumption.
//! Parsed tables come back already normalized (see
//! [`Table::normalize`](crate::model::Table::normalize)).

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::lexer::{self, Token, TokenType};
use crate::model::{
    ColumnType, Database, DefaultValue, Ident, Index, IndexColumn, IndexKind, IndexOption,
    IndexType, Length, NullState, Reference, ReferenceMatch, ReferenceOption, SortDirection,
    Statement, Table, TableColumn, TableOption,
};

/// How many source characters of context a diagnostic carries.
const SNIPPET_LEN: usize = 40;

/// A syntax error, with enough position information to point back into the
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What the parser expected or found.
    pub reason: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// Column of the offending token.
    pub col: usize,
    /// The offending token was the end of input.
    pub at_eof: bool,
    /// The source text leading up to the offending token.
    pub snippet: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error: {} at line {} column {}",
            self.reason, self.line, self.col
        )?;
        if self.at_eof {
            f.write_str(" (at EOF)")?;
        }
        write!(f, "\n    \"{}\" <---- AROUND HERE", self.snippet)
    }
}

impl core::error::Error for ParseError {}

/// The DDL parser.
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given source. Lexing happens eagerly.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: lexer::lex(input),
            pos: 0,
        }
    }

    /// Parse the whole input as a sequence of `;`-separated statements.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on the first construct the grammar does not
    /// accept.
    pub fn parse(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut stmts = Vec::new();
        loop {
            let t = self.peek().clone();
            match t.ttype {
                TokenType::Eof => break,
                TokenType::Semicolon => {
                    self.next();
                }
                TokenType::Create => stmts.push(self.parse_create()?),
                // statements we tolerate but do not model
                TokenType::Drop | TokenType::Set | TokenType::Use => self.skip_statement(),
                _ => {
                    return Err(self.error_at(
                        &t,
                        format!("expected CREATE, DROP, SET, or USE, but got {}", t.ttype),
                    ));
                }
            }
        }
        Ok(stmts)
    }

    // ------------------------------------------------------------------
    // cursor

    fn skip_trivia(&mut self) {
        while matches!(
            self.tokens[self.pos].ttype,
            TokenType::Space | TokenType::Comment
        ) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> &Token {
        self.skip_trivia();
        &self.tokens[self.pos]
    }

    fn peek_type(&mut self) -> TokenType {
        self.peek().ttype
    }

    fn next(&mut self) -> Token {
        self.skip_trivia();
        let t = self.tokens[self.pos].clone();
        if t.ttype != TokenType::Eof {
            self.pos += 1;
        }
        t
    }

    /// Consume tokens up to and including the next `;`.
    fn skip_statement(&mut self) {
        loop {
            let t = self.next();
            if matches!(t.ttype, TokenType::Semicolon | TokenType::Eof) {
                return;
            }
        }
    }

    /// Consume tokens up to, but not including, the next `;`.
    fn skip_to_statement_end(&mut self) {
        while !matches!(self.peek_type(), TokenType::Semicolon | TokenType::Eof) {
            self.next();
        }
    }

    // ------------------------------------------------------------------
    // diagnostics

    fn error_at(&self, token: &Token, reason: impl Into<String>) -> ParseError {
        let upto = &self.input[..token.pos.min(self.input.len())];
        let start = upto
            .char_indices()
            .rev()
            .nth(SNIPPET_LEN - 1)
            .map_or(0, |(i, _)| i);
        ParseError {
            reason: reason.into(),
            line: token.line,
            col: token.col,
            at_eof: token.eof,
            snippet: String::from(&upto[start..]),
        }
    }

    fn expect(&mut self, ttype: TokenType) -> Result<Token, ParseError> {
        let t = self.next();
        if t.ttype == ttype {
            Ok(t)
        } else {
            Err(self.error_at(&t, format!("expected {ttype}, but got {}", t.ttype)))
        }
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let t = self.next();
        match t.ttype {
            TokenType::Ident | TokenType::BacktickIdent => Ok(Ident::new(t.value)),
            _ => Err(self.error_at(&t, format!("expected an identifier, but got {}", t.ttype))),
        }
    }

    fn maybe_ident(&mut self) -> Option<Ident> {
        match self.peek_type() {
            TokenType::Ident | TokenType::BacktickIdent => {
                let t = self.next();
                Some(Ident::new(t.value))
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // statements

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenType::Create)?;
        let t = self.peek().clone();
        match t.ttype {
            TokenType::Database => self.parse_create_database(),
            TokenType::Temporary | TokenType::Table => self.parse_create_table(),
            _ => Err(self.error_at(&t, "expected DATABASE or TABLE after CREATE")),
        }
    }

    fn parse_create_database(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenType::Database)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let mut database = Database::new(self.parse_ident()?);
        database.if_not_exists = if_not_exists;
        Ok(Statement::Database(database))
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.peek_type() != TokenType::If {
            return Ok(false);
        }
        self.next();
        self.expect(TokenType::Not)?;
        self.expect(TokenType::Exists)?;
        Ok(true)
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        let temporary = if self.peek_type() == TokenType::Temporary {
            self.next();
            true
        } else {
            false
        };
        self.expect(TokenType::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;

        let mut table = Table::new(self.parse_ident()?);
        table.temporary = temporary;
        table.if_not_exists = if_not_exists;

        if self.peek_type() == TokenType::Like {
            self.next();
            table.like_table = Some(self.parse_ident()?);
            return Ok(Statement::Table(table.normalize()));
        }

        self.expect(TokenType::LParen)?;
        loop {
            self.parse_table_body_item(&mut table)?;
            let t = self.next();
            match t.ttype {
                TokenType::Comma => {}
                TokenType::RParen => break,
                _ => {
                    return Err(
                        self.error_at(&t, format!("expected COMMA or RPAREN, but got {}", t.ttype))
                    );
                }
            }
        }
        self.parse_table_options(&mut table)?;

        Ok(Statement::Table(table.normalize()))
    }

    // ------------------------------------------------------------------
    // table body

    fn parse_table_body_item(&mut self, table: &mut Table) -> Result<(), ParseError> {
        let table_id = table.id();
        match self.peek_type() {
            TokenType::Constraint => {
                self.next();
                let symbol = self.maybe_ident();
                let t = self.peek().clone();
                let index = match t.ttype {
                    TokenType::Primary => self.parse_primary_key(&table_id, symbol)?,
                    TokenType::Unique => self.parse_unique_index(&table_id, symbol)?,
                    TokenType::Foreign => self.parse_foreign_key(&table_id, symbol)?,
                    _ => {
                        return Err(self.error_at(
                            &t,
                            "expected PRIMARY KEY, UNIQUE, or FOREIGN KEY after CONSTRAINT",
                        ));
                    }
                };
                table.indexes.push(index);
            }
            TokenType::Primary => {
                let index = self.parse_primary_key(&table_id, None)?;
                table.indexes.push(index);
            }
            TokenType::Unique => {
                let index = self.parse_unique_index(&table_id, None)?;
                table.indexes.push(index);
            }
            TokenType::Index | TokenType::Key => {
                let index = self.parse_normal_index(&table_id)?;
                table.indexes.push(index);
            }
            TokenType::Fulltext => {
                let index = self.parse_fulltext_index(&table_id)?;
                table.indexes.push(index);
            }
            TokenType::Spatial => {
                let index = self.parse_spatial_index(&table_id)?;
                table.indexes.push(index);
            }
            TokenType::Foreign => {
                let index = self.parse_foreign_key(&table_id, None)?;
                table.indexes.push(index);
            }
            _ => {
                let column = self.parse_column_def()?;
                table.columns.push(column);
            }
        }
        Ok(())
    }

    fn parse_primary_key(
        &mut self,
        table_id: &str,
        symbol: Option<Ident>,
    ) -> Result<Index, ParseError> {
        self.expect(TokenType::Primary)?;
        self.expect(TokenType::Key)?;
        let mut index = Index::new(IndexKind::PrimaryKey, table_id);
        index.constraint_name = symbol;
        self.parse_index_tail(&mut index)?;
        Ok(index)
    }

    fn parse_unique_index(
        &mut self,
        table_id: &str,
        symbol: Option<Ident>,
    ) -> Result<Index, ParseError> {
        self.expect(TokenType::Unique)?;
        if matches!(self.peek_type(), TokenType::Index | TokenType::Key) {
            self.next();
        }
        let mut index = Index::new(IndexKind::Unique, table_id);
        index.constraint_name = symbol;
        index.name = self.maybe_ident();
        self.parse_index_tail(&mut index)?;
        Ok(index)
    }

    fn parse_normal_index(&mut self, table_id: &str) -> Result<Index, ParseError> {
        // INDEX or KEY
        self.next();
        let mut index = Index::new(IndexKind::Normal, table_id);
        index.name = self.maybe_ident();
        self.parse_index_tail(&mut index)?;
        Ok(index)
    }

    fn parse_fulltext_index(&mut self, table_id: &str) -> Result<Index, ParseError> {
        self.expect(TokenType::Fulltext)?;
        if matches!(self.peek_type(), TokenType::Index | TokenType::Key) {
            self.next();
        }
        let mut index = Index::new(IndexKind::FullText, table_id);
        index.name = self.maybe_ident();
        index.columns = self.parse_index_columns()?;
        self.parse_index_options(&mut index, true)?;
        Ok(index)
    }

    fn parse_spatial_index(&mut self, table_id: &str) -> Result<Index, ParseError> {
        self.expect(TokenType::Spatial)?;
        if matches!(self.peek_type(), TokenType::Index | TokenType::Key) {
            self.next();
        }
        let mut index = Index::new(IndexKind::Spatial, table_id);
        index.name = self.maybe_ident();
        index.columns = self.parse_index_columns()?;
        Ok(index)
    }

    fn parse_foreign_key(
        &mut self,
        table_id: &str,
        symbol: Option<Ident>,
    ) -> Result<Index, ParseError> {
        self.expect(TokenType::Foreign)?;
        self.expect(TokenType::Key)?;
        let mut index = Index::new(IndexKind::ForeignKey, table_id);
        index.constraint_name = symbol;
        index.name = self.maybe_ident();
        index.columns = self.parse_index_columns()?;
        if self.peek_type() == TokenType::References {
            index.reference = Some(self.parse_reference()?);
        }
        Ok(index)
    }

    /// The common tail of PRIMARY KEY, UNIQUE, and plain indexes:
    /// `[USING ...] (columns) [USING ...] [index options]`. MySQL itself
    /// prints the `USING` clause before the column list, but accepts it on
    /// either side.
    fn parse_index_tail(&mut self, index: &mut Index) -> Result<(), ParseError> {
        if let Some(index_type) = self.parse_using()? {
            index.index_type = index_type;
        }
        index.columns = self.parse_index_columns()?;
        if let Some(index_type) = self.parse_using()? {
            index.index_type = index_type;
        }
        self.parse_index_options(index, false)?;
        Ok(())
    }

    fn parse_using(&mut self) -> Result<Option<IndexType>, ParseError> {
        if self.peek_type() != TokenType::Using {
            return Ok(None);
        }
        self.next();
        let t = self.next();
        match t.ttype {
            TokenType::Btree => Ok(Some(IndexType::Btree)),
            TokenType::Hash => Ok(Some(IndexType::Hash)),
            _ => Err(self.error_at(&t, format!("expected BTREE or HASH, but got {}", t.ttype))),
        }
    }

    fn parse_index_columns(&mut self) -> Result<Vec<IndexColumn>, ParseError> {
        self.expect(TokenType::LParen)?;
        let mut columns = Vec::new();
        loop {
            let mut column = IndexColumn::new(self.parse_ident()?);
            if self.peek_type() == TokenType::LParen {
                self.next();
                let length = self.expect(TokenType::Number)?;
                self.expect(TokenType::RParen)?;
                column.length = Some(length.value);
            }
            match self.peek_type() {
                TokenType::Asc => {
                    self.next();
                    column.sort_direction = SortDirection::Ascending;
                }
                TokenType::Desc => {
                    self.next();
                    column.sort_direction = SortDirection::Descending;
                }
                _ => {}
            }
            columns.push(column);

            let t = self.next();
            match t.ttype {
                TokenType::Comma => {}
                TokenType::RParen => return Ok(columns),
                _ => {
                    return Err(
                        self.error_at(&t, format!("expected COMMA or RPAREN, but got {}", t.ttype))
                    );
                }
            }
        }
    }

    /// `WITH PARSER` is a fulltext-only option; for other index kinds the
    /// token ends the index definition and the caller reports it.
    fn parse_index_options(&mut self, index: &mut Index, fulltext: bool) -> Result<(), ParseError> {
        loop {
            match self.peek_type() {
                TokenType::With if fulltext => {
                    self.next();
                    self.expect(TokenType::Parser)?;
                    let name = self.parse_ident()?;
                    index.options.push(IndexOption {
                        key: String::from("WITH PARSER"),
                        value: String::from(name.as_str()),
                        need_quotes: true,
                    });
                }
                TokenType::KeyBlockSize => {
                    self.next();
                    if self.peek_type() == TokenType::Equal {
                        self.next();
                    }
                    let value = self.expect(TokenType::Number)?;
                    index.options.push(IndexOption {
                        key: String::from("KEY_BLOCK_SIZE"),
                        value: value.value,
                        need_quotes: false,
                    });
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_reference(&mut self) -> Result<Reference, ParseError> {
        self.expect(TokenType::References)?;
        let mut reference = Reference::new(self.parse_ident()?);
        reference.columns = self.parse_index_columns()?;

        if self.peek_type() == TokenType::Match {
            self.next();
            let t = self.next();
            reference.match_mode = match t.ttype {
                TokenType::Full => ReferenceMatch::Full,
                TokenType::Partial => ReferenceMatch::Partial,
                TokenType::Simple => ReferenceMatch::Simple,
                _ => {
                    return Err(self.error_at(
                        &t,
                        format!("expected FULL, PARTIAL, or SIMPLE, but got {}", t.ttype),
                    ));
                }
            };
        }

        while self.peek_type() == TokenType::On {
            self.next();
            let t = self.next();
            let option = self.parse_reference_option()?;
            match t.ttype {
                TokenType::Delete => reference.on_delete = option,
                TokenType::Update => reference.on_update = option,
                _ => {
                    return Err(self
                        .error_at(&t, format!("expected DELETE or UPDATE, but got {}", t.ttype)));
                }
            }
        }

        Ok(reference)
    }

    fn parse_reference_option(&mut self) -> Result<ReferenceOption, ParseError> {
        let t = self.next();
        match t.ttype {
            TokenType::Restrict => Ok(ReferenceOption::Restrict),
            TokenType::Cascade => Ok(ReferenceOption::Cascade),
            TokenType::Set => {
                self.expect(TokenType::Null)?;
                Ok(ReferenceOption::SetNull)
            }
            TokenType::No => {
                self.expect(TokenType::Action)?;
                Ok(ReferenceOption::NoAction)
            }
            _ => Err(self.error_at(
                &t,
                format!(
                    "expected RESTRICT, CASCADE, SET NULL, or NO ACTION, but got {}",
                    t.ttype
                ),
            )),
        }
    }

    // ------------------------------------------------------------------
    // columns

    fn parse_column_def(&mut self) -> Result<TableColumn, ParseError> {
        let name = self.parse_ident()?;
        let t = self.next();
        let Some(ctype) = column_type_for(t.ttype) else {
            return Err(self.error_at(&t, format!("expected a column type, but got {}", t.ttype)));
        };
        let mut column = TableColumn::new(name, ctype);

        match ctype {
            ColumnType::Enum => column.enum_values = self.parse_value_list()?,
            ColumnType::Set => column.set_values = self.parse_value_list()?,
            _ => {
                if accepts_length(ctype) && self.peek_type() == TokenType::LParen {
                    column.length = Some(self.parse_length()?);
                }
            }
        }

        self.parse_column_options(&mut column)?;
        Ok(column)
    }

    fn parse_length(&mut self) -> Result<Length, ParseError> {
        self.expect(TokenType::LParen)?;
        let length = self.expect(TokenType::Number)?;
        let mut length = Length::new(length.value);
        if self.peek_type() == TokenType::Comma {
            self.next();
            let decimals = self.expect(TokenType::Number)?;
            length.decimals = Some(decimals.value);
        }
        self.expect(TokenType::RParen)?;
        Ok(length)
    }

    fn parse_value_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenType::LParen)?;
        let mut values = Vec::new();
        loop {
            let t = self.next();
            match t.ttype {
                TokenType::SingleQuoteIdent | TokenType::DoubleQuoteIdent => values.push(t.value),
                _ => {
                    return Err(
                        self.error_at(&t, format!("expected a quoted value, but got {}", t.ttype))
                    );
                }
            }
            let t = self.next();
            match t.ttype {
                TokenType::Comma => {}
                TokenType::RParen => return Ok(values),
                _ => {
                    return Err(
                        self.error_at(&t, format!("expected COMMA or RPAREN, but got {}", t.ttype))
                    );
                }
            }
        }
    }

    /// Column attributes and options, in any order.
    fn parse_column_options(&mut self, column: &mut TableColumn) -> Result<(), ParseError> {
        loop {
            match self.peek_type() {
                TokenType::Unsigned => {
                    self.next();
                    column.unsigned = true;
                }
                TokenType::Zerofill => {
                    self.next();
                    column.zero_fill = true;
                }
                TokenType::Binary => {
                    self.next();
                    column.binary = true;
                }
                TokenType::Not => {
                    self.next();
                    self.expect(TokenType::Null)?;
                    column.null_state = NullState::NotNull;
                }
                TokenType::Null => {
                    self.next();
                    column.null_state = NullState::Null;
                }
                TokenType::Default => {
                    self.next();
                    let (value, quoted) = self.parse_value_expr()?;
                    column.default = Some(DefaultValue { value, quoted });
                }
                TokenType::AutoIncrement => {
                    self.next();
                    column.auto_increment = true;
                }
                TokenType::Unique => {
                    self.next();
                    if self.peek_type() == TokenType::Key {
                        self.next();
                    }
                    column.unique = true;
                }
                TokenType::Primary => {
                    self.next();
                    self.expect(TokenType::Key)?;
                    column.primary = true;
                }
                TokenType::Key => {
                    self.next();
                    column.key = true;
                }
                TokenType::CommentKeyword => {
                    self.next();
                    let t = self.next();
                    match t.ttype {
                        TokenType::SingleQuoteIdent | TokenType::DoubleQuoteIdent => {
                            column.comment = Some(t.value);
                        }
                        _ => {
                            return Err(self.error_at(
                                &t,
                                format!("expected a quoted comment, but got {}", t.ttype),
                            ));
                        }
                    }
                }
                TokenType::On => {
                    self.next();
                    self.expect(TokenType::Update)?;
                    let (value, _) = self.parse_value_expr()?;
                    column.auto_update = Some(value);
                }
                TokenType::Character => {
                    self.next();
                    self.expect(TokenType::Set)?;
                    column.character_set = Some(self.parse_name_value()?);
                }
                TokenType::Charset => {
                    self.next();
                    column.character_set = Some(self.parse_name_value()?);
                }
                TokenType::Collate => {
                    self.next();
                    column.collation = Some(self.parse_name_value()?);
                }
                TokenType::Srid => {
                    self.next();
                    let t = self.expect(TokenType::Number)?;
                    let srid = t
                        .value
                        .parse::<u32>()
                        .map_err(|_| self.error_at(&t, "invalid SRID value"))?;
                    column.srid = Some(srid);
                }
                _ => return Ok(()),
            }
        }
    }

    /// A character set or collation name; bare or quoted.
    fn parse_name_value(&mut self) -> Result<String, ParseError> {
        let t = self.next();
        match t.ttype {
            TokenType::Ident
            | TokenType::BacktickIdent
            | TokenType::SingleQuoteIdent
            | TokenType::DoubleQuoteIdent
            | TokenType::Binary => Ok(t.value),
            _ => Err(self.error_at(&t, format!("expected a name, but got {}", t.ttype))),
        }
    }

    /// A literal, identifier, or function call, as used by `DEFAULT` and
    /// `ON UPDATE`.
    fn parse_value_expr(&mut self) -> Result<(String, bool), ParseError> {
        let t = self.next();
        match t.ttype {
            TokenType::Number => Ok((t.value, false)),
            TokenType::SingleQuoteIdent | TokenType::DoubleQuoteIdent => Ok((t.value, true)),
            TokenType::Null => Ok((String::from("NULL"), false)),
            TokenType::True => Ok((String::from("TRUE"), false)),
            TokenType::False => Ok((String::from("FALSE"), false)),
            TokenType::CurrentTimestamp => {
                if self.peek_type() == TokenType::LParen {
                    self.next();
                    let precision = self.expect(TokenType::Number)?;
                    self.expect(TokenType::RParen)?;
                    Ok((format!("CURRENT_TIMESTAMP({})", precision.value), false))
                } else {
                    Ok((String::from("CURRENT_TIMESTAMP"), false))
                }
            }
            TokenType::Now => {
                self.expect(TokenType::LParen)?;
                self.expect(TokenType::RParen)?;
                Ok((format!("{}()", t.value), false))
            }
            TokenType::Ident => {
                if self.peek_type() == TokenType::LParen {
                    self.next();
                    self.expect(TokenType::RParen)?;
                    Ok((format!("{}()", t.value), false))
                } else {
                    Ok((t.value, false))
                }
            }
            _ => Err(self.error_at(&t, format!("expected a value, but got {}", t.ttype))),
        }
    }

    // ------------------------------------------------------------------
    // table options

    fn parse_table_options(&mut self, table: &mut Table) -> Result<(), ParseError> {
        loop {
            match self.peek_type() {
                TokenType::Semicolon | TokenType::Eof => return Ok(()),
                TokenType::Comma => {
                    self.next();
                }
                TokenType::Engine => {
                    self.next();
                    self.parse_table_option(table, "ENGINE")?;
                }
                TokenType::AutoIncrement => {
                    self.next();
                    self.parse_table_option(table, "AUTO_INCREMENT")?;
                }
                TokenType::CommentKeyword => {
                    self.next();
                    self.parse_table_option(table, "COMMENT")?;
                }
                TokenType::Default => {
                    self.next();
                    let t = self.peek().clone();
                    match t.ttype {
                        TokenType::Character => {
                            self.next();
                            self.expect(TokenType::Set)?;
                            self.parse_table_option(table, "DEFAULT CHARACTER SET")?;
                        }
                        TokenType::Charset => {
                            self.next();
                            self.parse_table_option(table, "DEFAULT CHARACTER SET")?;
                        }
                        TokenType::Collate => {
                            self.next();
                            self.parse_table_option(table, "DEFAULT COLLATE")?;
                        }
                        _ => {
                            return Err(self.error_at(
                                &t,
                                "expected CHARACTER SET, CHARSET, or COLLATE after DEFAULT",
                            ));
                        }
                    }
                }
                TokenType::Character => {
                    self.next();
                    self.expect(TokenType::Set)?;
                    self.parse_table_option(table, "DEFAULT CHARACTER SET")?;
                }
                TokenType::Charset => {
                    self.next();
                    self.parse_table_option(table, "DEFAULT CHARACTER SET")?;
                }
                TokenType::Collate => {
                    self.next();
                    self.parse_table_option(table, "DEFAULT COLLATE")?;
                }
                TokenType::Data => {
                    self.next();
                    self.expect(TokenType::Directory)?;
                    self.parse_table_option(table, "DATA DIRECTORY")?;
                }
                TokenType::Index => {
                    self.next();
                    self.expect(TokenType::Directory)?;
                    self.parse_table_option(table, "INDEX DIRECTORY")?;
                }
                TokenType::AvgRowLength
                | TokenType::Checksum
                | TokenType::Connection
                | TokenType::DelayKeyWrite
                | TokenType::InsertMethod
                | TokenType::KeyBlockSize
                | TokenType::MaxRows
                | TokenType::MinRows
                | TokenType::PackKeys
                | TokenType::Password
                | TokenType::RowFormat
                | TokenType::StatsAutoRecalc
                | TokenType::StatsPersistent
                | TokenType::StatsSamplePages
                | TokenType::Storage
                | TokenType::Tablespace => {
                    let key = self.next().ttype.name();
                    self.parse_table_option(table, key)?;
                }
                TokenType::Ident => {
                    // an unknown option is tolerated as long as it reads
                    // KEY = value; anything fancier is skipped wholesale
                    let t = self.next();
                    if self.peek_type() == TokenType::Equal {
                        let mut key = t.value;
                        key.make_ascii_uppercase();
                        self.parse_table_option(table, &key)?;
                    } else {
                        self.skip_to_statement_end();
                        return Ok(());
                    }
                }
                _ => {
                    // PARTITION BY and friends: not migrated, skip to the
                    // statement boundary
                    self.skip_to_statement_end();
                    return Ok(());
                }
            }
        }
    }

    /// The `[=] value` tail of a table option whose key tokens have
    /// already been consumed.
    fn parse_table_option(&mut self, table: &mut Table, key: &str) -> Result<(), ParseError> {
        if self.peek_type() == TokenType::Equal {
            self.next();
        }
        let t = self.next();
        let (value, need_quotes) = match t.ttype {
            TokenType::SingleQuoteIdent | TokenType::DoubleQuoteIdent => (t.value, true),
            TokenType::Number | TokenType::Ident | TokenType::BacktickIdent => (t.value, false),
            TokenType::Semicolon
            | TokenType::Eof
            | TokenType::Comma
            | TokenType::Equal
            | TokenType::LParen
            | TokenType::RParen
            | TokenType::Illegal => {
                return Err(
                    self.error_at(&t, format!("expected a table option value, but got {}", t.ttype))
                );
            }
            // bare keyword values such as ROW_FORMAT = DYNAMIC
            _ => (t.value, false),
        };
        table.options.push(TableOption::new(key, value, need_quotes));
        Ok(())
    }
}

/// Map a reserved-word token to the column type it names.
fn column_type_for(ttype: TokenType) -> Option<ColumnType> {
    Some(match ttype {
        TokenType::Bit => ColumnType::Bit,
        TokenType::Tinyint => ColumnType::TinyInt,
        TokenType::Smallint => ColumnType::SmallInt,
        TokenType::Mediumint => ColumnType::MediumInt,
        TokenType::Int => ColumnType::Int,
        TokenType::Integer => ColumnType::Integer,
        TokenType::Bigint => ColumnType::BigInt,
        TokenType::Float => ColumnType::Float,
        TokenType::Double => ColumnType::Double,
        TokenType::Decimal => ColumnType::Decimal,
        TokenType::Numeric => ColumnType::Numeric,
        TokenType::Real => ColumnType::Real,
        TokenType::Bool => ColumnType::Bool,
        TokenType::Boolean => ColumnType::Boolean,
        TokenType::Date => ColumnType::Date,
        TokenType::Time => ColumnType::Time,
        TokenType::Datetime => ColumnType::DateTime,
        TokenType::Timestamp => ColumnType::Timestamp,
        TokenType::Year => ColumnType::Year,
        TokenType::Char => ColumnType::Char,
        TokenType::Varchar => ColumnType::VarChar,
        TokenType::Binary => ColumnType::Binary,
        TokenType::Varbinary => ColumnType::VarBinary,
        TokenType::Tinyblob => ColumnType::TinyBlob,
        TokenType::Blob => ColumnType::Blob,
        TokenType::Mediumblob => ColumnType::MediumBlob,
        TokenType::Longblob => ColumnType::LongBlob,
        TokenType::Tinytext => ColumnType::TinyText,
        TokenType::Text => ColumnType::Text,
        TokenType::Mediumtext => ColumnType::MediumText,
        TokenType::Longtext => ColumnType::LongText,
        TokenType::Enum => ColumnType::Enum,
        TokenType::Set => ColumnType::Set,
        TokenType::Json => ColumnType::Json,
        TokenType::Geometry => ColumnType::Geometry,
        TokenType::Point => ColumnType::Point,
        TokenType::Linestring => ColumnType::LineString,
        TokenType::Polygon => ColumnType::Polygon,
        TokenType::Multipoint => ColumnType::MultiPoint,
        TokenType::Multilinestring => ColumnType::MultiLineString,
        TokenType::Multipolygon => ColumnType::MultiPolygon,
        TokenType::GeometryCollection => ColumnType::GeometryCollection,
        _ => return None,
    })
}

/// Types that take an optional `(length[,decimals])` after the name.
fn accepts_length(ctype: ColumnType) -> bool {
    matches!(
        ctype,
        ColumnType::Bit
            | ColumnType::TinyInt
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
            | ColumnType::Time
            | ColumnType::DateTime
            | ColumnType::Timestamp
            | ColumnType::Year
            | ColumnType::Char
            | ColumnType::VarChar
            | ColumnType::Binary
            | ColumnType::VarBinary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn parse(input: &str) -> Vec<Statement> {
        Parser::new(input).parse().unwrap()
    }

    #[test]
    fn test_parse_create_database() {
        let stmts = parse("CREATE DATABASE foo");
        assert_eq!(stmts.len(), 1);
        let Statement::Database(db) = &stmts[0] else {
            panic!("expected a database statement");
        };
        assert_eq!(db.name.as_str(), "foo");
        assert!(!db.if_not_exists);
        assert_eq!(db.id(), "database#foo");
    }

    #[test]
    fn test_parse_create_database_if_not_exists() {
        let stmts = parse("CREATE DATABASE IF NOT EXISTS Foo;");
        let Statement::Database(db) = &stmts[0] else {
            panic!("expected a database statement");
        };
        assert!(db.if_not_exists);
        assert_eq!(db.id(), "database#foo");
    }

    #[test]
    fn test_parse_simple_table() {
        let stmts = parse("CREATE TABLE hoge (id INTEGER NOT NULL, name VARCHAR (20))");
        assert_eq!(stmts.len(), 1);
        let Statement::Table(table) = &stmts[0] else {
            panic!("expected a table statement");
        };
        assert_eq!(table.name.as_str(), "hoge");
        assert_eq!(table.columns.len(), 2);
        // the parser normalizes: INTEGER becomes INT (11)
        assert_eq!(table.columns[0].ctype, ColumnType::Int);
        assert_eq!(table.columns[0].length, Some(Length::new("11")));
        assert_eq!(table.columns[1].length, Some(Length::new("20")));
    }

    #[test]
    fn test_parse_table_like() {
        let stmts = parse("CREATE TABLE foo LIKE bar");
        let Statement::Table(table) = &stmts[0] else {
            panic!("expected a table statement");
        };
        assert_eq!(table.like_table.as_ref().map(Ident::as_str), Some("bar"));
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_parse_skips_set_and_drop() {
        let stmts = parse(
            "DROP TABLE IF EXISTS `old`;\nSET character_set_client = utf8mb4;\nCREATE TABLE t (id INT);",
        );
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_parse_optimizer_hint_comments() {
        let stmts = parse(
            "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;\nCREATE TABLE t (id INT);",
        );
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_parse_foreign_key_reference_actions() {
        let stmts = parse(
            "CREATE TABLE t (fid INT, CONSTRAINT `fk` FOREIGN KEY (fid) REFERENCES f (id) MATCH SIMPLE ON DELETE SET NULL ON UPDATE CASCADE)",
        );
        let Statement::Table(table) = &stmts[0] else {
            panic!("expected a table statement");
        };
        let fk = table
            .indexes
            .iter()
            .find(|idx| idx.kind == IndexKind::ForeignKey)
            .unwrap();
        let reference = fk.reference.as_ref().unwrap();
        assert_eq!(reference.match_mode, ReferenceMatch::Simple);
        assert_eq!(reference.on_delete, ReferenceOption::SetNull);
        assert_eq!(reference.on_update, ReferenceOption::Cascade);
    }

    #[test]
    fn test_parse_table_options() {
        let stmts = parse(
            "CREATE TABLE t (id INT) ENGINE=InnoDB AUTO_INCREMENT 10 DEFAULT CHARSET = utf8mb4 COMMENT = 'c';",
        );
        let Statement::Table(table) = &stmts[0] else {
            panic!("expected a table statement");
        };
        let keys: Vec<&str> = table.options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["ENGINE", "AUTO_INCREMENT", "DEFAULT CHARACTER SET", "COMMENT"]
        );
        assert!(table.options[3].need_quotes);
    }

    #[test]
    fn test_parse_partition_clause_is_skipped() {
        let stmts = parse(
            "CREATE TABLE t (id INT) ENGINE=InnoDB PARTITION BY LIST (id) (PARTITION p0 VALUES IN (0));",
        );
        let Statement::Table(table) = &stmts[0] else {
            panic!("expected a table statement");
        };
        assert_eq!(table.options.len(), 1);
    }

    #[test]
    fn test_parse_error_template() {
        let err = Parser::new("CREATE TABLE hoge").parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: expected LPAREN, but got EOF at line 1 column 18 (at EOF)\n    \"CREATE TABLE hoge\" <---- AROUND HERE"
        );
    }

    #[test]
    fn test_parse_error_snippet_is_capped() {
        let input = "CREATE TABLE abcdefghijklmnopqrstuvwxyz0123456789 99";
        let err = Parser::new(input).parse().unwrap_err();
        assert_eq!(err.snippet.chars().count(), 40);
        assert_eq!(err.snippet, &input[10..50]);
    }

    #[test]
    fn test_parse_error_on_trailing_comma() {
        assert!(Parser::new("CREATE TABLE t (id INT,)").parse().is_err());
    }

    #[test]
    fn test_parse_error_on_bad_database_name() {
        assert!(Parser::new("create DATABASE 17").parse().is_err());
    }
}
