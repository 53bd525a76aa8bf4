//! MySQL option-file (`my.cnf`) parsing.
//!
//! Implements the option-file grammar the `mysql` client uses: `[group]`
//! headers, `key` and `key=value` lines, `#` and `;` comments, quoted
//! values, and backslash escapes.
//! <https://dev.mysql.com/doc/refman/8.0/en/option-files.html>

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parsed option files: group name to key/value pairs.
pub type MyCnf = BTreeMap<String, BTreeMap<String, String>>;

/// Errors from the option-file parser.
#[derive(Debug, thiserror::Error)]
pub enum MyCnfError {
    /// A group header hit the end of the line before `]`.
    #[error("unexpected new line in group header")]
    UnexpectedNewline,
    /// The input ended inside a group header or quoted value.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A quoted value hit the end of the line before its closing quote.
    #[error("unexpected end of line in quoted value")]
    UnexpectedEol,
    /// Trailing garbage after a quoted value.
    #[error("unexpected character {0:?} after value")]
    UnexpectedChar(char),
    /// A file existed but did not parse.
    #[error("failed to parse {path}")]
    File {
        /// The offending file.
        path: PathBuf,
        /// The underlying syntax error.
        #[source]
        source: Box<MyCnfError>,
    },
}

/// Parse a single option file.
///
/// # Errors
///
/// Returns a [`MyCnfError`] on malformed group headers or quoted values.
pub fn unmarshal(input: &str) -> Result<MyCnf, MyCnfError> {
    let mut parser = OptionFileParser {
        input,
        pos: 0,
        group: String::new(),
        result: MyCnf::new(),
    };
    parser.parse()?;
    Ok(parser.result)
}

/// Load and merge the option files MySQL clients read by default, plus an
/// optional extra file. Later files win key-by-key; unreadable files are
/// skipped, malformed ones are errors.
///
/// # Errors
///
/// Returns [`MyCnfError::File`] when an existing file fails to parse.
pub fn load_default(extra_file: Option<&Path>) -> Result<MyCnf, MyCnfError> {
    load(&list_config_files(extra_file))
}

fn load(paths: &[PathBuf]) -> Result<MyCnf, MyCnfError> {
    let mut result = MyCnf::new();
    for path in paths {
        let Ok(data) = std::fs::read_to_string(path) else {
            continue;
        };
        let cnf = unmarshal(&data).map_err(|source| MyCnfError::File {
            path: path.clone(),
            source: Box::new(source),
        })?;
        for (group, options) in cnf {
            result.entry(group).or_default().extend(options);
        }
    }
    Ok(result)
}

/// The option-file paths, in read order.
/// <https://dev.mysql.com/doc/refman/8.0/en/option-files.html>
fn list_config_files(extra_file: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if cfg!(windows) {
        if let Ok(windir) = std::env::var("WINDIR") {
            paths.push(Path::new(&windir).join("my.ini"));
            paths.push(Path::new(&windir).join("my.cnf"));
        }
        paths.push(PathBuf::from(r"C:\my.ini"));
        paths.push(PathBuf::from(r"C:\my.cnf"));
        if let Some(extra) = extra_file {
            paths.push(extra.to_path_buf());
        }
    } else {
        paths.push(PathBuf::from("/etc/my.cnf"));
        paths.push(PathBuf::from("/etc/mysql/my.cnf"));
        if let Some(extra) = extra_file {
            paths.push(extra.to_path_buf());
        }
        if let Ok(home) = std::env::var("HOME") {
            if !home.is_empty() {
                paths.push(Path::new(&home).join(".my.cnf"));
            }
        }
    }
    paths
}

struct OptionFileParser<'a> {
    input: &'a str,
    pos: usize,
    group: String,
    result: MyCnf,
}

impl OptionFileParser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn parse(&mut self) -> Result<(), MyCnfError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(()),
                Some('#' | ';') => self.skip_line(),
                Some('[') => self.parse_group()?,
                Some(_) => self.parse_option()?,
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some('\t' | '\u{b}' | '\u{c}' | ' ')) {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                return;
            }
        }
    }

    /// Whitespace, then a comment or the end of line. Anything else after
    /// a quoted value is an error.
    fn expect_line_end(&mut self) -> Result<(), MyCnfError> {
        self.skip_inline_whitespace();
        match self.peek() {
            Some('#') => {
                self.skip_line();
                Ok(())
            }
            Some('\r' | '\n') | None => Ok(()),
            Some(c) => Err(MyCnfError::UnexpectedChar(c)),
        }
    }

    fn parse_group(&mut self) -> Result<(), MyCnfError> {
        self.bump(); // '['
        let mut group = String::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\r' | '\n') => return Err(MyCnfError::UnexpectedNewline),
                None => return Err(MyCnfError::UnexpectedEof),
                Some(c) => {
                    self.bump();
                    group.push(c);
                }
            }
        }
        self.group = group;
        Ok(())
    }

    fn parse_option(&mut self) -> Result<(), MyCnfError> {
        let name = self.parse_option_name();
        let value = self.parse_option_value()?;
        self.result
            .entry(self.group.clone())
            .or_default()
            .insert(name, value);
        Ok(())
    }

    /// Option names are case-insensitive; store them lowercased.
    fn parse_option_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('=' | '\r' | '\n') | None => return name,
                Some(c) => {
                    self.bump();
                    name.extend(c.to_lowercase());
                }
            }
        }
    }

    fn parse_option_value(&mut self) -> Result<String, MyCnfError> {
        if self.peek() != Some('=') {
            return Ok(String::new());
        }
        self.bump();
        self.skip_inline_whitespace();

        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.peek() {
                        Some(c) if c == quote => {
                            self.bump();
                            break;
                        }
                        Some('\r' | '\n') => return Err(MyCnfError::UnexpectedEol),
                        None => return Err(MyCnfError::UnexpectedEof),
                        Some(_) => value.push(self.parse_escaped_char()),
                    }
                }
                self.expect_line_end()?;
                Ok(value)
            }
            _ => {
                let mut value = String::new();
                while !matches!(self.peek(), Some('\r' | '\n') | None) {
                    value.push(self.parse_escaped_char());
                }
                Ok(value.trim_end().to_string())
            }
        }
    }

    /// One character of a value, resolving backslash escapes. An unknown
    /// escape keeps the backslash, as MySQL does.
    fn parse_escaped_char(&mut self) -> char {
        let c = self.bump().expect("caller checked for end of input");
        if c != '\\' {
            return c;
        }
        let escaped = match self.peek() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('s') => ' ',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            _ => return '\\',
        };
        self.bump();
        escaped
    }
}
