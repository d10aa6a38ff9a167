//! Best-effort rewrite of an SQLite `.dump` into PostgreSQL syntax.
//!
//! Pure text substitution: string literals and comments are rewritten too.
//! INSERT table names are unquoted first, and only when the quoted name stands
//! alone. No rule's output matches any rule, so running [`convert`] on its own
//! output changes nothing.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PRAGMA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^[ \t]*PRAGMA\b[^\n]*;[ \t]*(?:\r?\n|$)").expect("valid regex"));
static INTEGER_PK_AUTOINCREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bINTEGER\s+PRIMARY\s+KEY\s+AUTOINCREMENT\b").expect("valid regex")
});
static AUTOINCREMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAUTOINCREMENT\b").expect("valid regex"));
static INTEGER_PK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINTEGER\s+PRIMARY\s+KEY\b").expect("valid regex"));
static BOOLEAN_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<kw>BOOLEAN)\b(?P<rest>[^,\n)]*)").expect("valid regex")
});
static QUOTED_INSERT_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(INSERT\s+INTO\s+)"([^"\s]+)"([\s(]|$)"#).expect("valid regex")
});
static DEFAULT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\b").expect("valid regex"));

/// How many substitutions each rule made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionCounts {
    pub pragmas_removed: usize,
    pub autoincrement_keys: usize,
    pub autoincrement_markers: usize,
    pub integer_keys: usize,
    pub boolean_defaults: usize,
    pub insert_tables_unquoted: usize,
}

impl ConversionCounts {
    pub fn total(&self) -> usize {
        self.pragmas_removed
            + self.autoincrement_keys
            + self.autoincrement_markers
            + self.integer_keys
            + self.boolean_defaults
            + self.insert_tables_unquoted
    }
}

pub fn convert(sql: &str) -> String {
    convert_with_counts(sql).0
}

pub fn convert_with_counts(sql: &str) -> (String, ConversionCounts) {
    let mut counts = ConversionCounts::default();

    counts.pragmas_removed = PRAGMA_LINE.find_iter(sql).count();
    let text = PRAGMA_LINE.replace_all(sql, "");

    // Unquoting can splice tokens into keywords, so it runs before the keyword rules.
    counts.insert_tables_unquoted = QUOTED_INSERT_TABLE.find_iter(&text).count();
    let text = QUOTED_INSERT_TABLE.replace_all(&text, "${1}${2}${3}");

    counts.autoincrement_keys = INTEGER_PK_AUTOINCREMENT.find_iter(&text).count();
    let text = INTEGER_PK_AUTOINCREMENT.replace_all(&text, "SERIAL PRIMARY KEY");

    counts.autoincrement_markers = AUTOINCREMENT.find_iter(&text).count();
    let text = AUTOINCREMENT.replace_all(&text, "SERIAL");

    counts.integer_keys = INTEGER_PK.find_iter(&text).count();
    let text = INTEGER_PK.replace_all(&text, "SERIAL PRIMARY KEY");

    let text = BOOLEAN_COLUMN.replace_all(&text, |caps: &Captures| {
        let rest = &caps["rest"];
        if DEFAULT_KEYWORD.is_match(rest) {
            caps[0].to_string()
        } else {
            counts.boolean_defaults += 1;
            format!("{} DEFAULT FALSE{}", &caps["kw"], rest)
        }
    });

    (text.into_owned(), counts)
}
