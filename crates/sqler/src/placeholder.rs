//! Positional placeholder styles.
//!
//! Statements and query parts are always written with `?` placeholders.
//! Executors that need another style (tokio-postgres wants `$1, $2, ...`)
//! report it through [`Execer::placeholder`](crate::Execer::placeholder) and
//! the statement is rewritten with [`Placeholder::rebind`] right before it is
//! sent.

use serde::Deserialize;
use std::borrow::Cow;

/// Placeholder syntax understood by the executing driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// `?` (MySQL, SQLite, ODBC style)
    #[default]
    Question,
    /// `$1, $2, ...` (Postgres style)
    Dollar,
}

impl Placeholder {
    /// Rewrite the `?` placeholders of `sql` into this style.
    ///
    /// Question marks inside string literals (including `E'...'` escape
    /// strings and `$tag$...$tag$` dollar quoting), quoted identifiers and
    /// comments are left alone. Under [`Placeholder::Dollar`], `??` yields a literal `?`
    /// (needed for Postgres operators such as `jsonb ?? 'key'`).
    pub fn rebind<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self {
            Placeholder::Question => Cow::Borrowed(sql),
            Placeholder::Dollar => Cow::Owned(rebind_dollar(sql).0),
        }
    }
}

fn rebind_dollar(sql: &str) -> (String, usize) {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let rest = &sql[pos..];
        let skip = match bytes[pos] {
            b'\'' => quoted_len(rest, b'\'', is_escape_string(bytes, pos)),
            b'"' => quoted_len(rest, b'"', false),
            b'-' if rest.starts_with("--") => rest.find('\n').map_or(rest.len(), |n| n + 1),
            b'/' if rest.starts_with("/*") => rest[2..].find("*/").map_or(rest.len(), |n| n + 4),
            b'$' if pos == 0 || !is_ident_byte(bytes[pos - 1]) => dollar_quoted_len(rest),
            b'?' if rest.starts_with("??") => {
                out.push('?');
                pos += 2;
                continue;
            }
            b'?' => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
                pos += 1;
                continue;
            }
            _ => 0,
        };

        if skip > 0 {
            out.push_str(&rest[..skip]);
            pos += skip;
        } else if let Some(c) = rest.chars().next() {
            out.push(c);
            pos += c.len_utf8();
        }
    }

    (out, index)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `E'...'` / `e'...'`: the quote at `pos` opens a backslash-escaped literal.
fn is_escape_string(bytes: &[u8], pos: usize) -> bool {
    pos > 0
        && matches!(bytes[pos - 1], b'E' | b'e')
        && (pos == 1 || !is_ident_byte(bytes[pos - 2]))
}

/// Length of the quoted run at the start of `rest`, including both quotes.
///
/// A doubled quote closes and immediately reopens the run, which scans the same.
/// Unterminated runs extend to the end of the input.
fn quoted_len(rest: &str, quote: u8, backslash_escapes: bool) -> usize {
    let bytes = rest.as_bytes();
    let mut pos = 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if backslash_escapes => pos += 2,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    rest.len()
}

/// Length of a `$tag$ ... $tag$` body at the start of `rest`, or 0 if `rest`
/// does not open a dollar quote (e.g. a `$1` parameter).
fn dollar_quoted_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let Some(tag_end) = rest[1..].find('$').map(|n| n + 2) else {
        return 0;
    };
    let tag = &bytes[1..tag_end - 1];
    let valid_tag = tag.iter().all(|b| is_ident_byte(*b))
        && tag.first().is_none_or(|b| !b.is_ascii_digit());
    if !valid_tag {
        return 0;
    }
    let delimiter = &rest[..tag_end];
    rest[tag_end..]
        .find(delimiter)
        .map_or(rest.len(), |n| tag_end + n + delimiter.len())
}

/// Count the `?` placeholders of a statement written in question style.
pub fn count_placeholders(sql: &str) -> usize {
    rebind_dollar(sql).1
}
