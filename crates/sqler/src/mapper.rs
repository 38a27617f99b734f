//! Struct field <-> column mapping.
//!
//! Rust has no runtime reflection, so the field list and the value
//! accessors are generated at compile time by `#[derive(Mapper)]`:
//!
//! ```ignore
//! use sqler::Mapper;
//!
//! #[derive(Debug, Default, Mapper)]
//! struct User {
//!     id: i64,
//!     #[sqler(column = "user_name")]
//!     name: String,
//!     #[sqler(skip)]
//!     cached: Option<String>,
//! }
//!
//! assert_eq!(User::FIELDS, &["id", "user_name"]);
//! let cond = user.equal_values(&[User::COL_ID]);
//! ```
//!
//! A field maps to the column named by `#[sqler(column = "...")]`, or to its
//! own name lower-cased.

use crate::error::SqlerResult;
use crate::part::{QueryPart, equal};
use crate::row::ResultRow;
use crate::value::Value;
use crate::values_map::ValuesMap;

/// Adapter between a struct's fields and database column names.
pub trait Mapper {
    /// Column names of all mapped fields, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Values of all mapped fields, keyed by column name.
    fn values(&self) -> ValuesMap;

    /// Assign every entry whose key names a mapped field; other keys are ignored.
    ///
    /// All conversions are checked before any field is written, so on error
    /// the struct is left unchanged.
    fn set_values(&mut self, values: ValuesMap) -> SqlerResult<()>;

    /// Whether `column` names a mapped field.
    fn has_field(column: &str) -> bool {
        Self::FIELDS.iter().any(|f| *f == column)
    }

    /// Column names of all mapped fields, in declaration order.
    fn fields() -> Vec<&'static str> {
        Self::FIELDS.to_vec()
    }

    /// Column names of the selected fields, in the given order.
    ///
    /// Names that do not belong to this struct are skipped.
    fn fields_of(columns: &[&str]) -> Vec<&'static str> {
        columns
            .iter()
            .filter_map(|c| Self::FIELDS.iter().find(|f| **f == *c).copied())
            .collect()
    }

    /// Values of the selected fields only.
    fn values_of(&self, columns: &[&str]) -> ValuesMap {
        let mut values = self.values();
        values.retain(|column, _| columns.iter().any(|c| *c == column));
        values
    }

    /// `col = ?` conditions over the selected fields, joined with `AND`.
    fn equal_values(&self, columns: &[&str]) -> QueryPart {
        equal(&self.values_of(columns))
    }

    /// Assign a single field. Returns `false` if `column` is not mapped.
    fn set_value(&mut self, column: &str, value: impl Into<Value>) -> SqlerResult<bool> {
        if !Self::has_field(column) {
            return Ok(false);
        }
        self.set_values(ValuesMap::new().with(column, value))?;
        Ok(true)
    }

    /// Populate fields from the columns of `row` with matching names.
    ///
    /// Columns without a matching field are ignored. Decode or conversion
    /// errors are returned and leave the struct unchanged.
    fn scan_row<R: ResultRow>(&mut self, row: &R) -> SqlerResult<()> {
        let values = row.values_where(Self::has_field)?;
        self.set_values(values)
    }
}

/// Populate `target` from `row`. See [`Mapper::scan_row`].
pub fn scan_row<T: Mapper, R: ResultRow>(row: &R, target: &mut T) -> SqlerResult<()> {
    target.scan_row(row)
}

/// Build a fresh `T` from `row`, leaving unmatched fields at their defaults.
pub fn from_row<T: Mapper + Default, R: ResultRow>(row: &R) -> SqlerResult<T> {
    let mut target = T::default();
    target.scan_row(row)?;
    Ok(target)
}
