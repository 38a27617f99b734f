//! Convenient imports for typical `sqler` usage.
//!
//! ```ignore
//! use sqler::prelude::*;
//! ```
//!
//! `Mapper` brings in both the trait and, with the `derive` feature, the
//! derive macro.

pub use crate::{
    Execer, Insert, Mapper, Querier, QueryPart, Replace, RowQuery, Select, SqlerError,
    SqlerResult, Statement, Update, Value, ValuesMap, equal, part, values,
};
