//! Derive macros for sqler
//!
//! Provides `#[derive(Mapper)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod mapper;

/// Derive the `Mapper` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use sqler::Mapper;
///
/// #[derive(Default, Mapper)]
/// struct User {
///     id: i64,
///     #[sqler(column = "user_name")]
///     name: String,
///     #[sqler(skip)]
///     session: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `impl sqler::Mapper` with `FIELDS`, `values()` and `set_values()`
/// - `COL_*: &'static str` - Column name constants, one per mapped field
///
/// # Attributes
///
/// - `#[sqler(column = "name")]` - Map field to a different column name
/// - `#[sqler(skip)]` - Leave the field out of the mapping
///
/// Fields without `column` map to their own name, lower-cased.
/// Mapped field types must implement `Clone`, `Into<sqler::Value>` and
/// `sqler::FromValue`.
#[proc_macro_derive(Mapper, attributes(sqler))]
pub fn derive_mapper(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    mapper::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
