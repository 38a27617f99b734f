//! Attribute parsing for the Mapper derive macro.
//!
//! Handles field-level `#[sqler(...)]` attributes.

use syn::ext::IdentExt;
use syn::{Result, Token};

/// A struct field that maps to a column.
pub(super) struct MappedField<'a> {
    pub ident: &'a syn::Ident,
    pub ty: &'a syn::Type,
    /// The column name in the database
    pub column: String,
}

/// Parsed contents of one `#[sqler(...)]` attribute.
#[derive(Default)]
struct FieldAttr {
    skip: bool,
    column: Option<syn::LitStr>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        // Comma-separated `skip` markers or `column = "..."` pairs
        while !input.is_empty() {
            let ident: syn::Ident = input.call(syn::Ident::parse_any)?;
            if ident == "skip" {
                attr.skip = true;
            } else if ident == "column" {
                let _: Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(value, "column name cannot be empty"));
                }
                attr.column = Some(value);
            } else {
                return Err(syn::Error::new_spanned(
                    ident,
                    "unknown sqler attribute, expected `column = \"...\"` or `skip`",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: Token![,] = input.parse()?;
        }

        Ok(attr)
    }
}

/// Resolve a field's column name, or `None` when the field is skipped.
///
/// Without `#[sqler(column = "...")]` the column is the field name lower-cased.
pub(super) fn mapped_field(field: &syn::Field) -> Result<Option<MappedField<'_>>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Mapper requires named fields"))?;

    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("sqler") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        merged.skip |= parsed.skip;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }

    if merged.skip {
        return Ok(None);
    }

    let column = match merged.column {
        Some(lit) => lit.value(),
        None => ident.unraw().to_string().to_lowercase(),
    };

    Ok(Some(MappedField {
        ident,
        ty: &field.ty,
        column,
    }))
}
