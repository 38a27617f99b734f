//! Mapper derive macro implementation
//!
//! ## Module Structure
//!
//! - `attrs`: field attribute parsing and column-name resolution

mod attrs;

use attrs::{MappedField, mapped_field};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Mapper can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Mapper can only be derived for structs",
            ));
        }
    };

    let mut mapped: Vec<MappedField> = Vec::new();
    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();
    for field in fields {
        let Some(info) = mapped_field(field)? else {
            continue;
        };
        if let Some(previous) = seen.insert(info.column.clone(), info.ident) {
            return Err(syn::Error::new_spanned(
                info.ident,
                format!(
                    "column `{}` is already mapped by field `{}`",
                    info.column, previous
                ),
            ));
        }
        mapped.push(info);
    }

    let columns: Vec<&String> = mapped.iter().map(|f| &f.column).collect();
    let idents: Vec<&syn::Ident> = mapped.iter().map(|f| f.ident).collect();
    let types: Vec<&syn::Type> = mapped.iter().map(|f| f.ty).collect();
    let col_consts: Vec<syn::Ident> = mapped
        .iter()
        .map(|f| format_ident!("COL_{}", f.ident.unraw().to_string().to_uppercase()))
        .collect();
    let slots: Vec<syn::Ident> = mapped
        .iter()
        .map(|f| format_ident!("__sqler_{}", f.ident.unraw()))
        .collect();

    let set_values_body = if mapped.is_empty() {
        quote! {
            let _ = values;
            ::std::result::Result::Ok(())
        }
    } else {
        quote! {
            #(
                let mut #slots: ::std::option::Option<#types> = ::std::option::Option::None;
            )*

            for (column, value) in values {
                match column.as_str() {
                    #(
                        #columns => {
                            #slots = ::std::option::Option::Some(
                                <#types as ::sqler::FromValue>::from_value(value)
                                    .map_err(|e| e.at_column(#columns))?,
                            );
                        }
                    )*
                    _ => {}
                }
            }

            #(
                if let ::std::option::Option::Some(value) = #slots {
                    self.#idents = value;
                }
            )*

            ::std::result::Result::Ok(())
        }
    };

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(
                pub const #col_consts: &'static str = #columns;
            )*
        }

        impl #impl_generics ::sqler::Mapper for #name #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#columns),*];

            fn values(&self) -> ::sqler::ValuesMap {
                let mut values = ::sqler::ValuesMap::new();
                #(
                    values.insert(
                        #columns,
                        ::sqler::Value::from(::std::clone::Clone::clone(&self.#idents)),
                    );
                )*
                values
            }

            #[allow(non_snake_case)]
            fn set_values(&mut self, values: ::sqler::ValuesMap) -> ::sqler::SqlerResult<()> {
                #set_values_body
            }
        }
    })
}
