//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! This macro generates an implementation of the `Searchable` trait and
//! field name constants for type-safe request building.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs};

/// Main implementation of the Searchable derive macro.
pub fn searchable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Searchable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Searchable can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut registrations: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    // Lowercased external name and constant name, each mapped to its first owner
    let mut seen_names: HashMap<String, String> = HashMap::new();
    let mut seen_consts: HashMap<String, String> = HashMap::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if !attrs.is_searchable() {
            continue;
        }

        // Point errors at the rename literal when there is one
        let span = if attrs.rename.is_some() {
            attrs.span
        } else {
            field_name.span()
        };
        let external_name = attrs.rename.unwrap_or_else(|| field_name.to_string());

        if let Some(first) = seen_names.insert(external_name.to_lowercase(), external_name.clone()) {
            return Err(Error::new(
                span,
                format!("search field name '{external_name}' collides with '{first}'"),
            ));
        }
        let const_text = to_const_name(&external_name);
        if let Some(first) = seen_consts.insert(const_text.clone(), external_name.clone()) {
            return Err(Error::new(
                span,
                format!(
                    "search fields '{first}' and '{external_name}' both map to constant {const_text}; \
                     rename one of them"
                ),
            ));
        }

        let const_name = format_ident!("{}", const_text, span = span);
        field_constants.push(quote! {
            /// External field name for type-safe requests.
            pub const #const_name: &'static str = #external_name;
        });

        registrations.push(quote! {
            let registry = registry.register(#external_name, |record: &Self| &record.#field_name)?;
        });
    }

    let allow = container.operators.map(|operators| {
        quote! {
            let registry = registry.allow_operators([
                #(::fieldgate::Operator::#operators),*
            ]);
        }
    });

    let expanded = quote! {
        #[allow(dead_code)]
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::fieldgate::Searchable for #struct_name #ty_generics #where_clause {
            fn register_fields(
                registry: ::fieldgate::FieldRegistry<Self>,
            ) -> ::fieldgate::Result<::fieldgate::FieldRegistry<Self>> {
                #(#registrations)*
                #allow
                ::core::result::Result::Ok(registry)
            }
        }
    };

    Ok(expanded)
}

/// Convert an external field name to a SCREAMING_SNAKE_CASE constant name.
///
/// Characters that cannot appear in an identifier become `_`.
fn to_const_name(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_ascii_lowercase();
        } else {
            result.push('_');
            prev_was_lower = false;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
