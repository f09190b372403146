//! Attribute parsing for the Searchable derive macro.
//!
//! Field attributes:
//!
//! - `#[search]` marks a field searchable under its own name
//! - `#[search(rename = "...")]` marks it under a custom name
//! - `#[search(skip)]` excludes it explicitly
//!
//! Struct attribute:
//!
//! - `#[search(operators(Equals, Contains, ...))]` restricts the registry's
//!   operator set

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// Operator names accepted in `operators(...)`.
pub const OPERATORS: [&str; 9] = [
    "Equals",
    "NotEquals",
    "GreaterThan",
    "GreaterThanOrEqual",
    "LessThan",
    "LessThanOrEqual",
    "Contains",
    "StartsWith",
    "EndsWith",
];

/// Field-level attributes from `#[search(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// The field carries a `#[search]` attribute at all.
    pub marked: bool,
    /// Exclude this field.
    pub skip: bool,
    /// Custom external name (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            marked: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl FieldAttr {
    /// Returns `true` if the field should be registered.
    pub fn is_searchable(&self) -> bool {
        self.marked && !self.skip
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr {
            marked: true,
            ..FieldAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    };
                    if s.value().is_empty() {
                        return Err(Error::new(s.span(), "rename must not be empty"));
                    }
                    attr.rename = Some(s.value());
                    attr.span = s.span();
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown search attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Struct-level attributes from `#[search(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// Allowed operators, if restricted.
    pub operators: Option<Vec<Ident>>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::List(list) if list.path.is_ident("operators") => {
                    let names = list.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
                    for name in &names {
                        if !OPERATORS.contains(&name.to_string().as_str()) {
                            return Err(Error::new(
                                name.span(),
                                format!(
                                    "unknown operator: '{}'. Expected one of: {}",
                                    name,
                                    OPERATORS.join(", ")
                                ),
                            ));
                        }
                    }
                    attr.operators = Some(names.into_iter().collect());
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown search attribute. Expected: operators(...)",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[search]` / `#[search(...)]` from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("search") {
            return match &attr.meta {
                Meta::Path(p) => Ok(FieldAttr {
                    marked: true,
                    span: p.span(),
                    ..FieldAttr::default()
                }),
                _ => attr.parse_args::<FieldAttr>(),
            };
        }
    }
    Ok(FieldAttr::default())
}

/// Extract `#[search(...)]` from a struct's attributes.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("search") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
