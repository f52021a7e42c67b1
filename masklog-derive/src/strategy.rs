//! Parsing of `#[sensitive(...)]` field attributes.
//!
//! This module maps attribute syntax to rendering decisions and produces
//! structured errors for invalid forms.

use proc_macro2::{Ident, Span};
use syn::{spanned::Spanned, Attribute, Meta, Result};

/// Tag names accepted in `#[sensitive(Tag)]`, matching `masklog::Tag`.
pub(crate) const TAG_NAMES: [&str; 6] = [
    "CardNumber",
    "IdentityCard",
    "PhoneNumber",
    "Email",
    "AlipayAccount",
    "RealName",
];

/// How a single field is rendered.
///
/// | Attribute | Strategy |
/// |-----------|----------|
/// | None | `PassThrough` |
/// | `#[sensitive]` | `Inherit` |
/// | `#[sensitive(Tag)]` | `Classify(Tag)` |
/// | `#[sensitive(flatten)]` | `Flatten` |
/// | `#[sensitive(skip)]` | `Skip` |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// Rendered without a tag.
    PassThrough,
    /// Rendered with the tag active on the enclosing value.
    Inherit,
    /// Rendered with a fixed tag.
    Classify(Ident),
    /// The embedded struct's fields are rendered in place.
    Flatten,
    /// Left out of the rendering.
    Skip,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[sensitive] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

fn parse_option(ident: Ident) -> Result<Strategy> {
    if ident == "flatten" {
        return Ok(Strategy::Flatten);
    }
    if ident == "skip" {
        return Ok(Strategy::Skip);
    }
    if TAG_NAMES.iter().any(|name| ident == name) {
        return Ok(Strategy::Classify(ident));
    }
    Err(syn::Error::new(
        ident.span(),
        format!(
            "unknown tag `{ident}`; expected one of {}, or `flatten` / `skip`",
            TAG_NAMES.join(", ")
        ),
    ))
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("sensitive") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                set_strategy(&mut strategy, Strategy::Inherit, attr.span())?;
            }
            Meta::List(list) => {
                let Ok(ident) = syn::parse2::<Ident>(list.tokens.clone()) else {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected a tag name (e.g., #[sensitive(PhoneNumber)])",
                    ));
                };
                set_strategy(&mut strategy, parse_option(ident)?, attr.span())?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[sensitive]",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::PassThrough))
}
