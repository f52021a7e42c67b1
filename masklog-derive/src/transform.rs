//! Shared field handling for struct and enum derivation.
//!
//! Both derivations destructure a value into per-field bindings and then emit
//! one `Fields` call per rendered field; this module generates both halves.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, LitStr, Result};

use crate::{
    generics::collect_generics_from_type,
    strategy::{parse_field_strategy, Strategy},
    types::{is_scalar_type, peel_references},
};

/// Accumulated state during field processing.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) root: &'a TokenStream,
    pub(crate) redact_generics: &'a mut Vec<Ident>,
    pub(crate) flatten_generics: &'a mut Vec<Ident>,
}

/// A destructuring pattern plus the statements rendering the bound fields.
pub(crate) struct FieldsCode {
    /// `{ a: field_a, b: _ }`, `(field_0, _)` or nothing for unit shapes.
    pub(crate) pattern: TokenStream,
    pub(crate) emits: Vec<TokenStream>,
}

/// The label a field is rendered under.
pub(crate) fn label(ident: &Ident) -> LitStr {
    LitStr::new(&ident.unraw().to_string(), ident.span())
}

pub(crate) fn generate_fields(
    ctx: &mut DeriveContext<'_>,
    fields: &syn::Fields,
) -> Result<FieldsCode> {
    let mut patterns = Vec::new();
    let mut emits = Vec::new();

    match fields {
        syn::Fields::Named(named) => {
            for field in &named.named {
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let strategy = parse_field_strategy(&field.attrs)?;
                if matches!(strategy, Strategy::Skip) {
                    patterns.push(quote! { #ident: _ });
                    continue;
                }
                let binding = format_ident!("field_{}", ident.unraw());
                patterns.push(quote! { #ident: #binding });
                emits.push(generate_field_emit(
                    ctx,
                    &field.ty,
                    Some(ident),
                    &binding,
                    field.span(),
                    &strategy,
                )?);
            }
            Ok(FieldsCode {
                pattern: quote! { { #(#patterns),* } },
                emits,
            })
        }
        syn::Fields::Unnamed(unnamed) => {
            for (index, field) in unnamed.unnamed.iter().enumerate() {
                let strategy = parse_field_strategy(&field.attrs)?;
                if matches!(strategy, Strategy::Skip) {
                    patterns.push(quote! { _ });
                    continue;
                }
                let binding = format_ident!("field_{index}");
                patterns.push(quote! { #binding });
                emits.push(generate_field_emit(
                    ctx,
                    &field.ty,
                    None,
                    &binding,
                    field.span(),
                    &strategy,
                )?);
            }
            Ok(FieldsCode {
                pattern: quote! { ( #(#patterns),* ) },
                emits,
            })
        }
        syn::Fields::Unit => Ok(FieldsCode {
            pattern: TokenStream::new(),
            emits,
        }),
    }
}

/// Generates the statement rendering one bound field.
///
/// | Annotation | Emitted call |
/// |------------|--------------|
/// | None | `fields.field(name, value, None)` |
/// | `#[sensitive]` | `fields.field(name, value, fields.inherited())` |
/// | `#[sensitive(Tag)]` | `fields.field(name, value, Some(Tag::Tag))` |
/// | `#[sensitive(flatten)]` | `fields.flatten(value)` |
///
/// Positional fields use `fields.element(value, tag)` instead.
fn generate_field_emit(
    ctx: &mut DeriveContext<'_>,
    ty: &syn::Type,
    name: Option<&Ident>,
    binding: &Ident,
    span: Span,
    strategy: &Strategy,
) -> Result<TokenStream> {
    let root = ctx.root;
    let tag = match strategy {
        Strategy::PassThrough => quote! { ::core::option::Option::None },
        Strategy::Inherit => quote! { fields.inherited() },
        Strategy::Classify(tag) => {
            if is_scalar_type(peel_references(ty)) {
                return Err(syn::Error::new(
                    span,
                    format!(
                        "`#[sensitive({tag})]` cannot be used on a number, bool or char field: \
                        only strings are masked"
                    ),
                ));
            }
            quote! { ::core::option::Option::Some(#root::Tag::#tag) }
        }
        Strategy::Flatten => {
            if is_scalar_type(peel_references(ty)) {
                return Err(syn::Error::new(
                    span,
                    "`#[sensitive(flatten)]` needs a named struct deriving `Sensitive`",
                ));
            }
            collect_generics_from_type(ty, ctx.generics, ctx.flatten_generics);
            return Ok(quote_spanned! { span =>
                fields.flatten(#binding);
            });
        }
        Strategy::Skip => return Ok(TokenStream::new()),
    };

    collect_generics_from_type(ty, ctx.generics, ctx.redact_generics);
    Ok(match name {
        Some(ident) => {
            let label = label(ident);
            quote_spanned! { span =>
                fields.field(#label, #binding, #tag);
            }
        }
        None => quote_spanned! { span =>
            fields.element(#binding, #tag);
        },
    })
}
