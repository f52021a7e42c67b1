//! Enum-specific `Redact` derivation.
//!
//! Every variant becomes one match arm rendering the variant the way a struct
//! of the same shape would be rendered, under the variant's name.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, Fields, Result};

use crate::{
    transform::{generate_fields, label, DeriveContext, FieldsCode},
    DeriveOutput,
};

pub(crate) fn derive_enum(
    data: DataEnum,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut redact_generics = Vec::new();
    let mut flatten_generics = Vec::new();
    let mut arms = Vec::new();

    for variant in &data.variants {
        let mut ctx = DeriveContext {
            generics,
            root,
            redact_generics: &mut redact_generics,
            flatten_generics: &mut flatten_generics,
        };
        let FieldsCode { pattern, emits } = generate_fields(&mut ctx, &variant.fields)?;
        let variant_ident = &variant.ident;
        let label = label(variant_ident);

        let render = match variant.fields {
            Fields::Named(_) => quote! {
                walker.record(#label, tag, |fields| {
                    #(#emits)*
                })
            },
            Fields::Unnamed(_) => quote! {
                walker.tuple(#label, tag, |fields| {
                    #(#emits)*
                })
            },
            Fields::Unit => quote! { walker.unit(#label) },
        };
        arms.push(quote! {
            Self::#variant_ident #pattern => #render
        });
    }

    let walk_body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#arms),*
            }
        }
    };

    Ok(DeriveOutput {
        walk_body,
        fields_body: None,
        redact_generics,
        flatten_generics,
    })
}
