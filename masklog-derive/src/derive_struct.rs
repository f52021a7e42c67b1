//! Struct-specific `Redact` derivation.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{DataStruct, Fields, Result};

use crate::{
    transform::{generate_fields, label, DeriveContext, FieldsCode},
    DeriveOutput,
};

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut redact_generics = Vec::new();
    let mut flatten_generics = Vec::new();
    let mut ctx = DeriveContext {
        generics,
        root,
        redact_generics: &mut redact_generics,
        flatten_generics: &mut flatten_generics,
    };
    let FieldsCode { pattern, emits } = generate_fields(&mut ctx, &data.fields)?;
    let label = label(name);

    let (walk_body, fields_body) = match data.fields {
        // Named structs walk through their `RedactFields` impl so the same
        // field list serves both standalone rendering and flattening.
        Fields::Named(_) => (
            quote! {
                walker.record(#label, tag, |fields| {
                    #root::RedactFields::walk_fields(self, fields);
                });
            },
            Some(quote! {
                let Self #pattern = self;
                #(#emits)*
            }),
        ),
        Fields::Unnamed(_) => (
            quote! {
                walker.tuple(#label, tag, |fields| {
                    let Self #pattern = self;
                    #(#emits)*
                });
            },
            None,
        ),
        Fields::Unit => (quote! { walker.unit(#label); }, None),
    };

    Ok(DeriveOutput {
        walk_body,
        fields_body,
        redact_generics,
        flatten_generics,
    })
}
