//! Derive macro for `masklog`.
//!
//! This crate generates the traversal code behind `#[derive(Sensitive)]`. It:
//! - reads `#[sensitive(...)]` field attributes
//! - emits `Redact` (and `RedactFields` for named structs) reporting the
//!   type's shape to the masklog walker
//! - emits a `Debug` impl that prints the redacted rendering
//!
//! Masking rules live in `masklog`; this crate only names the tags.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

#[cfg(feature = "slog")]
use proc_macro2::Span;
use proc_macro2::{Ident, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
mod types;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::add_bounds;

/// Derives `masklog::Redact` (and related impls) for structs and enums.
///
/// # Container Attributes
///
/// - `#[sensitive(skip_debug)]` - Do not generate `Debug`. Use this when the
///   type needs its own `Debug` implementation.
///
/// # Field Attributes
///
/// - **No annotation**: the field is rendered untagged. Strings are still
///   scanned for `key=value` pairs and maps classify values by key name.
/// - `#[sensitive(Tag)]`: every string reachable from the field is masked
///   with the rule of `Tag`, one of `CardNumber`, `IdentityCard`,
///   `PhoneNumber`, `Email`, `AlipayAccount` or `RealName`. Tagging a number,
///   `bool` or `char` field is a compile error.
/// - `#[sensitive]`: the field inherits the tag active on the enclosing value,
///   so `#[sensitive(Email)] contact: Contact` reaches it.
/// - `#[sensitive(flatten)]`: the fields of an embedded named struct are
///   rendered as if declared here.
/// - `#[sensitive(skip)]`: the field is left out of the rendering.
///
/// Unions are rejected at compile time.
///
/// # Additional Generated Impls
///
/// - `Debug`: prints exactly what a log line would contain.
/// - `slog::Value` (behind `cfg(feature = "slog")`): emits the redacted
///   rendering as a string. The derive first looks for a top-level `slog`
///   crate; if not found, it reads the `MASKLOG_SLOG_CRATE` env var for an
///   alternate path (e.g., `my_log::slog`).
#[proc_macro_derive(Sensitive, attributes(sensitive))]
pub fn derive_sensitive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the masklog crate root.
///
/// Handles crate renaming (e.g., `logs = { package = "masklog", ... }`).
/// Inside masklog itself the root resolves through its
/// `extern crate self as masklog`, which also covers its integration tests.
fn crate_root() -> TokenStream {
    match crate_name("masklog") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::masklog },
    }
}

/// Returns the token stream to reference the slog crate root.
///
/// If the top-level `slog` crate is not available, falls back to the
/// `MASKLOG_SLOG_CRATE` env var, which should be a path like `my_log::slog`.
#[cfg(feature = "slog")]
fn slog_crate() -> Result<TokenStream> {
    match crate_name("slog") {
        Ok(FoundCrate::Itself) => Ok(quote! { crate }),
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            Ok(quote! { ::#ident })
        }
        Err(_) => {
            let env_value = std::env::var("MASKLOG_SLOG_CRATE").map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    "slog support is enabled, but no top-level `slog` crate was found. \
Set the MASKLOG_SLOG_CRATE env var to a path (e.g., `my_log::slog`) or add \
`slog` as a direct dependency.",
                )
            })?;
            let path = syn::parse_str::<syn::Path>(&env_value).map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    format!("MASKLOG_SLOG_CRATE must be a valid Rust path (got `{env_value}`)"),
                )
            })?;
            Ok(quote! { #path })
        }
    }
}

/// Generated pieces shared by the struct and enum derivations.
pub(crate) struct DeriveOutput {
    /// Body of `Redact::walk`, with `walker` and `tag` in scope.
    pub(crate) walk_body: TokenStream,
    /// Body of `RedactFields::walk_fields`, with `fields` in scope. Only named
    /// structs have one.
    pub(crate) fields_body: Option<TokenStream>,
    /// Type parameters that must implement `Redact`.
    pub(crate) redact_generics: Vec<Ident>,
    /// Type parameters that must implement `RedactFields`.
    pub(crate) flatten_generics: Vec<Ident>,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { skip_debug } = parse_container_options(&attrs)?;

    let root = crate_root();

    let output = match data {
        Data::Struct(data) => derive_struct(&ident, data, &generics, &root)?,
        Data::Enum(data) => derive_enum(data, &generics, &root)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Sensitive` cannot be derived for unions",
            ));
        }
    };

    let bounded = add_bounds(
        generics,
        &output.redact_generics,
        &output.flatten_generics,
        &root,
    );
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();
    let walk_body = &output.walk_body;

    let fields_impl = output.fields_body.as_ref().map(|fields_body| {
        quote! {
            impl #impl_generics #root::RedactFields for #ident #ty_generics #where_clause {
                #[allow(unused_variables)]
                fn walk_fields(&self, fields: &mut #root::Fields<'_>) {
                    #fields_body
                }
            }
        }
    });

    let debug_impl = if skip_debug {
        quote! {}
    } else {
        quote! {
            impl #impl_generics ::core::fmt::Debug for #ident #ty_generics #where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.write_str(&#root::redact(self, ::core::option::Option::None))
                }
            }
        }
    };

    // Only generate the slog impl when the slog feature is enabled on
    // masklog-derive.
    #[cfg(feature = "slog")]
    let slog_impl = {
        let slog_crate = slog_crate()?;
        quote! {
            impl #impl_generics #slog_crate::Value for #ident #ty_generics #where_clause {
                fn serialize(
                    &self,
                    record: &#slog_crate::Record<'_>,
                    key: #slog_crate::Key,
                    serializer: &mut dyn #slog_crate::Serializer,
                ) -> #slog_crate::Result {
                    let redacted = #root::slog::RedactedText::new(self, ::core::option::Option::None);
                    #slog_crate::Value::serialize(&redacted, record, key, serializer)
                }
            }
        }
    };

    #[cfg(not(feature = "slog"))]
    let slog_impl = quote! {};

    Ok(quote! {
        impl #impl_generics #root::Redact for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn walk(
                &self,
                walker: &mut #root::Walker,
                tag: ::core::option::Option<#root::Tag>,
            ) {
                #walk_body
            }
        }

        #fields_impl

        #debug_impl

        #slog_impl

        // `slog` already provides `impl<V: Value> Value for &V`, so a reference
        // impl here would conflict with the blanket impl.
    })
}
