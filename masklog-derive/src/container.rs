//! Attributes placed on the struct or enum itself.

use syn::{Attribute, Meta, Result};

use crate::strategy::TAG_NAMES;

#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Leave `Debug` to the user.
    pub(crate) skip_debug: bool,
}

pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sensitive")) {
        match &attr.meta {
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip_debug") {
                        options.skip_debug = true;
                        return Ok(());
                    }
                    let name = meta
                        .path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string);
                    if TAG_NAMES.contains(&name.as_str()) {
                        Err(meta.error(format!(
                            "tags apply to fields; move `#[sensitive({name})]` onto the fields \
                            holding the value"
                        )))
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{name}`; expected `skip_debug`"
                        )))
                    }
                })?;
            }
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "bare #[sensitive] has no meaning on a type; annotate its fields instead",
                ));
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for container-level #[sensitive]",
                ));
            }
        }
    }

    Ok(options)
}
