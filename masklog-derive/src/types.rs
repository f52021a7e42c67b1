//! Type utilities for the derive macro.

/// Checks if a type is a number, `bool` or `char`.
///
/// Only bare primitive names are recognized. Qualified paths, generics and
/// aliases are left to the trait system.
pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    if path.qself.is_some() || path.path.leading_colon.is_some() {
        return false;
    }
    let Some(ident) = path.path.get_ident() else {
        return false;
    };
    matches!(
        ident.to_string().as_str(),
        "i8" | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
            | "bool"
            | "char"
    )
}

/// Looks through references and parentheses, so `&'a u32` counts as `u32`.
pub(crate) fn peel_references(mut ty: &syn::Type) -> &syn::Type {
    loop {
        match ty {
            syn::Type::Reference(reference) => ty = &reference.elem,
            syn::Type::Paren(paren) => ty = &paren.elem,
            syn::Type::Group(group) => ty = &group.elem,
            _ => return ty,
        }
    }
}
