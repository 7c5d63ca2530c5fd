// Parameter and return-type classification for #[export]
//
// Decides how each Rust parameter maps onto the boundary (by value, by
// reference, or the call context) and generates the per-argument
// marshaling code.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, Ident, PathArguments, ReturnType, Type};

/// How a Rust parameter crosses the boundary.
pub enum ParamKind {
    /// `&dyn CallContext`; not a boundary parameter
    Context,
    /// `T`, passed by value
    Value(Type),
    /// `&T`, `&str` or `&[T]`; decoded into the owned type and borrowed
    Borrowed(Type),
    /// `&mut T`; decoded, mutated in place, written back
    Reference(Type),
}

/// How the return value is produced.
pub enum ReturnKind {
    /// No return value
    Unit,
    /// Infallible `T`
    Plain(Type),
    /// `Result<T, E>`; `None` when `T` is `()`
    Fallible(Option<Type>),
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(t) if t.elems.is_empty())
}

fn is_str(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.qself.is_none() && p.path.is_ident("str"))
}

/// Classifies one parameter type.
pub fn classify_param(ty: &Type) -> syn::Result<ParamKind> {
    match ty {
        Type::Reference(r) => {
            if let Type::TraitObject(_) = &*r.elem {
                if r.mutability.is_some() {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "the call context must be borrowed immutably",
                    ));
                }
                return Ok(ParamKind::Context);
            }

            if r.mutability.is_some() {
                if is_str(&r.elem) || matches!(&*r.elem, Type::Slice(_)) {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "by-reference parameters are replaced whole; use &mut String or &mut Vec<T>",
                    ));
                }
                return Ok(ParamKind::Reference((*r.elem).clone()));
            }

            let owned: Type = match &*r.elem {
                Type::Slice(slice) => {
                    let elem = &slice.elem;
                    syn::parse_quote!(::std::vec::Vec<#elem>)
                }
                elem if is_str(elem) => syn::parse_quote!(::std::string::String),
                elem => elem.clone(),
            };
            Ok(ParamKind::Borrowed(owned))
        }
        Type::ImplTrait(_) => Err(syn::Error::new_spanned(
            ty,
            "impl Trait parameters have no boundary tag",
        )),
        other => Ok(ParamKind::Value(other.clone())),
    }
}

/// Classifies the return type.
pub fn classify_return(output: &ReturnType) -> ReturnKind {
    let ty = match output {
        ReturnType::Default => return ReturnKind::Unit,
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    if is_unit(ty) {
        return ReturnKind::Unit;
    }

    if let Type::Path(path) = ty {
        if let Some(last) = path.path.segments.last() {
            let is_result = last.ident == "Result" || last.ident == "BoundaryResult";
            if let (true, PathArguments::AngleBracketed(args)) = (is_result, &last.arguments) {
                if let Some(GenericArgument::Type(inner)) = args.args.first() {
                    if is_unit(inner) {
                        return ReturnKind::Fallible(None);
                    }
                    return ReturnKind::Fallible(Some(inner.clone()));
                }
            }
        }
    }

    ReturnKind::Plain(ty.clone())
}

/// Generates code to decode argument `index` into `name`.
///
/// Mismatches are reported against the entry point and position.
pub fn generate_arg_decode(
    name: &Ident,
    ty: &Type,
    index: usize,
    entry: &str,
    mutable: bool,
) -> TokenStream {
    let binding = if mutable {
        quote! { mut #name }
    } else {
        quote! { #name }
    };
    quote! {
        let #binding = <#ty as ::xcall_sdk::FromBoundary>::from_boundary(&__args[#index])
            .map_err(|e| e.at(::std::format!("{} parameter {}", #entry, #index)))?;
    }
}

/// Generates the write-back of a by-reference parameter into its slot.
pub fn generate_writeback(name: &Ident, index: usize) -> TokenStream {
    quote! {
        __args[#index] = ::xcall_sdk::ToBoundary::to_boundary(&#name)?;
    }
}

/// Generates the tag expression for a Rust type.
pub fn generate_tag(ty: &Type) -> TokenStream {
    quote! { <#ty as ::xcall_sdk::Tagged>::type_tag() }
}
