// #[export] proc-macro implementation
//
// Generates the signature and marshaling adapter for a boundary entry point.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ItemFn, LitStr, Pat, Result};

use crate::params::{
    classify_param, classify_return, generate_arg_decode, generate_tag, generate_writeback,
    ParamKind, ReturnKind,
};

/// Expands the #[export] attribute macro.
///
/// Input: Original Rust function
/// Output: Original function + `<fn>_export()` constructor
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[export("ParamRef2")]
/// fn param_ref2(a: &mut i32, b: &mut f32) { ... }
///
/// // Output:
/// fn param_ref2(a: &mut i32, b: &mut f32) { ... }
///
/// pub fn param_ref2_export() -> ::xcall_sdk::Export {
///     let signature = ::xcall_sdk::CallSignature::new("ParamRef2")
///         .param_ref(<i32 as ::xcall_sdk::Tagged>::type_tag())
///         .param_ref(<f32 as ::xcall_sdk::Tagged>::type_tag());
///     ::xcall_sdk::Export::new(signature, |__ctx, __args| {
///         // Arity check
///         // Argument decoding
///         // Call original function
///         // Write back by-reference slots
///         // Encode result
///     })
/// }
/// ```
pub fn expand_export(name: Option<LitStr>, func: ItemFn) -> Result<TokenStream> {
    let func_name = &func.sig.ident;
    let export_name = format_ident!("{}_export", func_name);
    let entry = name
        .map(|lit| lit.value())
        .unwrap_or_else(|| func_name.to_string());
    let vis = &func.vis;

    if func.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "boundary entry points are synchronous",
        ));
    }
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.generics,
            "generic functions have no fixed signature",
        ));
    }

    let mut signature_params = Vec::new();
    let mut decodes = Vec::new();
    let mut call_args = Vec::new();
    let mut writebacks = Vec::new();
    let mut position = 0usize;

    for (i, arg) in func.sig.inputs.iter().enumerate() {
        let pat_type = match arg {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => {
                return Err(syn::Error::new_spanned(
                    arg,
                    "Methods (self) are not supported in #[export]",
                ));
            }
        };
        let arg_name = match &*pat_type.pat {
            Pat::Ident(pat_ident) => pat_ident.ident.clone(),
            _ => {
                return Err(syn::Error::new_spanned(
                    arg,
                    "Only simple identifiers are supported as arguments",
                ));
            }
        };

        match classify_param(&pat_type.ty)? {
            ParamKind::Context => {
                if i != 0 {
                    return Err(syn::Error::new_spanned(
                        arg,
                        "the call context must be the first parameter",
                    ));
                }
                call_args.push(quote! { __ctx });
            }
            ParamKind::Value(ty) => {
                let tag = generate_tag(&ty);
                signature_params.push(quote! { .param(#tag) });
                decodes.push(generate_arg_decode(&arg_name, &ty, position, &entry, false));
                call_args.push(quote! { #arg_name });
                position += 1;
            }
            ParamKind::Borrowed(ty) => {
                let tag = generate_tag(&ty);
                signature_params.push(quote! { .param(#tag) });
                decodes.push(generate_arg_decode(&arg_name, &ty, position, &entry, false));
                call_args.push(quote! { &#arg_name });
                position += 1;
            }
            ParamKind::Reference(ty) => {
                let tag = generate_tag(&ty);
                signature_params.push(quote! { .param_ref(#tag) });
                decodes.push(generate_arg_decode(&arg_name, &ty, position, &entry, true));
                call_args.push(quote! { &mut #arg_name });
                writebacks.push(generate_writeback(&arg_name, position));
                position += 1;
            }
        }
    }

    let arity = position;
    let call = quote! { #func_name(#(#call_args),*) };

    let (return_spec, invoke, encode) = match classify_return(&func.sig.output) {
        ReturnKind::Unit => (
            quote! {},
            quote! { #call; },
            quote! { Ok(::xcall_sdk::MarshaledValue::Void) },
        ),
        ReturnKind::Fallible(None) => (
            quote! {},
            quote! { #call?; },
            quote! { Ok(::xcall_sdk::MarshaledValue::Void) },
        ),
        ReturnKind::Plain(ty) => {
            let tag = generate_tag(&ty);
            (
                quote! { .returns(#tag) },
                quote! { let __ret = #call; },
                quote! { ::xcall_sdk::ToBoundary::to_boundary(&__ret) },
            )
        }
        ReturnKind::Fallible(Some(ty)) => {
            let tag = generate_tag(&ty);
            (
                quote! { .returns(#tag) },
                quote! { let __ret: #ty = #call?; },
                quote! { ::xcall_sdk::ToBoundary::to_boundary(&__ret) },
            )
        }
    };

    let doc = format!(
        "Boundary entry point `{}`, backed by [`{}`].",
        entry, func_name
    );

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #export_name() -> ::xcall_sdk::Export {
            let signature = ::xcall_sdk::CallSignature::new(#entry)
                #(#signature_params)*
                #return_spec;
            ::xcall_sdk::Export::new(
                signature,
                |__ctx: &dyn ::xcall_sdk::CallContext,
                 __args: &mut [::xcall_sdk::MarshaledValue]|
                 -> ::xcall_sdk::BoundaryResult<::xcall_sdk::MarshaledValue> {
                    if __args.len() != #arity {
                        return Err(::xcall_sdk::BoundaryError::ArityMismatch {
                            name: #entry.to_string(),
                            expected: #arity,
                            got: __args.len(),
                        });
                    }
                    #(#decodes)*
                    #invoke
                    #(#writebacks)*
                    #encode
                },
            )
        }
    })
}
