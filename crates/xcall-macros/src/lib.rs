// xcall-macros: declare boundary entry points as ordinary Rust functions
//
// Provides one attribute:
// - #[export] / #[export("StableName")] - generates `<fn>_export()` returning
//   an `xcall_sdk::Export` with the call signature and a marshaling adapter
//
// Example:
// ```
// use xcall_sdk::export;
//
// #[export("ParamRef1")]
// fn param_ref1(a: &mut i32) {
//     *a = 42;
// }
//
// table.register(param_ref1_export())?;
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn, LitStr};

mod export;
mod params;

/// Marks a Rust function as a boundary entry point.
///
/// Generates `<fn>_export() -> xcall_sdk::Export` that:
/// - Declares the signature, with tags taken from the parameter types
/// - Checks arity and decodes each argument (FromBoundary)
/// - Passes `&mut T` parameters by reference and writes them back
/// - Encodes the return value (ToBoundary)
///
/// Parameter mapping:
/// - `T`, `&T`, `&str`, `&[T]` - by value
/// - `&mut T` - by reference
/// - a leading `&dyn CallContext` - the call context, not a boundary parameter
///
/// A `Result` return propagates the error as a call fault.
///
/// # Example
///
/// ```ignore
/// #[export("ReverseCall")]
/// fn reverse_call(ctx: &dyn CallContext, test: &str) -> BoundaryResult<()> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn export(attr: TokenStream, item: TokenStream) -> TokenStream {
    let name = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let input = parse_macro_input!(item as ItemFn);
    export::expand_export(name, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
