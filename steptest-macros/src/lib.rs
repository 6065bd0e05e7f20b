//! Procedural macros for the steptest framework
//!
//! This crate provides the `#[def_test]` attribute macro for declaring test
//! steps and the `test_suite!` macro that collects the generated descriptors
//! into an explicit registration table. There is no linker-section magic:
//! a suite is an ordinary static slice handed to `TestRegistry::register_suite`.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, ItemFn, Token, parse_macro_input};

/// Declares a function as a test step.
///
/// # Example
///
/// ```rust,ignore
/// use steptest::{def_test, TestContext};
///
/// #[def_test]
/// fn answers_are_checked(cx: &TestContext) {
///     cx.set_pass_or_fail(2 + 2 == 4);
/// }
/// ```
///
/// The function keeps its signature; alongside it a `TestDescriptor` static
/// is emitted, named after the function, for `test_suite!` to collect.
/// Registration order inside a suite equals declaration order in the
/// `test_suite!` invocation.
///
/// # Attributes
/// - `#[def_test]` - Once-test: stepped a single time, auto-passed if the
///   body decides nothing
/// - `#[def_test(looping)]` - Looping test: re-stepped every runner pass
///   until the body asserts (or the runner's pass limit expires it)
#[proc_macro_attribute]
pub fn def_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let attr_str = attr.to_string();
    let looping = attr_str.contains("looping");

    let fn_name = &input.sig.ident;
    let fn_name_str = fn_name.to_string();
    let descriptor_name = descriptor_ident(fn_name);

    let constructor = if looping {
        quote! { looping }
    } else {
        quote! { new }
    };

    let output = quote! {
        #input

        #[doc(hidden)]
        #[allow(non_upper_case_globals)]
        pub static #descriptor_name: steptest::TestDescriptor =
            steptest::TestDescriptor::#constructor(#fn_name_str, module_path!(), #fn_name);
    };

    output.into()
}

/// `SUITE_NAME; test_a, test_b, ...`
struct SuiteInput {
    suite: Ident,
    tests: Punctuated<Ident, Token![,]>,
}

impl Parse for SuiteInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let suite = input.parse()?;
        input.parse::<Token![;]>()?;
        let tests = Punctuated::parse_terminated(input)?;
        Ok(Self { suite, tests })
    }
}

/// Collects tests declared with `#[def_test]` into a named suite.
///
/// ```rust,ignore
/// test_suite!(SMOKE; answers_are_checked, follower);
/// steptest::registry().register_suite(SMOKE);
/// ```
///
/// Expands to `pub static SMOKE: &[&steptest::TestDescriptor]`, listing the
/// descriptors in declaration order.
#[proc_macro]
pub fn test_suite(input: TokenStream) -> TokenStream {
    let SuiteInput { suite, tests } = parse_macro_input!(input as SuiteInput);

    let descriptors = tests.iter().map(descriptor_ident);

    let output = quote! {
        pub static #suite: &[&steptest::TestDescriptor] = &[
            #(&#descriptors),*
        ];
    };

    output.into()
}

fn descriptor_ident(fn_name: &Ident) -> proc_macro2::Ident {
    format_ident!(
        "__STEPTEST_DESCRIPTOR_{}",
        fn_name.to_string().to_uppercase()
    )
}
