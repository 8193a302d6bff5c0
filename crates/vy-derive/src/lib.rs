use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, punctuated::Punctuated, token::Comma, DeriveInput, LitStr, Meta};

/// Derive the type name an object is registered under.
/// Adds ObjectRequirements bound to all generic parameters.
///
/// `#[object_type(name = "...")]` replaces the default `module::path::TypeName` base name,
/// concrete generic parameters are always appended, eg. `vineyard::Scalar<i32>`.
#[proc_macro_derive(ObjectMarker, attributes(object_type))]
pub fn object_marker_derive(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    for param in &mut input.generics.params {
        if let syn::GenericParam::Type(type_param) = param {
            type_param
                .bounds
                .push(syn::parse_quote!(vy_core::ObjectRequirements));
        }
    }
    match derive_object_marker(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the implementation of ObjectMarker
fn derive_object_marker(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let base = match type_name_override(&input.attrs)? {
        Some(type_name) => quote! { #type_name },
        None => quote! { concat!(module_path!(), "::", stringify!(#name)) },
    };
    let params: Vec<&syn::Ident> = input
        .generics
        .type_params()
        .map(|param| &param.ident)
        .collect();
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics vy_core::ObjectMarker for #name #type_generics #where_clause {
            fn _type_name() -> ::std::string::String {
                vy_core::type_with_generics(#base, &[#(vy_core::generic_param_name::<#params>()),*])
            }
        }
    }
    .into())
}

/// Reads `#[object_type(name = "...")]`, the last one wins if repeated
fn type_name_override(attrs: &[syn::Attribute]) -> syn::Result<Option<LitStr>> {
    let mut type_name = None;
    for attr in attrs
        .iter()
        .filter(|attr| attr.path().is_ident("object_type"))
    {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("object type name must not be empty"));
                }
                type_name = Some(value);
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(type_name)
}

/// Attribute macro to mark a struct as an object, automatically deriving `ObjectMarker` and its required traits.
///
/// Derives already present on the item are not repeated.
#[proc_macro_attribute]
pub fn object(_: TokenStream, item: TokenStream) -> TokenStream {
    let mut item = parse_macro_input!(item as DeriveInput);

    let mut required_traits: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Default),
        syn::parse_quote!(vy_derive::ObjectMarker),
    ];

    // find any existing #[derive(...)] attributes and remove any duplicates from required_traits
    item.attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Meta, Comma>::parse_terminated)
                .ok()
        })
        .flatten()
        .for_each(|meta| {
            if let Meta::Path(path) = meta {
                required_traits.retain(|t| !same_trait(t, &path));
            }
        });

    // Insert the missing traits first so the `object_type` helper attribute follows its derive
    if !required_traits.is_empty() {
        item.attrs
            .insert(0, syn::parse_quote!(#[derive(#(#required_traits),*)]));
    }

    quote! {
        #item
    }
    .into()
}

/// Compares derive paths by their last segment so `ObjectMarker` matches `vy_derive::ObjectMarker`
fn same_trait(a: &syn::Path, b: &syn::Path) -> bool {
    match (a.segments.last(), b.segments.last()) {
        (Some(a), Some(b)) => a.ident == b.ident,
        _ => false,
    }
}
