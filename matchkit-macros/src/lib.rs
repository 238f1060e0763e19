//! Procedural macros for matchkit
//!
//! This crate provides `#[derive(Inspect)]`, which builds a record
//! [`Value`](https://docs.rs/matchkit) from a struct's fields, tagging each
//! field with its declared visibility.
//!
//! # Example
//!
//! ```rust,ignore
//! use matchkit::Inspect;
//!
//! #[derive(Inspect)]
//! pub struct Account {
//!     pub name: String,
//!     pub(crate) id: u64,
//!     password: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote, Data, DeriveInput, Field, GenericParam, Ident, Index,
    Token, Visibility,
};

/// Per-field options given with `#[inspect(...)]`.
#[derive(Default)]
struct FieldConfig {
    /// Leave the field out of the record entirely
    skip: bool,
    /// Render the field through its `Debug` impl
    debug: bool,
}

impl Parse for FieldConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = FieldConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "skip" => config.skip = true,
                "debug" => config.debug = true,
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown inspect option: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        if config.skip && config.debug {
            return Err(input.error("`skip` and `debug` cannot be combined"));
        }

        Ok(config)
    }
}

impl FieldConfig {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let mut config = FieldConfig::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("inspect")) {
            let parsed: FieldConfig = attr.parse_args()?;
            config.skip |= parsed.skip;
            config.debug |= parsed.debug;
        }
        Ok(config)
    }
}

/// Maps a field's declared visibility onto `matchkit::format::Visibility`.
fn visibility_tokens(vis: &Visibility) -> TokenStream2 {
    match vis {
        Visibility::Public(_) => quote! { ::matchkit::format::Visibility::Public },
        Visibility::Restricted(_) => quote! { ::matchkit::format::Visibility::Restricted },
        Visibility::Inherited => quote! { ::matchkit::format::Visibility::Private },
    }
}

/// Derive `matchkit::format::Inspect` for a struct.
///
/// Every field becomes a record field named after the Rust field (positional
/// index for tuple structs), in declaration order. Only `pub` fields appear
/// in failure messages; `pub(...)` and private fields are kept in the value
/// and compared by equality but not rendered.
///
/// Each field type must implement `Inspect`, and so must every type
/// parameter. Two field options relax that:
///
/// - `#[inspect(skip)]` - leave the field out
/// - `#[inspect(debug)]` - render the field through its `Debug` impl
///
/// ```rust,ignore
/// use std::time::Instant;
/// use matchkit::Inspect;
///
/// #[derive(Inspect)]
/// pub struct Job<T> {
///     pub payload: T,
///     #[inspect(debug)]
///     pub started: Instant,
///     #[inspect(skip)]
///     handle: std::thread::JoinHandle<()>,
/// }
/// ```
///
/// Enums and unions are rejected.
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    expand_inspect(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_inspect(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Inspect can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Inspect can only be derived for structs",
            ));
        }
    };

    let mut calls = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let config = FieldConfig::from_field(field)?;
        if config.skip {
            continue;
        }

        let (name, access) = match &field.ident {
            Some(ident) => (ident.to_string(), ident.to_token_stream()),
            None => (index.to_string(), Index::from(index).to_token_stream()),
        };
        let visibility = visibility_tokens(&field.vis);
        let value = if config.debug {
            quote! { &::matchkit::format::Debugged(&self.#access) }
        } else {
            quote! { &self.#access }
        };

        calls.push(quote! {
            .field(#name, #visibility, #value)
        });
    }

    // Every type parameter must itself be inspectable.
    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::matchkit::format::Inspect));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::matchkit::format::Inspect for #name #ty_generics #where_clause {
            fn inspect(&self) -> ::matchkit::format::Value {
                ::matchkit::format::Value::record::<Self>()
                    #(#calls)*
                    .finish()
            }
        }
    })
}
