//! Derive macro implementation for named attribute access
//!
//! Generates an `Attributes` implementation exposing every named field,
//! customised per field through `#[attribute(...)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{
    Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, GenericParam, Ident, Lit, Meta,
    MetaNameValue, Result, Type, parse_macro_input, parse_quote,
};

/// Main entry point for the Attributes derive macro
pub fn derive_attributes_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_attributes_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A field exposed as an attribute
struct AttributeField {
    ident: Ident,
    key: String,
    ty: Type,
}

fn generate_attributes_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(parse_field)
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect::<Vec<_>>(),
            _ => {
                return Err(Error::new_spanned(
                    input,
                    "Attributes derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                input,
                "Attributes derive is only supported for structs",
            ));
        }
    };

    let mut generics = input.generics.clone();
    add_trait_bounds(&mut generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let keys: Vec<&String> = fields.iter().map(|f| &f.key).collect();
    let readers = fields.iter().map(|f| {
        let key = &f.key;
        let ident = &f.ident;
        quote! {
            #key => ::core::option::Option::Some(::vouch::IntoValue::into_value(
                ::core::clone::Clone::clone(&self.#ident),
            )),
        }
    });
    let writers = fields.iter().map(|f| {
        let key = &f.key;
        let ident = &f.ident;
        let ty = &f.ty;
        quote! {
            #key => {
                self.#ident = <#ty as ::vouch::FromValue>::from_value(name, value)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::vouch::Attributes for #name #ty_generics #where_clause {
            fn attribute_names(&self) -> &'static [&'static str] {
                &[#(#keys),*]
            }

            fn attribute(&self, name: &str) -> ::core::option::Option<::vouch::Value> {
                match name {
                    #(#readers)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_attribute(
                &mut self,
                name: &str,
                value: ::vouch::Value,
            ) -> ::core::result::Result<(), ::vouch::AttributeError> {
                match name {
                    #(#writers)*
                    _ => ::core::result::Result::Err(::vouch::AttributeError::Unknown {
                        attribute: ::std::string::ToString::to_string(name),
                    }),
                }
            }
        }
    })
}

/// Type parameters must convert to and from values
fn add_trait_bounds(generics: &mut syn::Generics) {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::vouch::IntoValue));
            type_param.bounds.push(parse_quote!(::vouch::FromValue));
            type_param.bounds.push(parse_quote!(Clone));
        }
    }
}

/// Parse a field and its `#[attribute(...)]` options, `None` when skipped
fn parse_field(field: &Field) -> Result<Option<AttributeField>> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "expected a named field"));
    };
    let mut key = ident.to_string().trim_start_matches("r#").to_string();

    for attr in &field.attrs {
        if !attr.path().is_ident("attribute") {
            continue;
        }
        let Meta::List(list) = &attr.meta else {
            return Err(Error::new_spanned(attr, "Attribute options must be a list"));
        };
        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(list.tokens.clone())? {
            match meta {
                Meta::Path(path) if path.is_ident("skip") => return Ok(None),
                Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("rename") => {
                    key = parse_rename(&value)?;
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "Unsupported attribute option, expected `skip` or `rename = \"...\"`",
                    ));
                }
            }
        }
    }

    Ok(Some(AttributeField {
        ident,
        key,
        ty: field.ty.clone(),
    }))
}

fn parse_rename(value: &Expr) -> Result<String> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        let renamed = lit_str.value();
        if renamed.is_empty() {
            return Err(Error::new_spanned(value, "rename must not be empty"));
        }
        Ok(renamed)
    } else {
        Err(Error::new_spanned(value, "rename expects a string literal"))
    }
}
