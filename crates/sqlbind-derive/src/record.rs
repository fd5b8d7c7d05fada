//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, MetaNameValue, Result, Token};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut idents = Vec::new();
    for field in fields {
        let ident = field.ident.as_ref().unwrap();
        let field_name = ident.to_string();
        let tags = field_tags(field)?;
        let keys = tags.iter().map(|(key, _)| key);
        let values = tags.iter().map(|(_, value)| value);

        descriptors.push(quote! {
            ::sqlbind::Field {
                name: #field_name,
                tags: &[#((#keys, #values)),*],
            }
        });
        idents.push(ident);
    }

    let indexes = (0..idents.len()).map(syn::Index::from).collect::<Vec<_>>();

    Ok(quote! {
        impl #impl_generics ::sqlbind::Record for #name #ty_generics #where_clause {
            const FIELDS: &'static [::sqlbind::Field] = &[#(#descriptors),*];

            fn scan_targets(&mut self) -> ::std::vec::Vec<&mut dyn ::sqlbind::Scan> {
                let Self { #(#idents),* } = self;
                ::std::vec![#(#idents),*]
            }

            fn arg(&self, index: usize) -> ::sqlbind::Arg {
                match index {
                    #(#indexes => ::sqlbind::IntoArg::into_arg(
                        ::core::clone::Clone::clone(&self.#idents),
                    ),)*
                    _ => ::core::unreachable!("field index {} out of range", index),
                }
            }
        }
    })
}

fn field_tags(field: &syn::Field) -> Result<Vec<(String, String)>> {
    let mut tags = Vec::new();
    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let pairs =
            attr.parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)?;
        for pair in pairs {
            let key = pair
                .path
                .get_ident()
                .ok_or_else(|| syn::Error::new_spanned(&pair.path, "expected `key = \"value\"`"))?
                .to_string();
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = &pair.value
            else {
                return Err(syn::Error::new_spanned(
                    &pair.value,
                    "tag value must be a string literal",
                ));
            };
            tags.push((key, lit.value()));
        }
    }
    Ok(tags)
}
