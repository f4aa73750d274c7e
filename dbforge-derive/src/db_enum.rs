//! DbEnum derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Variant};

fn variant_label(variant: &Variant) -> Result<String> {
    let mut label = variant.ident.to_string();
    for attr in &variant.attrs {
        if attr.path().is_ident("dbforge") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    label = lit.value();
                    Ok(())
                } else {
                    Err(meta.error("only `rename` is supported on enum variants"))
                }
            })?;
        }
    }
    Ok(label)
}

pub fn derive_db_enum_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "DbEnum does not support generic enums",
        ));
    }

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => return Err(Error::new(input.span(), "DbEnum only supports enums")),
    };

    let mut idents = Vec::with_capacity(variants.len());
    let mut labels = Vec::with_capacity(variants.len());
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "DbEnum variants must not carry fields",
            ));
        }
        idents.push(&variant.ident);
        labels.push(variant_label(variant)?);
    }

    let expanded = quote! {
        impl dbforge::FromValue for #name {
            fn from_value(value: dbforge::Value) -> dbforge::Result<Self> {
                if let dbforge::Value::String(ref s) = value {
                    #(
                        if s.eq_ignore_ascii_case(#labels) {
                            return Ok(#name::#idents);
                        }
                    )*
                    return Err(dbforge::Error::TypeConversion {
                        expected: #type_name,
                        actual: format!("unknown variant name `{}`", s),
                    });
                }

                let n = <i64 as dbforge::FromValue>::from_value(value)?;
                #(
                    if n == #name::#idents as i64 {
                        return Ok(#name::#idents);
                    }
                )*
                Err(dbforge::Error::TypeConversion {
                    expected: #type_name,
                    actual: format!("unknown discriminant {}", n),
                })
            }
        }

        impl dbforge::ToValue for #name {
            fn to_value(&self) -> dbforge::Value {
                let n = match self {
                    #( #name::#idents => #name::#idents as i64, )*
                };
                dbforge::Value::I64(n)
            }
        }
    };

    Ok(expanded)
}
