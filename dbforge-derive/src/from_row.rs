//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// How a single field is bound to its column
enum Binding {
    /// Required column
    Column,
    /// Column read when present and not `NULL`, `Default` otherwise
    Optional,
    /// Never read
    Skip,
}

struct FieldConfig {
    ident: Ident,
    column_name: String,
    binding: Binding,
    ty: syn::Type,
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut column_name = ident.to_string();
    let mut binding = Binding::Column;

    for attr in &field.attrs {
        if attr.path().is_ident("dbforge") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    column_name = lit.value();
                } else if meta.path.is_ident("skip") {
                    binding = Binding::Skip;
                } else if meta.path.is_ident("default") {
                    binding = Binding::Optional;
                } else {
                    return Err(meta.error(format!(
                        "unknown dbforge attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    Ok(FieldConfig {
        ident,
        column_name,
        binding,
        ty: field.ty.clone(),
    })
}

pub fn derive_from_row_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?;

    let field_extractions: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.column_name;
            let ty = &config.ty;

            match config.binding {
                Binding::Skip => quote! {
                    #field_ident: <#ty as ::std::default::Default>::default()
                },
                Binding::Optional => quote! {
                    #field_ident: dbforge::RowExt::get_or_default::<#ty>(row, #column_name)?
                },
                Binding::Column => quote! {
                    #field_ident: dbforge::RowExt::get::<#ty>(row, #column_name)?
                },
            }
        })
        .collect();

    let column_names: Vec<&str> = field_configs
        .iter()
        .filter(|c| !matches!(c.binding, Binding::Skip))
        .map(|c| c.column_name.as_str())
        .collect();

    let expanded = quote! {
        impl #impl_generics dbforge::FromRow for #name #ty_generics #where_clause {
            fn from_row<R: dbforge::Row>(row: &R) -> dbforge::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }

            fn column_names() -> &'static [&'static str] {
                &[#(#column_names),*]
            }
        }
    };

    Ok(expanded)
}
