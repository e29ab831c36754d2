//! Procedural macros for rowmap.
//!
//! `#[derive(Model)]` turns a plain struct into a reflected record type: it
//! reads the field list in declaration order and emits the `Model` impl, the
//! static column metadata, and one typed selector const per field. There are
//! no attributes; the struct's shape is the schema.
//!
//! `#[derive(SqlEnum)]` lets a fieldless enum be stored as its variant name.
//!
//! Generated code refers to `::rowmap_core`, so crates using the derives
//! depend on `rowmap-core` alongside `rowmap`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::LitStr;
use syn::ext::IdentExt;

mod parse;
mod validate;

use parse::{ModelDef, parse_model};

/// Derive macro for the `Model` trait.
///
/// This macro generates:
/// - `TABLE_NAME`: snake_case of the struct name, plus `s` if it has a `RowId`
/// - static `FieldInfo` metadata, one entry per field in declaration order
/// - `to_values` / `from_row` in the same order
/// - `row_id` / `set_row_id`
/// - an associated `Column` const per field (`User::COUNT` for `count`)
///
/// A `RowId` field is optional; if present it must be the first field.
///
/// # Example
///
/// ```ignore
/// use rowmap::{Model, RowId};
///
/// #[derive(Model)]
/// struct User {
///     id: RowId,
///     count: i64,
///     duration: f64,
///     credit: f64,
/// }
///
/// assert_eq!(User::TABLE_NAME, "users");
/// let by_count = rowmap::Where::new().eq(User::COUNT, 10);
/// ```
#[proc_macro_derive(Model)]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let model = match parse_model(&input) {
        Ok(m) => m,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_model(&model) {
        return e.to_compile_error().into();
    }

    generate_model_impl(&model).into()
}

fn generate_model_impl(model: &ModelDef) -> proc_macro2::TokenStream {
    let name = &model.name;
    let table_name = &model.table_name;
    let has_row_id = model.has_row_id();

    let field_infos = generate_field_infos(model);
    let to_values = generate_to_values(model);
    let from_row = generate_from_row(model);
    let (row_id, set_row_id) = generate_row_id_access(model);
    let selectors = generate_selectors(model);
    let type_checks = generate_type_checks(model);

    quote! {
        impl ::rowmap_core::Model for #name {
            const TABLE_NAME: &'static str = #table_name;
            const HAS_ROW_ID: bool = #has_row_id;

            fn fields() -> &'static [::rowmap_core::FieldInfo] {
                static FIELDS: &[::rowmap_core::FieldInfo] = &[#(#field_infos),*];
                FIELDS
            }

            fn to_values(&self) -> ::std::vec::Vec<::rowmap_core::Value> {
                #to_values
            }

            fn from_row(row: &::rowmap_core::Row) -> ::rowmap_core::Result<Self> {
                #from_row
            }

            fn row_id(&self) -> ::core::option::Option<::rowmap_core::RowId> {
                #row_id
            }

            fn set_row_id(&mut self, id: ::rowmap_core::RowId) {
                #set_row_id
            }
        }

        #selectors

        #type_checks
    }
}

fn generate_field_infos(model: &ModelDef) -> Vec<proc_macro2::TokenStream> {
    model
        .fields
        .iter()
        .map(|field| {
            let field_name = field.name.unraw().to_string();
            let column_name = &field.column_name;
            let ty = &field.ty;
            let primary_key = field.row_id;
            quote! {
                ::rowmap_core::FieldInfo::new(
                    #field_name,
                    #column_name,
                    <#ty as ::rowmap_core::TypeInfo>::SQL_TYPE,
                )
                .nullable(<#ty as ::rowmap_core::TypeInfo>::NULLABLE)
                .primary_key(#primary_key)
            }
        })
        .collect()
}

fn generate_to_values(model: &ModelDef) -> proc_macro2::TokenStream {
    let conversions = model.fields.iter().map(|field| {
        let ident = &field.name;
        quote! {
            ::rowmap_core::Value::from(::core::clone::Clone::clone(&self.#ident))
        }
    });
    quote! {
        ::std::vec![#(#conversions),*]
    }
}

fn generate_from_row(model: &ModelDef) -> proc_macro2::TokenStream {
    let assignments = model.fields.iter().enumerate().map(|(index, field)| {
        let ident = &field.name;
        let ty = &field.ty;
        quote! {
            #ident: row.get_as::<#ty>(#index)?
        }
    });
    quote! {
        ::core::result::Result::Ok(Self {
            #(#assignments),*
        })
    }
}

fn generate_row_id_access(model: &ModelDef) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
    match model.row_id.map(|i| &model.fields[i].name) {
        Some(ident) => (
            quote! { ::core::option::Option::Some(self.#ident) },
            quote! { self.#ident = id; },
        ),
        None => (
            quote! { ::core::option::Option::None },
            quote! { let _ = id; },
        ),
    }
}

/// One `Column<Self, FieldType>` const per field.
fn generate_selectors(model: &ModelDef) -> proc_macro2::TokenStream {
    let name = &model.name;
    let vis = &model.vis;
    let consts = model.fields.iter().enumerate().map(|(index, field)| {
        let selector = &field.selector;
        let column_name = &field.column_name;
        let ty = &field.ty;
        let doc = format!("Selector for the `{}` column.", column_name);
        quote! {
            #[doc = #doc]
            #vis const #selector: ::rowmap_core::Column<#name, #ty> =
                ::rowmap_core::Column::new(#index, #column_name);
        }
    });
    quote! {
        impl #name {
            #(#consts)*
        }
    }
}

/// Identity detection is syntactic, so confirm it against `TypeInfo::ROW_ID`:
/// a detected `RowId` must be the real one, and no other field may be one
/// under another name.
fn generate_type_checks(model: &ModelDef) -> proc_macro2::TokenStream {
    let checks = model.fields.iter().map(|field| {
        let ty = &field.ty;
        if field.row_id {
            let msg = LitStr::new(
                &format!(
                    "field `{}` is spelled `RowId` but is not `rowmap_core::RowId`",
                    field.name
                ),
                Span::call_site(),
            );
            quote! { ::core::assert!(<#ty as ::rowmap_core::TypeInfo>::ROW_ID, #msg); }
        } else {
            let msg = LitStr::new(
                &format!(
                    "field `{}` holds a row identifier; declare it as a plain `RowId` first field",
                    field.name
                ),
                Span::call_site(),
            );
            quote! { ::core::assert!(!<#ty as ::rowmap_core::TypeInfo>::ROW_ID, #msg); }
        }
    });
    quote! {
        const _: () = {
            #(#checks)*
        };
    }
}

/// Derive `SqlEnum` for a fieldless enum.
///
/// Each variant is stored as its name, verbatim. Use
/// `#[rowmap(rename = "...")]` on a variant to store a different string.
/// Stored names that read as numbers (`"1"`, `"2.5"`) are rejected, since
/// SQLite would store them as numbers.
///
/// # Example
///
/// ```ignore
/// #[derive(SqlEnum, Debug, Clone, Copy, PartialEq)]
/// enum Level {
///     Debug,
///     Info,
///     #[rowmap(rename = "WARN")]
///     Warning,
/// }
/// ```
#[proc_macro_derive(SqlEnum, attributes(rowmap))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match generate_sql_enum_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn generate_sql_enum_impl(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let syn::Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "SqlEnum can only be derived for enums",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "SqlEnum cannot be derived for generic enums",
        ));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "SqlEnum requires at least one variant",
        ));
    }

    let mut variant_names = Vec::new();
    let mut variant_strings: Vec<String> = Vec::new();

    for variant in &data.variants {
        if !variant.fields.is_empty() {
            return Err(syn::Error::new_spanned(
                variant,
                "SqlEnum variants must be unit variants (no fields)",
            ));
        }

        let ident = &variant.ident;

        let mut custom_name = None;
        for attr in &variant.attrs {
            if attr.path().is_ident("rowmap") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        let s: LitStr = meta.value()?.parse()?;
                        custom_name = Some(s.value());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported rowmap attribute; expected `rename`"))
                    }
                })?;
            }
        }

        let sql_str = custom_name.unwrap_or_else(|| ident.unraw().to_string());
        if validate::is_numeric_text(&sql_str) {
            return Err(syn::Error::new_spanned(
                variant,
                format!(
                    "stored name '{}' reads as a number and would not round-trip through an ENUM column",
                    sql_str
                ),
            ));
        }
        if variant_strings.contains(&sql_str) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("stored name '{}' is used by more than one variant", sql_str),
            ));
        }
        variant_names.push(ident.clone());
        variant_strings.push(sql_str);
    }

    let type_name = name.unraw().to_string();

    let to_sql_arms = variant_names
        .iter()
        .zip(&variant_strings)
        .map(|(ident, s)| quote! { #name::#ident => #s });

    let from_sql_arms = variant_names
        .iter()
        .zip(&variant_strings)
        .map(|(ident, s)| quote! { #s => ::core::result::Result::Ok(#name::#ident) });

    let valid_values = variant_strings
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ");
    let error_msg = format!("unknown {} variant, expected one of {}", name, valid_values);

    Ok(quote! {
        impl ::rowmap_core::SqlEnum for #name {
            const VARIANTS: &'static [&'static str] = &[#(#variant_strings),*];
            const TYPE_NAME: &'static str = #type_name;

            fn to_sql_str(&self) -> &'static str {
                match self {
                    #(#to_sql_arms,)*
                }
            }

            fn from_sql_str(s: &str) -> ::core::result::Result<Self, ::std::string::String> {
                match s {
                    #(#from_sql_arms,)*
                    _ => ::core::result::Result::Err(::std::format!("{}, got '{}'", #error_msg, s)),
                }
            }
        }

        impl ::rowmap_core::TypeInfo for #name {
            const SQL_TYPE: ::rowmap_core::SqlType = ::rowmap_core::SqlType::Enum;
        }

        impl ::core::convert::From<#name> for ::rowmap_core::Value {
            fn from(v: #name) -> Self {
                ::rowmap_core::Value::Text(
                    ::std::string::ToString::to_string(::rowmap_core::SqlEnum::to_sql_str(&v))
                )
            }
        }

        impl ::core::convert::From<&#name> for ::rowmap_core::Value {
            fn from(v: &#name) -> Self {
                ::rowmap_core::Value::Text(
                    ::std::string::ToString::to_string(::rowmap_core::SqlEnum::to_sql_str(v))
                )
            }
        }

        impl ::core::convert::TryFrom<::rowmap_core::Value> for #name {
            type Error = ::rowmap_core::Error;

            fn try_from(value: ::rowmap_core::Value) -> ::core::result::Result<Self, <Self as ::core::convert::TryFrom<::rowmap_core::Value>>::Error> {
                match value {
                    ::rowmap_core::Value::Text(ref s) => {
                        ::rowmap_core::SqlEnum::from_sql_str(s.as_str()).map_err(|e| {
                            ::rowmap_core::Error::Type(::rowmap_core::error::TypeError {
                                expected: <#name as ::rowmap_core::SqlEnum>::TYPE_NAME,
                                actual: e,
                                column: ::core::option::Option::None,
                            })
                        })
                    }
                    ::rowmap_core::Value::Null => ::core::result::Result::Err(
                        ::rowmap_core::Error::null_into_required(
                            <#name as ::rowmap_core::SqlEnum>::TYPE_NAME,
                        ),
                    ),
                    other => ::core::result::Result::Err(::rowmap_core::Error::Type(
                        ::rowmap_core::error::TypeError {
                            expected: <#name as ::rowmap_core::SqlEnum>::TYPE_NAME,
                            actual: ::std::string::ToString::to_string(other.type_name()),
                            column: ::core::option::Option::None,
                        },
                    )),
                }
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(::rowmap_core::SqlEnum::to_sql_str(self))
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::core::result::Result<Self, <Self as ::core::str::FromStr>::Err> {
                ::rowmap_core::SqlEnum::from_sql_str(s)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_sql_enum_stored_names() {
        let input: syn::DeriveInput = parse_quote! {
            enum Level {
                Info,
                #[rowmap(rename = "WARN")]
                Warning,
            }
        };
        let tokens = generate_sql_enum_impl(&input).unwrap().to_string();
        assert!(tokens.contains("\"Info\""));
        assert!(tokens.contains("\"WARN\""));
        assert!(!tokens.contains("\"Warning\""));
    }

    #[test]
    fn test_sql_enum_rejects_numeric_rename() {
        let input: syn::DeriveInput = parse_quote! {
            enum Tier {
                #[rowmap(rename = "1")]
                One,
                #[rowmap(rename = "2")]
                Two,
            }
        };
        let err = generate_sql_enum_impl(&input).unwrap_err();
        assert!(err.to_string().contains("reads as a number"));
    }

    #[test]
    fn test_sql_enum_rejects_duplicate_names() {
        let input: syn::DeriveInput = parse_quote! {
            enum Shade {
                Dark,
                #[rowmap(rename = "Dark")]
                Darker,
            }
        };
        let err = generate_sql_enum_impl(&input).unwrap_err();
        assert!(err.to_string().contains("more than one variant"));
    }

    #[test]
    fn test_sql_enum_rejects_data_variants() {
        let input: syn::DeriveInput = parse_quote! {
            enum Shape {
                Circle(f64),
            }
        };
        assert!(generate_sql_enum_impl(&input).is_err());
    }
}
