//! Parsing of `#[derive(Model)]` input.
//!
//! A model is described by its fields alone: there are no field or struct
//! attributes. Everything the generated code needs (column names, table name,
//! row identifier position) is computed here from the struct's shape.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, Result, Type, Visibility};

/// Parsed model definition.
pub struct ModelDef {
    pub name: Ident,
    pub vis: Visibility,
    pub table_name: String,
    pub fields: Vec<FieldDef>,
    /// Index of the field whose type is `RowId`, if any.
    pub row_id: Option<usize>,
}

/// Parsed field definition.
pub struct FieldDef {
    pub name: Ident,
    pub column_name: String,
    /// Name of the generated selector const (`COUNT` for `count`).
    pub selector: Ident,
    pub ty: Type,
    pub row_id: bool,
}

impl ModelDef {
    pub fn has_row_id(&self) -> bool {
        self.row_id.is_some()
    }
}

/// Parse a derive input into a model definition.
pub fn parse_model(input: &DeriveInput) -> Result<ModelDef> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Model can only be derived for structs",
        ));
    };

    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Model requires a struct with named fields",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let fields: Vec<FieldDef> = named
        .named
        .iter()
        .map(|field| {
            let name = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let plain = name.unraw().to_string();
            Ok(FieldDef {
                column_name: to_snake_case(&plain),
                selector: Ident::new(&to_snake_case(&plain).to_uppercase(), Span::call_site()),
                row_id: is_row_id_type(&field.ty),
                ty: field.ty.clone(),
                name,
            })
        })
        .collect::<Result<_>>()?;

    let row_id = fields.iter().position(|f| f.row_id);
    let table_name = derive_table_name(&input.ident.unraw().to_string(), row_id.is_some());

    Ok(ModelDef {
        name: input.ident.clone(),
        vis: input.vis.clone(),
        table_name,
        fields,
        row_id,
    })
}

/// snake_case of the type name, plus `s` when the type has a row identifier.
fn derive_table_name(struct_name: &str, has_row_id: bool) -> String {
    let mut name = to_snake_case(struct_name);
    if has_row_id {
        name.push('s');
    }
    name
}

/// Convert a name to snake_case.
///
/// An underscore goes before an uppercase letter only when the previous
/// character is lowercase, so acronyms and digits stay glued to their word
/// (`HTTPServer` -> `httpserver`, `Log2Entry` -> `log2entry`). Stored table
/// names depend on this rule.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_is_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_is_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        prev_is_lower = c.is_lowercase();
    }

    result
}

/// Is this type spelled `RowId` (optionally path-qualified)?
pub fn is_row_id_type(ty: &Type) -> bool {
    last_segment_is(ty, "RowId")
}

fn last_segment_is(ty: &Type, ident: &str) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == ident && segment.arguments.is_empty();
        }
    }
    false
}
