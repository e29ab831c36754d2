//! Compile-time validation for the Model derive.
//!
//! All problems are collected and reported together, each pointing at the
//! offending field.

use std::collections::HashMap;

use syn::Error;

use crate::parse::ModelDef;

/// Validate a parsed model definition.
pub fn validate_model(model: &ModelDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_has_fields(model, &mut errors);
    validate_row_id(model, &mut errors);
    validate_no_duplicate_columns(model, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}

fn validate_has_fields(model: &ModelDef, errors: &mut Vec<Error>) {
    if model.fields.is_empty() {
        errors.push(Error::new(
            model.name.span(),
            "Model struct must have at least one field",
        ));
    }
}

/// At most one `RowId` field, and it must come first.
fn validate_row_id(model: &ModelDef, errors: &mut Vec<Error>) {
    let mut seen = false;
    for (index, field) in model.fields.iter().enumerate() {
        if !field.row_id {
            continue;
        }
        if seen {
            errors.push(Error::new(
                field.name.span(),
                "Model struct can have at most one `RowId` field",
            ));
        } else if index != 0 {
            errors.push(Error::new(
                field.name.span(),
                "the `RowId` field must be the first field of the struct",
            ));
        }
        seen = true;
    }
}

/// Two fields whose names snake_case to the same column.
fn validate_no_duplicate_columns(model: &ModelDef, errors: &mut Vec<Error>) {
    let mut seen: HashMap<&str, &syn::Ident> = HashMap::new();
    for field in &model.fields {
        if let Some(first) = seen.get(field.column_name.as_str()) {
            errors.push(Error::new(
                field.name.span(),
                format!(
                    "fields `{}` and `{}` both map to column `{}`",
                    first, field.name, field.column_name
                ),
            ));
        } else {
            seen.insert(&field.column_name, &field.name);
        }
    }
}

/// Would SQLite store this text as a number in an `ENUM` column?
///
/// `ENUM` has NUMERIC affinity, so text that reads as an integer or real
/// literal (surrounding whitespace allowed, hex not) is converted on insert
/// and no longer decodes as the variant's name.
pub fn is_numeric_text(s: &str) -> bool {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty())
        || !all_digits(whole)
        || !all_digits(fraction)
    {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_model;
    use syn::{DeriveInput, parse_quote};

    fn check(input: DeriveInput) -> Result<(), Error> {
        validate_model(&parse_model(&input)?)
    }

    #[test]
    fn test_valid_model() {
        assert!(
            check(parse_quote! {
                struct User { id: RowId, count: i64, duration: f64, credit: f64 }
            })
            .is_ok()
        );
        assert!(check(parse_quote! { struct Log { message: String } }).is_ok());
    }

    #[test]
    fn test_rejects_empty_struct() {
        let err = check(parse_quote! { struct Empty {} }).unwrap_err();
        assert!(err.to_string().contains("at least one field"));
    }

    #[test]
    fn test_rejects_late_row_id() {
        let err = check(parse_quote! { struct Late { name: String, id: RowId } }).unwrap_err();
        assert!(err.to_string().contains("must be the first field"));
    }

    #[test]
    fn test_rejects_second_row_id() {
        let err = check(parse_quote! { struct Twice { id: RowId, other: RowId } }).unwrap_err();
        assert!(err.to_string().contains("at most one"));
    }

    #[test]
    fn test_rejects_column_collision() {
        let err = check(parse_quote! { struct Clash { fooBar: i64, foo_bar: i64 } }).unwrap_err();
        assert!(err.to_string().contains("both map to column `foo_bar`"));
    }

    #[test]
    fn test_numeric_text() {
        for text in ["1", "-2", "+3", " 42 ", "1.5", ".5", "7.", "1e3", "2.5E-4"] {
            assert!(is_numeric_text(text), "{text:?} should be numeric");
        }
        for text in ["", ".", "-", "1st", "0x10", "e5", "1e", "1.2.3", "Info", "one"] {
            assert!(!is_numeric_text(text), "{text:?} should stay text");
        }
    }
}
