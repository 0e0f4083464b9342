//! Internal helpers for name validation and store error translation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation logic so every catalog enforces the same naming rules.

use sea_orm::{DbErr, SqlErr, sea_query::LikeExpr};
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ValidationCode, ValidationError};

/// Maximum length of a catalog or subcategory name, in characters.
pub(crate) const MAX_NAME_CHARS: usize = 100;

/// A validated name: the form shown to users and the key used for uniqueness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NormalizedName {
    pub(crate) display: String,
    pub(crate) key: String,
}

/// Trim the input and collapse whitespace runs into a single space.
pub(crate) fn normalize_display(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uniqueness key: NFKC-normalized, lowercased display form.
pub(crate) fn normalize_key(display: &str) -> String {
    display.nfkc().collect::<String>().to_lowercase()
}

/// Validate a required name field.
pub(crate) fn normalize_required_name(
    value: &str,
    field: &str,
) -> Result<NormalizedName, ValidationError> {
    let display = normalize_display(value);
    if display.is_empty() {
        return Err(ValidationError::new(
            field,
            ValidationCode::EmptyName,
            "name must not be empty",
        ));
    }
    if display.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new(
            field,
            ValidationCode::NameTooLong,
            format!("name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    let key = normalize_key(&display);
    Ok(NormalizedName { display, key })
}

/// `LIKE` pattern matching `term` as a literal substring.
///
/// `%`, `_` and the escape character itself lose their wildcard meaning.
pub(crate) fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

/// Translate a unique-index violation raised by the store into a conflict.
///
/// Any other database error is passed through untouched.
pub(crate) fn translate_unique_violation(err: DbErr, conflict: ValidationError) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(field = %conflict.field, "unique constraint violation: {detail}");
            EngineError::ConstraintConflict(conflict)
        }
        _ => EngineError::Database(err),
    }
}
