//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when the caller input breaks a business rule. It
//!   carries a [`ValidationError`] naming the offending field.
//! - [`KeyNotFound`] returned when an entity id does not exist.
//! - [`ConstraintConflict`] returned when the store rejected a write because a
//!   concurrent writer won a uniqueness race.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ConstraintConflict`]: EngineError::ConstraintConflict
use std::fmt;

use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine readable reason attached to a [`ValidationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    EmptyName,
    NameTooLong,
    DuplicateName,
    DuplicateNameInCategory,
    CategoryInactive,
    AmountNotPositive,
    InvalidAmount,
    ReferenceNotFound,
    ReferenceInactive,
    SubcategoryCategoryMismatch,
    InvalidPage,
    InvalidField,
}

impl ValidationCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::NameTooLong => "NAME_TOO_LONG",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::DuplicateNameInCategory => "DUPLICATE_NAME_IN_CATEGORY",
            Self::CategoryInactive => "CATEGORY_INACTIVE",
            Self::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::ReferenceNotFound => "REFERENCE_NOT_FOUND",
            Self::ReferenceInactive => "REFERENCE_INACTIVE",
            Self::SubcategoryCategoryMismatch => "SUBCATEGORY_CATEGORY_MISMATCH",
            Self::InvalidPage => "INVALID_PAGE",
            Self::InvalidField => "INVALID_FIELD",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected input, attributed to a single field.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(ValidationError),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Constraint conflict: {0}")]
    ConstraintConflict(ValidationError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Error family, as exposed to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::KeyNotFound(_) => "NOT_FOUND",
            Self::ConstraintConflict(_) => "CONSTRAINT_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// The field-scoped details, when the error carries any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) | Self::ConstraintConflict(err) => Some(err),
            Self::KeyNotFound(_) | Self::Database(_) => None,
        }
    }

    /// Shortcut for matching on the validation code in callers and tests.
    pub fn code(&self) -> Option<ValidationCode> {
        self.validation().map(|err| err.code)
    }
}

impl From<ValidationError> for EngineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ConstraintConflict(a), Self::ConstraintConflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
