use std::collections::BTreeMap;

use crate::{Amount, ValidationCode, ValidationError};

/// A new cash-flow record as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordCandidate {
    pub status_id: i32,
    pub transaction_type_id: i32,
    pub category_id: i32,
    pub subcategory_id: i32,
    pub amount: Amount,
    pub comment: Option<String>,
}

/// Partial update of a cash-flow record. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub status_id: Option<i32>,
    pub transaction_type_id: Option<i32>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub amount: Option<Amount>,
    pub comment: Option<String>,
}

impl RecordCandidate {
    /// Build a candidate from flat form fields.
    ///
    /// Reference keys may be given bare (`status`) or with an `_id` suffix
    /// (`status_id`). Fields are checked in the order the record validation
    /// uses and the first failure is returned. Unknown keys are ignored.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use engine::{RecordCandidate, ValidationCode};
    ///
    /// let mut fields = BTreeMap::new();
    /// fields.insert("status".to_string(), "1".to_string());
    /// fields.insert("transaction_type_id".to_string(), "2".to_string());
    /// fields.insert("category".to_string(), "3".to_string());
    /// fields.insert("subcategory".to_string(), "4".to_string());
    /// fields.insert("amount".to_string(), "500,5".to_string());
    ///
    /// let candidate = RecordCandidate::from_fields(&fields).unwrap();
    /// assert_eq!(candidate.transaction_type_id, 2);
    /// assert_eq!(candidate.amount.to_string(), "500.50");
    ///
    /// fields.insert("amount".to_string(), "abc".to_string());
    /// let err = RecordCandidate::from_fields(&fields).unwrap_err();
    /// assert_eq!(err.code, ValidationCode::InvalidAmount);
    /// ```
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let amount = required(fields, "amount")?.parse::<Amount>()?;
        Ok(Self {
            status_id: reference(fields, "status")?,
            transaction_type_id: reference(fields, "transaction_type")?,
            category_id: reference(fields, "category")?,
            subcategory_id: reference(fields, "subcategory")?,
            amount,
            comment: fields.get("comment").cloned(),
        })
    }
}

fn required<'a>(fields: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str, ValidationError> {
    fields
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ValidationError::new(key, ValidationCode::InvalidField, "this field is required")
        })
}

fn reference(fields: &BTreeMap<String, String>, name: &str) -> Result<i32, ValidationError> {
    let field = format!("{name}_id");
    let value = fields
        .get(&field)
        .or_else(|| fields.get(name))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ValidationError::new(&field, ValidationCode::InvalidField, "this field is required")
        })?;
    value
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ValidationError::new(
                &field,
                ValidationCode::InvalidField,
                format!("'{value}' is not a valid id"),
            )
        })
}
