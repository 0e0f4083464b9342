use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod catalog {
    use super::*;

    /// A status, transaction type or category as returned by the API.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CatalogEntryView {
        pub id: i32,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub is_active: bool,
    }

    /// Body of `POST` and `PUT` on a catalog.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogWrite {
        pub name: String,
        pub is_active: Option<bool>,
    }

    /// Body of `PATCH` on a catalog entry.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CatalogPatch {
        pub name: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CatalogListQuery {
        pub is_active: Option<bool>,
        pub search: Option<String>,
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }
}

pub mod subcategory {
    use super::*;
    use crate::catalog::CatalogEntryView;

    /// A subcategory without its parent expanded.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SubcategoryItem {
        pub id: i32,
        pub category_id: i32,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub is_active: bool,
    }

    /// A subcategory with its category expanded.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SubcategoryView {
        pub id: i32,
        pub category: CatalogEntryView,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub is_active: bool,
    }

    /// Body of `POST` and `PUT` on subcategories.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubcategoryWrite {
        pub category_id: i32,
        pub name: String,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubcategoryPatch {
        pub category_id: Option<i32>,
        pub name: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubcategoryListQuery {
        #[serde(alias = "category_id")]
        pub category: Option<i32>,
        pub is_active: Option<bool>,
        pub search: Option<String>,
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ByCategoryQuery {
        pub category_id: i32,
    }
}

pub mod record {
    use super::*;
    use crate::{catalog::CatalogEntryView, subcategory::SubcategoryItem};

    /// An amount as sent by clients: either a decimal string (`"500.00"`) or
    /// a JSON number.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountValue {
        Text(String),
        Number(f64),
    }

    impl AmountValue {
        /// Decimal text handed to the amount parser.
        pub fn to_text(&self) -> String {
            match self {
                Self::Text(text) => text.clone(),
                Self::Number(number) => number.to_string(),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RecordView {
        pub id: i32,
        pub status: CatalogEntryView,
        pub transaction_type: CatalogEntryView,
        pub category: CatalogEntryView,
        pub subcategory: SubcategoryItem,
        /// Decimal string with two fraction digits.
        pub amount: String,
        pub comment: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub is_active: bool,
    }

    /// Body of `POST` and `PUT` on cash-flow records.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordWrite {
        pub status_id: i32,
        pub transaction_type_id: i32,
        pub category_id: i32,
        pub subcategory_id: i32,
        pub amount: AmountValue,
        #[serde(default)]
        pub comment: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordPatch {
        pub status_id: Option<i32>,
        pub transaction_type_id: Option<i32>,
        pub category_id: Option<i32>,
        pub subcategory_id: Option<i32>,
        pub amount: Option<AmountValue>,
        pub comment: Option<String>,
    }

    /// Query string of the record listing.
    ///
    /// `date_from`/`date_to` are inclusive UTC dates (`YYYY-MM-DD`).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordListQuery {
        pub status: Option<i32>,
        pub transaction_type: Option<i32>,
        pub category: Option<i32>,
        pub subcategory: Option<i32>,
        #[serde(alias = "created_at_after")]
        pub date_from: Option<NaiveDate>,
        #[serde(alias = "created_at_before")]
        pub date_to: Option<NaiveDate>,
        pub search: Option<String>,
        /// One of `-created_at` (default), `created_at`, `-amount`, `amount`.
        pub ordering: Option<String>,
        pub include_inactive: Option<bool>,
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }
}

pub mod page {
    use super::*;

    /// One page of a listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PageView<T> {
        /// Total number of matching items across all pages.
        pub count: u64,
        pub page: u64,
        pub page_size: u64,
        pub num_pages: u64,
        /// Number of the next page, if any.
        pub next: Option<u64>,
        /// Number of the previous page, if any.
        pub previous: Option<u64>,
        pub results: Vec<T>,
    }
}

pub mod error {
    use super::*;

    /// Body of every error response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        /// `VALIDATION_ERROR`, `NOT_FOUND`, `CONSTRAINT_CONFLICT`,
        /// `DATABASE_ERROR` or `BAD_REQUEST`.
        pub kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub field: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::record::{AmountValue, RecordWrite};

    #[test]
    fn amount_accepts_string_or_number() {
        let body: RecordWrite = serde_json::from_str(
            r#"{"status_id":1,"transaction_type_id":2,"category_id":3,"subcategory_id":4,"amount":"500.00"}"#,
        )
        .unwrap();
        assert_eq!(body.amount, AmountValue::Text("500.00".to_string()));
        assert_eq!(body.comment, None);

        let body: RecordWrite = serde_json::from_str(
            r#"{"status_id":1,"transaction_type_id":2,"category_id":3,"subcategory_id":4,"amount":12.5,"comment":"x"}"#,
        )
        .unwrap();
        assert_eq!(body.amount.to_text(), "12.5");
    }

    #[test]
    fn error_body_omits_missing_details() {
        let body = super::error::ErrorBody {
            error: "cash-flow record 7".to_string(),
            kind: "NOT_FOUND".to_string(),
            code: None,
            field: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"cash-flow record 7","kind":"NOT_FOUND"}"#);
    }
}
