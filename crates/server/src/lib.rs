use api_types::{error::ErrorBody, page::PageView};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, Page, ValidationError};

pub use server::{ServerState, app, run_with_listener};

mod catalogs;
mod records;
mod server;
mod subcategories;

pub mod types {
    pub mod catalog {
        pub use api_types::catalog::{CatalogEntryView, CatalogListQuery, CatalogPatch, CatalogWrite};
    }

    pub mod subcategory {
        pub use api_types::subcategory::{
            ByCategoryQuery, SubcategoryItem, SubcategoryListQuery, SubcategoryPatch,
            SubcategoryView, SubcategoryWrite,
        };
    }

    pub mod record {
        pub use api_types::record::{
            AmountValue, RecordListQuery, RecordPatch, RecordView, RecordWrite,
        };
    }

    pub use api_types::{error::ErrorBody, page::PageView};
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ConstraintConflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    let kind = err.kind().to_string();
    match err {
        EngineError::Validation(details) | EngineError::ConstraintConflict(details) => ErrorBody {
            error: details.message,
            kind,
            code: Some(details.code.to_string()),
            field: Some(details.field),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorBody {
                error: "internal server error".to_string(),
                kind,
                code: None,
                field: None,
            }
        }
        other @ EngineError::KeyNotFound(_) => ErrorBody {
            error: other.to_string(),
            kind,
            code: None,
            field: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    kind: "BAD_REQUEST".to_string(),
                    code: None,
                    field: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ValidationError> for ServerError {
    fn from(value: ValidationError) -> Self {
        Self::Engine(EngineError::Validation(value))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

/// Wrap an engine page into the listing body.
fn page_view<T, U>(page: Page<T>, map: impl FnMut(T) -> U) -> PageView<U> {
    let num_pages = page.num_pages();
    let next = page.has_next().then_some(page.page + 1);
    let previous = page.has_previous().then(|| page.page - 1);
    let (count, number, page_size) = (page.total_count, page.page, page.page_size);
    PageView {
        count,
        page: number,
        page_size,
        num_pages,
        next,
        previous,
        results: page.items.into_iter().map(map).collect(),
    }
}
