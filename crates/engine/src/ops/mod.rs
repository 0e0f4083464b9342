use sea_orm::DatabaseConnection;

use crate::{PageRequest, ResultEngine, ValidationCode, ValidationError};

mod catalogs;
mod records;
mod subcategories;

pub use catalogs::CatalogPatch;
pub use records::{RecordCandidate, RecordFilter, RecordOrdering, RecordPatch};
pub use subcategories::{SubcategoryListFilter, SubcategoryPatch};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Listing limits applied to every paginated query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    config: EngineConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Resolve optional paging parameters into a validated [`PageRequest`].
    ///
    /// Pages are 1-based; `page_size` falls back to the configured default.
    pub fn page_request(
        &self,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> ResultEngine<PageRequest> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::new(
                "page",
                ValidationCode::InvalidPage,
                "page numbers start at 1",
            )
            .into());
        }
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        if page_size == 0 || page_size > self.config.max_page_size {
            return Err(ValidationError::new(
                "page_size",
                ValidationCode::InvalidPage,
                format!(
                    "page_size must be between 1 and {}",
                    self.config.max_page_size
                ),
            )
            .into());
        }
        Ok(PageRequest { page, page_size })
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default listing limits
    pub fn config(mut self, config: EngineConfig) -> EngineBuilder {
        self.config = config;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.config.default_page_size == 0
            || self.config.default_page_size > self.config.max_page_size
        {
            return Err(ValidationError::new(
                "default_page_size",
                ValidationCode::InvalidPage,
                "default page size must be between 1 and the maximum page size",
            )
            .into());
        }
        Ok(Engine {
            database: self.database,
            config: self.config,
        })
    }
}
