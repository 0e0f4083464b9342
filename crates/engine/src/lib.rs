pub use amount::Amount;
pub use cash_flow_records::{CashFlowRecord, CashFlowRecordDetail};
pub use catalog::{CatalogEntry, CatalogKind, CatalogListFilter};
pub use error::{EngineError, ValidationCode, ValidationError};
pub use ops::{
    CatalogPatch, Engine, EngineBuilder, EngineConfig, RecordCandidate, RecordFilter,
    RecordOrdering, RecordPatch, SubcategoryListFilter, SubcategoryPatch,
};
pub use page::{Page, PageRequest};
pub use subcategories::{Subcategory, SubcategoryDetail};

mod amount;
mod cash_flow_records;
mod catalog;
mod categories;
mod error;
mod ops;
mod page;
mod statuses;
mod subcategories;
mod transaction_types;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
