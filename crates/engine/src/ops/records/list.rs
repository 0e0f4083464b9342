use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait, prelude::*};

use crate::{
    CashFlowRecordDetail, Page, PageRequest, ResultEngine, ValidationCode, ValidationError,
    cash_flow_records, catalog::search_key, util::contains_pattern,
};

use super::super::{Engine, with_tx};
use super::expand_records;

/// Sort order of record listings. Ties are broken by id in the same
/// direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordOrdering {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    AmountDesc,
    AmountAsc,
}

impl RecordOrdering {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "-created_at",
            Self::CreatedAtAsc => "created_at",
            Self::AmountDesc => "-amount",
            Self::AmountAsc => "amount",
        }
    }
}

impl fmt::Display for RecordOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordOrdering {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created_at" => Ok(Self::CreatedAtDesc),
            "created_at" => Ok(Self::CreatedAtAsc),
            "-amount" => Ok(Self::AmountDesc),
            "amount" => Ok(Self::AmountAsc),
            other => Err(ValidationError::new(
                "ordering",
                ValidationCode::InvalidField,
                format!("unknown ordering '{other}'"),
            )),
        }
    }
}

/// Filters for listing cash-flow records. All filters combine with AND.
///
/// `date_from` and `date_to` are both inclusive and compare against the UTC
/// calendar date of `created_at`.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    pub status_id: Option<i32>,
    pub transaction_type_id: Option<i32>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring match on the comment.
    pub search: Option<String>,
    /// If true, includes soft-deleted records (default: false).
    pub include_inactive: bool,
    pub ordering: RecordOrdering,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

trait ApplyRecordFilters: QueryFilter + Sized {
    fn apply_record_filters(self, filter: &RecordFilter) -> Self;
}

impl<T> ApplyRecordFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_record_filters(mut self, filter: &RecordFilter) -> Self {
        if !filter.include_inactive {
            self = self.filter(cash_flow_records::Column::IsActive.eq(true));
        }
        if let Some(id) = filter.status_id {
            self = self.filter(cash_flow_records::Column::StatusId.eq(id));
        }
        if let Some(id) = filter.transaction_type_id {
            self = self.filter(cash_flow_records::Column::TransactionTypeId.eq(id));
        }
        if let Some(id) = filter.category_id {
            self = self.filter(cash_flow_records::Column::CategoryId.eq(id));
        }
        if let Some(id) = filter.subcategory_id {
            self = self.filter(cash_flow_records::Column::SubcategoryId.eq(id));
        }
        if let Some(from) = filter.date_from {
            self = self.filter(cash_flow_records::Column::CreatedAt.gte(start_of_day(from)));
        }
        // The upper bound is the start of the following day, exclusive.
        if let Some(next_day) = filter.date_to.and_then(|to| to.succ_opt()) {
            self = self.filter(cash_flow_records::Column::CreatedAt.lt(start_of_day(next_day)));
        }
        if let Some(search) = filter.search.as_deref().map(search_key)
            && !search.is_empty()
        {
            self = self
                .filter(cash_flow_records::Column::CommentNorm.like(contains_pattern(&search)));
        }
        self
    }
}

fn apply_ordering(
    query: Select<cash_flow_records::Entity>,
    ordering: RecordOrdering,
) -> Select<cash_flow_records::Entity> {
    match ordering {
        RecordOrdering::CreatedAtDesc => query
            .order_by_desc(cash_flow_records::Column::CreatedAt)
            .order_by_desc(cash_flow_records::Column::Id),
        RecordOrdering::CreatedAtAsc => query
            .order_by_asc(cash_flow_records::Column::CreatedAt)
            .order_by_asc(cash_flow_records::Column::Id),
        RecordOrdering::AmountDesc => query
            .order_by_desc(cash_flow_records::Column::AmountMinor)
            .order_by_desc(cash_flow_records::Column::Id),
        RecordOrdering::AmountAsc => query
            .order_by_asc(cash_flow_records::Column::AmountMinor)
            .order_by_asc(cash_flow_records::Column::Id),
    }
}

impl Engine {
    /// Lists cash-flow records with their references expanded.
    ///
    /// Pages past the end come back empty but still carry the total count.
    pub async fn list_records(
        &self,
        filter: &RecordFilter,
        request: PageRequest,
    ) -> ResultEngine<Page<CashFlowRecordDetail>> {
        with_tx!(self, |db_tx| {
            let query = cash_flow_records::Entity::find().apply_record_filters(filter);
            let query = apply_ordering(query, filter.ordering);

            let paginator = query.paginate(&db_tx, request.page_size);
            let total_count = paginator.num_items().await?;
            let models = paginator.fetch_page(request.page - 1).await?;
            let items = expand_records(&db_tx, models).await?;

            Ok(Page {
                items,
                total_count,
                page: request.page,
                page_size: request.page_size,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parses_known_values() {
        for ordering in [
            RecordOrdering::CreatedAtDesc,
            RecordOrdering::CreatedAtAsc,
            RecordOrdering::AmountDesc,
            RecordOrdering::AmountAsc,
        ] {
            assert_eq!(ordering.as_str().parse::<RecordOrdering>(), Ok(ordering));
        }
        let err = "name".parse::<RecordOrdering>().unwrap_err();
        assert_eq!(err.field, "ordering");
        assert_eq!(err.code, ValidationCode::InvalidField);
    }

    #[test]
    fn start_of_day_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2024-01-10T00:00:00+00:00");
    }
}
