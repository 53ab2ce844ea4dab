use crate::error::QueryError;
use crate::types::ids::{AuctionId, ItemId, PublicId, ReviewId};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

/// Columns a listing may be scoped by. Each maps to a fixed SQL identifier so
/// the filter value is the only thing ever bound from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    ReviewedBy,
    Seller,
    AuctionId,
    ItemId,
    ReviewId,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 5] = [
        FilterColumn::ReviewedBy,
        FilterColumn::Seller,
        FilterColumn::AuctionId,
        FilterColumn::ItemId,
        FilterColumn::ReviewId,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Self::ReviewedBy => "reviewed_by",
            Self::Seller => "seller",
            Self::AuctionId => "auction_id",
            Self::ItemId => "item_id",
            Self::ReviewId => "review_id",
        }
    }

    pub fn parse(value: &str) -> Result<Self, QueryError> {
        Self::ALL
            .into_iter()
            .find(|column| column.column_name() == value)
            .ok_or_else(|| QueryError::InvalidFilterColumn {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A filter column paired with its (already validated) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: FilterColumn,
    value: String,
}

impl Filter {
    pub fn reviewed_by(id: &PublicId) -> Self {
        Self::from_key(FilterColumn::ReviewedBy, id.to_key())
    }

    pub fn seller(id: &PublicId) -> Self {
        Self::from_key(FilterColumn::Seller, id.to_key())
    }

    pub fn auction(id: &AuctionId) -> Self {
        Self::from_key(FilterColumn::AuctionId, id.to_key())
    }

    pub fn item(id: &ItemId) -> Self {
        Self::from_key(FilterColumn::ItemId, id.to_key())
    }

    pub fn review(id: &ReviewId) -> Self {
        Self::from_key(FilterColumn::ReviewId, id.to_key())
    }

    /// Builds a filter from an untrusted column name and value. Every column
    /// holds a UUID, so the value is validated and normalised the same way.
    pub fn parse(column: &str, value: &str) -> Result<Self, QueryError> {
        let column = FilterColumn::parse(column)?;
        let value = uuid::Uuid::parse_str(value.trim())
            .map_err(|_| QueryError::InvalidFilterValue {
                column,
                value: value.to_string(),
            })?
            .hyphenated()
            .to_string();
        Ok(Self { column, value })
    }

    fn from_key(column: FilterColumn, value: String) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> FilterColumn {
        self.column
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderColumn {
    #[default]
    Created,
}

impl OrderColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Created => "created",
        }
    }

    pub fn parse(value: Option<&str>) -> Result<Self, QueryError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(raw) if raw.eq_ignore_ascii_case("created") => Ok(Self::Created),
            Some(raw) => Err(QueryError::InvalidOrderBy {
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn parse(value: Option<&str>) -> Result<Self, QueryError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(raw) if raw.eq_ignore_ascii_case("asc") => Ok(Self::Asc),
            Some(raw) if raw.eq_ignore_ascii_case("desc") => Ok(Self::Desc),
            Some(raw) => Err(QueryError::InvalidSort {
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ordering {
    pub column: OrderColumn,
    pub direction: SortDirection,
}

/// Raw listing query string. Everything is kept as text so that malformed
/// numbers surface as our own client errors instead of extractor rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    pub page: Option<String>,
    pub pagesize: Option<String>,
    pub orderby: Option<String>,
    pub sort: Option<String>,
    pub totalonly: Option<String>,
}

impl ListParams {
    pub fn ordering(&self) -> Result<Ordering, QueryError> {
        Ok(Ordering {
            column: OrderColumn::parse(self.orderby.as_deref())?,
            direction: SortDirection::parse(self.sort.as_deref())?,
        })
    }

    pub fn total_only(&self) -> bool {
        self.totalonly
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_column_allow_list() {
        assert_eq!(FilterColumn::parse("seller").unwrap(), FilterColumn::Seller);
        assert_eq!(
            FilterColumn::parse("reviewed_by").unwrap(),
            FilterColumn::ReviewedBy
        );
        assert!(matches!(
            FilterColumn::parse("review; DROP TABLE reviews"),
            Err(QueryError::InvalidFilterColumn { .. })
        ));
        assert!(FilterColumn::parse("overall").is_err());
    }

    #[test]
    fn filter_parse_normalises_value() {
        let filter = Filter::parse("auction_id", "E77BE9E0-BB00-49BC-9E7D-D7CC7072AB8C").unwrap();
        assert_eq!(filter.column(), FilterColumn::AuctionId);
        assert_eq!(filter.value(), "e77be9e0-bb00-49bc-9e7d-d7cc7072ab8c");
        assert!(matches!(
            Filter::parse("seller", "nope"),
            Err(QueryError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn order_and_sort_defaults() {
        let ordering = ListParams::default().ordering().unwrap();
        assert_eq!(ordering.column, OrderColumn::Created);
        assert_eq!(ordering.direction, SortDirection::Desc);
    }

    #[test]
    fn order_and_sort_reject_unknown_values() {
        let params = ListParams {
            orderby: Some("overall".to_string()),
            ..ListParams::default()
        };
        let err = params.ordering().unwrap_err();
        assert_eq!(err.to_string(), "not a valid orderby value");

        let params = ListParams {
            sort: Some("sideways".to_string()),
            ..ListParams::default()
        };
        let err = params.ordering().unwrap_err();
        assert_eq!(err.to_string(), "not a valid sort value");
    }

    #[test]
    fn sort_is_case_insensitive() {
        assert_eq!(SortDirection::parse(Some("ASC")).unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("Desc")).unwrap(), SortDirection::Desc);
    }

    #[test]
    fn total_only_flag() {
        let mut params = ListParams::default();
        assert!(!params.total_only());
        params.totalonly = Some("true".to_string());
        assert!(params.total_only());
        params.totalonly = Some(String::new());
        assert!(!params.total_only());
    }
}
