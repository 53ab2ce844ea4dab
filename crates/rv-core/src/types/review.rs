use crate::types::ids::{AuctionId, ItemId, PublicId, ReviewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub review_id: ReviewId,
    pub reviewed_by: PublicId,
    pub auction_id: AuctionId,
    pub item_id: ItemId,
    pub seller: PublicId,
    pub review: String,
    pub overall: i32,
    pub post_and_packaging: i32,
    pub communication: i32,
    pub as_described: i32,
    pub created: DateTime<Utc>,
}

/// Body of a create request. `reviewed_by` is optional because the author is
/// always taken from the access token; when present it must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewInput {
    #[serde(default)]
    pub reviewed_by: Option<PublicId>,
    pub auction_id: AuctionId,
    pub item_id: ItemId,
    pub seller: PublicId,
    pub review: String,
    pub overall: i32,
    pub post_and_packaging: i32,
    pub communication: i32,
    pub as_described: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedReview {
    pub review_id: ReviewId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_reviews: u64,
    pub current_page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewTotal {
    pub total_reviews: u64,
}

/// Raw aggregate row for one seller: the row count and the mean of each
/// sub-score column. Means are `None` when there are no rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreStats {
    pub count: u64,
    pub overall: Option<f64>,
    pub post_and_packaging: Option<f64>,
    pub communication: Option<f64>,
    pub as_described: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreSummary {
    pub review_count: u64,
    pub overall: f32,
    pub post_and_packaging: f32,
    pub communication: f32,
    pub as_described: f32,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserMetadata {
    pub total_reviews_of: u64,
    pub total_reviews_by: u64,
    pub score: ScoreSummary,
}
