pub mod ids;
pub mod query;
pub mod review;

pub use ids::{AuctionId, IdError, ItemId, PublicId, ReviewId};
pub use query::{Filter, FilterColumn, ListParams, OrderColumn, Ordering, SortDirection};
pub use review::{
    CreateReviewInput, CreatedReview, Review, ReviewPage, ReviewTotal, ScoreStats, ScoreSummary,
    UserMetadata,
};
