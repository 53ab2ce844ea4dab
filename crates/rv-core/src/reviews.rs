use crate::error::ReviewError;
use crate::types::{Filter, ItemId, Ordering, PublicId, Review, ReviewId, ScoreStats};

pub trait ReviewRepository {
    fn insert(&self, review: &Review) -> Result<(), ReviewError>;
    fn get(&self, id: &ReviewId) -> Result<Option<Review>, ReviewError>;
    fn exists_for_item(&self, reviewer: &PublicId, item: &ItemId) -> Result<bool, ReviewError>;
    fn count(&self, filter: &Filter) -> Result<u64, ReviewError>;
    fn fetch_page(
        &self,
        filter: &Filter,
        ordering: Ordering,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Review>, ReviewError>;
    /// Deletes only when both id and author match; returns rows affected.
    fn delete(&self, id: &ReviewId, reviewer: &PublicId) -> Result<usize, ReviewError>;
    fn score_stats(&self, seller: &PublicId) -> Result<ScoreStats, ReviewError>;
}
