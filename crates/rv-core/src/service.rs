use crate::config::ServiceConfig;
use crate::error::{ReviewError, ServiceError};
use crate::links::build_links;
use crate::pagination::PageRequest;
use crate::reviews::ReviewRepository;
use crate::score::summarize;
use crate::store::Store;
use crate::types::{
    CreateReviewInput, Filter, ListParams, PublicId, Review, ReviewId, ReviewPage, ScoreSummary,
    UserMetadata,
};
use crate::validation::validate_create_input;
use chrono::{SubsecRound, Utc};
use tracing::{debug, info};

pub struct ReviewService<S: Store> {
    store: S,
    config: ServiceConfig,
}

impl<S: Store> ReviewService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// One page of reviews matching `filter`. `path_and_query` is the request
    /// target the page was asked for, reused to build prev/next links.
    pub fn list(
        &self,
        filter: &Filter,
        params: &ListParams,
        path_and_query: &str,
    ) -> Result<ReviewPage, ServiceError> {
        let ordering = params.ordering()?;
        let request = PageRequest::parse(
            params.page.as_deref(),
            params.pagesize.as_deref(),
            &self.config.pagination,
        )?;

        let reviews = self.store.reviews();
        let total = reviews.count(filter)?;
        if total == 0 {
            return Err(ReviewError::NoReviews.into());
        }
        let window = request.window(total)?;
        let rows = reviews.fetch_page(filter, ordering, window.limit(), window.offset())?;
        let links = build_links(&self.config.public_base_url, path_and_query, &window)?;
        debug!(
            column = %filter.column(),
            page = window.page,
            total_pages = window.total_pages,
            rows = rows.len(),
            "listed reviews"
        );

        Ok(ReviewPage {
            reviews: rows,
            total_reviews: total,
            current_page: window.page,
            page_size: window.page_size,
            total_pages: window.total_pages,
            prev_url: links.prev,
            next_url: links.next,
        })
    }

    pub fn total(&self, filter: &Filter) -> Result<u64, ServiceError> {
        Ok(self.store.reviews().count(filter)?)
    }

    pub fn get(&self, id: &ReviewId) -> Result<Review, ServiceError> {
        self.store
            .reviews()
            .get(id)?
            .ok_or_else(|| ReviewError::NotFound.into())
    }

    /// Stores a new review authored by `reviewer`. Referenced auction and item
    /// are expected to have been verified by the caller.
    pub fn create(
        &self,
        reviewer: &PublicId,
        input: CreateReviewInput,
    ) -> Result<Review, ServiceError> {
        validate_create_input(&input, reviewer)?;
        let review = Review {
            review_id: ReviewId::generate(),
            reviewed_by: *reviewer,
            auction_id: input.auction_id,
            item_id: input.item_id,
            seller: input.seller,
            review: input.review.trim().to_string(),
            overall: input.overall,
            post_and_packaging: input.post_and_packaging,
            communication: input.communication,
            as_described: input.as_described,
            created: Utc::now().trunc_subsecs(6),
        };

        self.store.with_tx(|store| {
            let reviews = store.reviews();
            if reviews.exists_for_item(reviewer, &review.item_id)? {
                return Err(ReviewError::Duplicate.into());
            }
            reviews.insert(&review)?;
            Ok(())
        })?;

        info!(
            review_id = %review.review_id,
            seller = %review.seller,
            item_id = %review.item_id,
            "review created"
        );
        Ok(review)
    }

    pub fn delete(&self, id: &ReviewId, reviewer: &PublicId) -> Result<(), ServiceError> {
        let affected = self.store.reviews().delete(id, reviewer)?;
        if affected == 0 {
            return Err(ReviewError::NotDeleted.into());
        }
        info!(review_id = %id, "review deleted");
        Ok(())
    }

    pub fn score(&self, seller: &PublicId) -> Result<ScoreSummary, ServiceError> {
        let stats = self.store.reviews().score_stats(seller)?;
        Ok(summarize(&stats))
    }

    pub fn metadata(&self, user: &PublicId) -> Result<UserMetadata, ServiceError> {
        let reviews = self.store.reviews();
        let total_reviews_of = reviews.count(&Filter::seller(user))?;
        let total_reviews_by = reviews.count(&Filter::reviewed_by(user))?;
        let score = summarize(&reviews.score_stats(user)?);
        Ok(UserMetadata {
            total_reviews_of,
            total_reviews_by,
            score,
        })
    }
}
