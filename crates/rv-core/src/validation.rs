use crate::error::ReviewError;
use crate::types::{CreateReviewInput, PublicId};
use std::ops::RangeInclusive;

pub const SCORE_RANGE: RangeInclusive<i32> = 1..=10;
pub const MAX_REVIEW_CHARS: usize = 2000;

pub fn validate_create_input(
    input: &CreateReviewInput,
    reviewer: &PublicId,
) -> Result<(), ReviewError> {
    if let Some(claimed) = &input.reviewed_by {
        if claimed != reviewer {
            return Err(ReviewError::ReviewerMismatch);
        }
    }

    let text = input.review.trim();
    if text.is_empty() {
        return Err(ReviewError::InvalidInput {
            message: "the review field is required".to_string(),
        });
    }
    if text.chars().count() > MAX_REVIEW_CHARS {
        return Err(ReviewError::InvalidInput {
            message: format!("review must be at most {MAX_REVIEW_CHARS} characters"),
        });
    }

    for (field, value) in [
        ("overall", input.overall),
        ("post_and_packaging", input.post_and_packaging),
        ("communication", input.communication),
        ("as_described", input.as_described),
    ] {
        validate_score(field, value)?;
    }
    Ok(())
}

fn validate_score(field: &str, value: i32) -> Result<(), ReviewError> {
    if SCORE_RANGE.contains(&value) {
        return Ok(());
    }
    Err(ReviewError::InvalidInput {
        message: format!(
            "{field} must be between {} and {}",
            SCORE_RANGE.start(),
            SCORE_RANGE.end()
        ),
    })
}
