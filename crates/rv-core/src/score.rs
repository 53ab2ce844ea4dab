use crate::types::review::{ScoreStats, ScoreSummary};

/// Below this many reviews a seller gets no published score.
pub const MIN_REVIEWS_FOR_SCORE: u64 = 3;

impl ScoreSummary {
    pub fn insufficient(review_count: u64) -> Self {
        Self {
            review_count,
            overall: 0.0,
            post_and_packaging: 0.0,
            communication: 0.0,
            as_described: 0.0,
            score: 0.0,
        }
    }
}

pub fn summarize(stats: &ScoreStats) -> ScoreSummary {
    if stats.count < MIN_REVIEWS_FOR_SCORE {
        return ScoreSummary::insufficient(stats.count);
    }
    let (Some(overall), Some(pap), Some(comm), Some(as_desc)) = (
        stats.overall,
        stats.post_and_packaging,
        stats.communication,
        stats.as_described,
    ) else {
        return ScoreSummary::insufficient(stats.count);
    };

    let meta = (overall + pap + comm + as_desc) / 4.0;
    ScoreSummary {
        review_count: stats.count,
        overall: round2(overall),
        post_and_packaging: round2(pap),
        communication: round2(comm),
        as_described: round2(as_desc),
        score: round2(meta),
    }
}

/// Two decimal places, half rounded up, computed in single precision.
#[allow(clippy::cast_possible_truncation)]
pub fn round2(value: f64) -> f32 {
    let value = value as f32;
    (value * 100.0 + 0.5).floor() / 100.0
}
