use crate::util::{decode_id, from_timestamp, to_sql_int, to_timestamp};
use rusqlite::{Connection, ErrorCode, params};
use rv_core::error::ReviewError;
use rv_core::reviews::ReviewRepository;
use rv_core::types::{
    AuctionId, Filter, ItemId, Ordering, PublicId, Review, ReviewId, ScoreStats,
};

const COLUMNS: &str = "review_id, reviewed_by, auction_id, item_id, seller, review, overall, pap_cost, communication, as_described, created";

pub struct ReviewRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> ReviewRepository for ReviewRepo<'a> {
    fn insert(&self, review: &Review) -> Result<(), ReviewError> {
        let sql = format!(
            "INSERT INTO reviews ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        );
        self.conn
            .execute(
                &sql,
                params![
                    review.review_id.to_key(),
                    review.reviewed_by.to_key(),
                    review.auction_id.to_key(),
                    review.item_id.to_key(),
                    review.seller.to_key(),
                    review.review,
                    review.overall,
                    review.post_and_packaging,
                    review.communication,
                    review.as_described,
                    to_timestamp(&review.created),
                ],
            )
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(code, _)
                    if code.code == ErrorCode::ConstraintViolation =>
                {
                    ReviewError::Duplicate
                }
                other => storage(other),
            })?;
        Ok(())
    }

    fn get(&self, id: &ReviewId) -> Result<Option<Review>, ReviewError> {
        let sql = format!("SELECT {COLUMNS} FROM reviews WHERE review_id = ?1");
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt.query([id.to_key()]).map_err(storage)?;
        let Some(row) = rows.next().map_err(storage)? else {
            return Ok(None);
        };
        map_review_row(row).map(Some)
    }

    fn exists_for_item(&self, reviewer: &PublicId, item: &ItemId) -> Result<bool, ReviewError> {
        let found: i64 = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM reviews WHERE reviewed_by = ?1 AND item_id = ?2)",
                [reviewer.to_key(), item.to_key()],
                |row| row.get(0),
            )
            .map_err(storage)?;
        Ok(found != 0)
    }

    fn count(&self, filter: &Filter) -> Result<u64, ReviewError> {
        let sql = format!(
            "SELECT COUNT(*) FROM reviews WHERE {} = ?1",
            filter.column().column_name()
        );
        let count: i64 = self
            .conn
            .query_row(&sql, [filter.value()], |row| row.get(0))
            .map_err(storage)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn fetch_page(
        &self,
        filter: &Filter,
        ordering: Ordering,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Review>, ReviewError> {
        // Column and direction come from closed enums; only the value is bound.
        let sql = format!(
            "SELECT {COLUMNS} FROM reviews WHERE {} = ?1 ORDER BY {} {}, rowid ASC LIMIT ?2 OFFSET ?3",
            filter.column().column_name(),
            ordering.column.column_name(),
            ordering.direction.keyword(),
        );
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt
            .query(params![
                filter.value(),
                to_sql_int(limit),
                to_sql_int(offset)
            ])
            .map_err(storage)?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            reviews.push(map_review_row(row)?);
        }
        Ok(reviews)
    }

    fn delete(&self, id: &ReviewId, reviewer: &PublicId) -> Result<usize, ReviewError> {
        self.conn
            .execute(
                "DELETE FROM reviews WHERE review_id = ?1 AND reviewed_by = ?2",
                [id.to_key(), reviewer.to_key()],
            )
            .map_err(storage)
    }

    fn score_stats(&self, seller: &PublicId) -> Result<ScoreStats, ReviewError> {
        self.conn
            .query_row(
                "SELECT COUNT(*), AVG(overall), AVG(pap_cost), AVG(communication), AVG(as_described) FROM reviews WHERE seller = ?1",
                [seller.to_key()],
                |row| {
                    let count: i64 = row.get(0)?;
                    Ok(ScoreStats {
                        count: u64::try_from(count).unwrap_or_default(),
                        overall: row.get(1)?,
                        post_and_packaging: row.get(2)?,
                        communication: row.get(3)?,
                        as_described: row.get(4)?,
                    })
                },
            )
            .map_err(storage)
    }
}

fn storage(err: impl ToString) -> ReviewError {
    ReviewError::Storage {
        message: err.to_string(),
    }
}

fn map_review_row(row: &rusqlite::Row<'_>) -> Result<Review, ReviewError> {
    let review_id: String = row.get(0).map_err(storage)?;
    let reviewed_by: String = row.get(1).map_err(storage)?;
    let auction_id: String = row.get(2).map_err(storage)?;
    let item_id: String = row.get(3).map_err(storage)?;
    let seller: String = row.get(4).map_err(storage)?;
    let created: String = row.get(10).map_err(storage)?;

    Ok(Review {
        review_id: decode_id(&review_id, ReviewId::parse).map_err(storage)?,
        reviewed_by: decode_id(&reviewed_by, PublicId::parse).map_err(storage)?,
        auction_id: decode_id(&auction_id, AuctionId::parse).map_err(storage)?,
        item_id: decode_id(&item_id, ItemId::parse).map_err(storage)?,
        seller: decode_id(&seller, PublicId::parse).map_err(storage)?,
        review: row.get(5).map_err(storage)?,
        overall: row.get(6).map_err(storage)?,
        post_and_packaging: row.get(7).map_err(storage)?,
        communication: row.get(8).map_err(storage)?,
        as_described: row.get(9).map_err(storage)?,
        created: from_timestamp(&created).map_err(storage)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use chrono::{Duration, TimeZone, Utc};
    use rv_core::pagination::total_pages;
    use rv_core::types::SortDirection;

    const REVIEWER: &str = "f38ba39a-3682-4803-a498-659f0bf05304";
    const SELLER: &str = "46d7d11c-fa06-4e54-8208-95433b98cfc9";
    const AUCTION: &str = "e4a2d2f5-5a0d-4f6e-9b43-c8b2f6f3a001";

    fn review(n: u8, item: &str, scores: [i32; 4]) -> Review {
        Review {
            review_id: ReviewId::generate(),
            reviewed_by: PublicId::parse(REVIEWER).unwrap(),
            auction_id: AuctionId::parse(AUCTION).unwrap(),
            item_id: ItemId::parse(item).unwrap(),
            seller: PublicId::parse(SELLER).unwrap(),
            review: format!("review number {n}"),
            overall: scores[0],
            post_and_packaging: scores[1],
            communication: scores[2],
            as_described: scores[3],
            created: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                + Duration::minutes(i64::from(n)),
        }
    }

    fn item(n: u8) -> String {
        format!("00000000-0000-4000-8000-0000000000{n:02}")
    }

    fn seeded() -> (Connection, Vec<Review>) {
        let conn = with_test_db().unwrap();
        let rows = vec![
            review(1, &item(1), [5, 4, 4, 3]),
            review(2, &item(2), [5, 4, 4, 3]),
            review(3, &item(3), [10, 9, 8, 9]),
        ];
        {
            let repo = ReviewRepo::new(&conn);
            for row in &rows {
                repo.insert(row).unwrap();
            }
        }
        (conn, rows)
    }

    #[test]
    fn insert_and_get_round_trip() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        let fetched = repo.get(&rows[1].review_id).unwrap().unwrap();
        assert_eq!(fetched, rows[1]);
        assert!(repo.get(&ReviewId::generate()).unwrap().is_none());
    }

    #[test]
    fn second_review_of_same_item_is_duplicate() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        let mut again = review(9, rows[0].item_id.to_key().as_str(), [1, 1, 1, 1]);
        again.item_id = rows[0].item_id;
        assert!(repo.exists_for_item(&again.reviewed_by, &again.item_id).unwrap());
        assert!(matches!(repo.insert(&again), Err(ReviewError::Duplicate)));
    }

    #[test]
    fn pages_follow_requested_direction() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        let filter = Filter::seller(&rows[0].seller);
        assert_eq!(repo.count(&filter).unwrap(), 3);

        let newest_first = repo
            .fetch_page(&filter, Ordering::default(), 2, 0)
            .unwrap();
        assert_eq!(newest_first.len(), 2);
        assert_eq!(newest_first[0].review_id, rows[2].review_id);
        assert_eq!(newest_first[1].review_id, rows[1].review_id);

        let oldest_first = Ordering {
            direction: SortDirection::Asc,
            ..Ordering::default()
        };
        let tail = repo.fetch_page(&filter, oldest_first, 2, 2).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].review_id, rows[2].review_id);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let conn = with_test_db().unwrap();
        let repo = ReviewRepo::new(&conn);
        let first = review(1, &item(1), [5, 5, 5, 5]);
        let mut second = review(1, &item(2), [5, 5, 5, 5]);
        second.created = first.created;
        repo.insert(&first).unwrap();
        repo.insert(&second).unwrap();

        let filter = Filter::reviewed_by(&first.reviewed_by);
        let page = repo.fetch_page(&filter, Ordering::default(), 10, 0).unwrap();
        assert_eq!(page[0].review_id, first.review_id);
        assert_eq!(page[1].review_id, second.review_id);
    }

    #[test]
    fn walking_every_page_returns_each_row_once() {
        let conn = with_test_db().unwrap();
        let repo = ReviewRepo::new(&conn);
        let mut rows = Vec::new();
        for n in 1..=11_u8 {
            let mut row = review(n, &item(n), [5, 5, 5, 5]);
            // Pairs share a timestamp so ties straddle page boundaries.
            row.created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                + Duration::minutes(i64::from(n / 2));
            repo.insert(&row).unwrap();
            rows.push(row);
        }
        let mut expected: Vec<(usize, &Review)> = rows.iter().enumerate().collect();
        expected.sort_by(|(a_pos, a), (b_pos, b)| b.created.cmp(&a.created).then(a_pos.cmp(b_pos)));
        let expected: Vec<ReviewId> = expected.into_iter().map(|(_, row)| row.review_id).collect();

        let filter = Filter::seller(&rows[0].seller);
        let total = repo.count(&filter).unwrap();
        assert_eq!(total, 11);
        for size in [1_u64, 3, 10] {
            let mut walked = Vec::new();
            for page in 1..=total_pages(total, size) {
                let offset = (page - 1) * size;
                let fetched = repo
                    .fetch_page(&filter, Ordering::default(), size, offset)
                    .unwrap();
                let expected_len = size.min(total - offset);
                assert_eq!(fetched.len() as u64, expected_len, "size {size} page {page}");
                walked.extend(fetched.into_iter().map(|row| row.review_id));
            }
            assert_eq!(walked, expected, "size {size}");
        }
    }

    #[test]
    fn unmatched_filter_counts_zero() {
        let (conn, _) = seeded();
        let repo = ReviewRepo::new(&conn);
        let filter = Filter::parse("item_id", &item(42)).unwrap();
        assert_eq!(repo.count(&filter).unwrap(), 0);
        assert!(repo
            .fetch_page(&filter, Ordering::default(), 10, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_requires_matching_author() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        assert_eq!(repo.delete(&rows[0].review_id, &rows[0].seller).unwrap(), 0);
        assert_eq!(
            repo.delete(&rows[0].review_id, &rows[0].reviewed_by).unwrap(),
            1
        );
        assert!(repo.get(&rows[0].review_id).unwrap().is_none());
    }

    #[test]
    fn score_stats_average_each_column() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        let stats = repo.score_stats(&rows[0].seller).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.overall.unwrap() - 20.0 / 3.0).abs() < 1e-9);
        assert!((stats.post_and_packaging.unwrap() - 17.0 / 3.0).abs() < 1e-9);
        assert!((stats.communication.unwrap() - 16.0 / 3.0).abs() < 1e-9);
        assert!((stats.as_described.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn score_stats_for_unknown_seller_are_empty() {
        let (conn, rows) = seeded();
        let repo = ReviewRepo::new(&conn);
        let stats = repo.score_stats(&rows[0].reviewed_by).unwrap();
        assert_eq!(stats, ScoreStats::default());
    }
}
