use rusqlite::Connection;
use rv_core::error::{ReviewError, ServiceError};
use rv_core::store::Store;

use crate::review_repo::ReviewRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for DbStore {
    type Reviews<'a>
        = ReviewRepo<'a>
    where
        Self: 'a;

    fn reviews(&self) -> Self::Reviews<'_> {
        ReviewRepo::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&Self) -> Result<T, ServiceError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(tx_error)?;
        let result = f(self);
        match result {
            Ok(value) => {
                self.conn.execute_batch("COMMIT").map_err(tx_error)?;
                Ok(value)
            }
            Err(err) => {
                self.conn.execute_batch("ROLLBACK").map_err(tx_error)?;
                Err(err)
            }
        }
    }
}

fn tx_error(err: rusqlite::Error) -> ServiceError {
    ServiceError::Review(ReviewError::Storage {
        message: err.to_string(),
    })
}
