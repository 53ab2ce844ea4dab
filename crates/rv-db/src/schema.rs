use rusqlite::{Connection, Result};

use crate::util::to_sql_int;

/// Applied in order; `PRAGMA user_version` records how many have run.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/0001_init.sql")];

pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(conn)
}

pub fn schema_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or_default())
}

pub fn migrate(conn: &Connection) -> Result<()> {
    let applied = schema_version(conn)?;
    for (index, sql) in (1_u64..).zip(MIGRATIONS.iter()).skip(applied) {
        conn.execute_batch(sql)?;
        conn.pragma_update(None, "user_version", to_sql_int(index))?;
    }
    Ok(())
}

pub fn open_and_migrate(path: &str) -> Result<Connection> {
    let conn = open(path)?;
    migrate(&conn)?;
    Ok(conn)
}

pub fn with_test_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrate(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_record_version() {
        let conn = with_test_db().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len());
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len());
    }

    #[test]
    fn fresh_database_is_stamped_with_migration_count() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
        migrate(&conn).unwrap();
        let stamped: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(stamped, i64::try_from(MIGRATIONS.len()).unwrap());
    }

    #[test]
    fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        let path = path.to_str().unwrap();
        {
            let conn = open_and_migrate(path).unwrap();
            conn.execute(
                "INSERT INTO reviews (review_id, reviewed_by, auction_id, item_id, seller, review, overall, pap_cost, communication, as_described, created) VALUES ('r', 'b', 'a', 'i', 's', 'ok', 1, 1, 1, 1, '2024-01-01T00:00:00.000000Z')",
                [],
            )
            .unwrap();
        }
        let conn = open_and_migrate(path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
