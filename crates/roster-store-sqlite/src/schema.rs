//! SQL schema for the Roster SQLite store.
//!
//! The schema is an ordered list of forward migrations. The highest applied
//! version is kept in `PRAGMA user_version`; on open every migration above it
//! runs in its own transaction, so opening an up-to-date store is a no-op.

use rusqlite::Connection;

/// Connection-level settings. Not part of any migration because
/// `foreign_keys` cannot be changed inside a transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

pub struct Migration {
  pub version:     u32,
  pub description: &'static str,
  pub sql:         &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
  Migration {
    version:     1,
    description: "base tables",
    sql:         "
CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    surname       TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- opaque; produced by the credential verifier
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL
);

-- One row per admitted enrollment. Rows are never deleted.
CREATE TABLE IF NOT EXISTS student_subjects (
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id),
    enrolled_at TEXT NOT NULL,
    PRIMARY KEY (user_id, subject_id)
);

CREATE TABLE IF NOT EXISTS grades (
    grade_id    TEXT PRIMARY KEY,
    value       REAL NOT NULL,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id),
    recorded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS academic_calendar (
    entry_id    TEXT PRIMARY KEY,
    day_of_week TEXT NOT NULL,
    time        TEXT NOT NULL,
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id)
);

CREATE INDEX IF NOT EXISTS student_subjects_subject_idx ON student_subjects(subject_id);
CREATE INDEX IF NOT EXISTS grades_user_idx              ON grades(user_id);
CREATE INDEX IF NOT EXISTS calendar_subject_idx         ON academic_calendar(subject_id);
",
  },
  Migration {
    version:     2,
    description: "subject capacity",
    sql:         "
ALTER TABLE subjects ADD COLUMN max_students INTEGER NOT NULL DEFAULT 30;
",
  },
  Migration {
    version:     3,
    description: "subject schedule",
    sql:         "
ALTER TABLE subjects ADD COLUMN day_of_week TEXT NOT NULL DEFAULT '';
ALTER TABLE subjects ADD COLUMN time        TEXT NOT NULL DEFAULT '';
",
  },
  Migration {
    version:     4,
    description: "unique user email",
    sql:         "
CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users(email);
",
  },
];

/// The schema version a freshly-opened store ends up at.
pub fn latest_version() -> u32 {
  MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Apply every migration above the stored `user_version`. Returns the
/// versions that were applied, in order.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<Vec<u32>> {
  let current: u32 =
    conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

  let mut applied = Vec::new();
  for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)?;
    tx.commit()?;
    tracing::debug!(
      version = migration.version,
      description = migration.description,
      "applied schema migration"
    );
    applied.push(migration.version);
  }
  Ok(applied)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user_version(conn: &Connection) -> u32 {
    conn
      .pragma_query_value(None, "user_version", |row| row.get(0))
      .unwrap()
  }

  #[test]
  fn versions_are_strictly_increasing() {
    let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
    assert!(versions.windows(2).all(|w| w[0] < w[1]), "{versions:?}");
    assert_eq!(versions.first(), Some(&1));
  }

  #[test]
  fn fresh_database_reaches_latest_version() {
    let mut conn = Connection::open_in_memory().unwrap();
    let applied = migrate(&mut conn).unwrap();
    assert_eq!(applied, vec![1, 2, 3, 4]);
    assert_eq!(user_version(&conn), latest_version());
  }

  #[test]
  fn migrating_twice_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    migrate(&mut conn).unwrap();
    let applied = migrate(&mut conn).unwrap();
    assert!(applied.is_empty());
    assert_eq!(user_version(&conn), latest_version());
  }

  #[test]
  fn old_subjects_are_backfilled_with_defaults() {
    let mut conn = Connection::open_in_memory().unwrap();

    // A store created by the first release: no capacity or schedule columns.
    {
      let tx = conn.transaction().unwrap();
      tx.execute_batch(MIGRATIONS[0].sql).unwrap();
      tx.pragma_update(None, "user_version", 1).unwrap();
      tx.commit().unwrap();
    }
    conn
      .execute(
        "INSERT INTO subjects (subject_id, name) VALUES ('s-1', 'Chemistry')",
        [],
      )
      .unwrap();

    let applied = migrate(&mut conn).unwrap();
    assert_eq!(applied, vec![2, 3, 4]);

    let (max, day, time): (i64, String, String) = conn
      .query_row(
        "SELECT max_students, day_of_week, time FROM subjects WHERE subject_id = 's-1'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
      )
      .unwrap();
    assert_eq!(max, 30);
    assert_eq!(day, "");
    assert_eq!(time, "");
  }
}
