//! [`SqliteStore`]: the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{
  OptionalExtension as _,
  ffi::{
    SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_PRIMARYKEY,
    SQLITE_CONSTRAINT_UNIQUE,
  },
};
use uuid::Uuid;

use roster_core::{
  record::{Enrollment, Grade, ResolvedGrade, ScheduledClass},
  store::RosterStore,
  subject::{CalendarEntry, NewSubject, Subject},
  user::{NewUser, StoredUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawResolvedGrade, RawScheduledClass, RawSubject, RawUser, decode_count,
    encode_dt, encode_uuid,
  },
  schema::{PRAGMAS, migrate},
};

const SUBJECT_COLUMNS: &str = "subject_id, name, max_students, day_of_week, time";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// is executed in order on the connection's background thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let applied = self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(migrate(conn)?)
      })
      .await?;
    if !applied.is_empty() {
      tracing::info!(?applied, "migrated store schema");
    }
    Ok(())
  }

  /// Release the connection. Further calls on clones of this store fail.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

/// The SQLite extended result code, if `err` is a constraint violation.
fn constraint_code(err: &tokio_rusqlite::Error) -> Option<i32> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(e.extended_code)
    }
    _ => None,
  }
}

/// Map a foreign-key violation to [`Error::Dangling`], anything else to
/// [`Error::Database`].
fn dangling_or_database(err: tokio_rusqlite::Error, what: String) -> Error {
  match constraint_code(&err) {
    Some(SQLITE_CONSTRAINT_FOREIGNKEY) => Error::Dangling(what),
    _ => Error::Database(err),
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      surname:    input.surname,
      email:      input.email,
      created_at: Utc::now(),
    };

    let id_str  = encode_uuid(user.user_id);
    let name    = user.name.clone();
    let surname = user.surname.clone();
    let email   = user.email.clone();
    let hash    = input.password_hash;
    let at_str  = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, surname, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, surname, email, hash, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| match constraint_code(&e) {
        Some(SQLITE_CONSTRAINT_UNIQUE) => Error::DuplicateEmail(user.email.clone()),
        _ => Error::Database(e),
      })?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, name, surname, email, password_hash, created_at
             FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<StoredUser>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, name, surname, email, password_hash, created_at
             FROM users WHERE email = ?1",
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_stored).transpose()
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
    let scheduled = input.is_scheduled();
    let subject = Subject {
      subject_id:   Uuid::new_v4(),
      name:         input.name,
      max_capacity: input.max_capacity,
      day_of_week:  input.day_of_week,
      time:         input.time,
    };

    let id_str    = encode_uuid(subject.subject_id);
    let entry_str = encode_uuid(Uuid::new_v4());
    let name      = subject.name.clone();
    let max       = i64::from(subject.max_capacity);
    let day       = subject.day_of_week.clone();
    let time      = subject.time.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO subjects (subject_id, name, max_students, day_of_week, time)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, max, day, time],
        )?;
        if scheduled {
          tx.execute(
            "INSERT INTO academic_calendar (entry_id, day_of_week, time, subject_id)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![entry_str, day, time, id_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }

  async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = ?1"),
            rusqlite::params![id_str],
            RawSubject::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let raws: Vec<RawSubject> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {SUBJECT_COLUMNS} FROM subjects"))?;
        let rows = stmt
          .query_map([], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  // ── Enrollments ───────────────────────────────────────────────────────────

  async fn count_enrollments(&self, subject_id: Uuid) -> Result<u32> {
    let id_str = encode_uuid(subject_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM student_subjects WHERE subject_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    decode_count(count, "enrollment count")
  }

  async fn is_enrolled(&self, user_id: Uuid, subject_id: Uuid) -> Result<bool> {
    let user_str    = encode_uuid(user_id);
    let subject_str = encode_uuid(subject_id);

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM student_subjects WHERE user_id = ?1 AND subject_id = ?2",
            rusqlite::params![user_str, subject_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(found)
  }

  async fn insert_enrollment(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
  ) -> Result<Enrollment> {
    let enrollment = Enrollment { user_id, subject_id, enrolled_at: Utc::now() };

    let user_str    = encode_uuid(user_id);
    let subject_str = encode_uuid(subject_id);
    let at_str      = encode_dt(enrollment.enrolled_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO student_subjects (user_id, subject_id, enrolled_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_str, subject_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| match constraint_code(&e) {
        Some(SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE) => {
          Error::Conflict { user_id, subject_id }
        }
        _ => dangling_or_database(
          e,
          format!("enrollment of user {user_id} in subject {subject_id}"),
        ),
      })?;

    Ok(enrollment)
  }

  async fn subjects_for_user(&self, user_id: Uuid) -> Result<Vec<Subject>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.subject_id, s.name, s.max_students, s.day_of_week, s.time
           FROM student_subjects e
           JOIN subjects s ON s.subject_id = e.subject_id
           WHERE e.user_id = ?1
           ORDER BY e.enrolled_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  // ── Grades ────────────────────────────────────────────────────────────────

  async fn record_grade(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
    value: f64,
  ) -> Result<Grade> {
    let grade = Grade {
      grade_id: Uuid::new_v4(),
      user_id,
      subject_id,
      value,
      recorded_at: Utc::now(),
    };

    let id_str      = encode_uuid(grade.grade_id);
    let user_str    = encode_uuid(user_id);
    let subject_str = encode_uuid(subject_id);
    let at_str      = encode_dt(grade.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO grades (grade_id, value, user_id, subject_id, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, value, user_str, subject_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        dangling_or_database(
          e,
          format!("grade for user {user_id} in subject {subject_id}"),
        )
      })?;

    Ok(grade)
  }

  async fn grades_for_user(&self, user_id: Uuid) -> Result<Vec<ResolvedGrade>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawResolvedGrade> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT g.grade_id, g.user_id, g.subject_id, g.value, g.recorded_at,
                  s.name
           FROM grades g
           LEFT JOIN subjects s ON s.subject_id = g.subject_id
           WHERE g.user_id = ?1
           ORDER BY g.recorded_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawResolvedGrade::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResolvedGrade::into_resolved).collect()
  }

  // ── Calendar ──────────────────────────────────────────────────────────────

  async fn add_calendar_entry(
    &self,
    subject_id: Uuid,
    day_of_week: String,
    time: String,
  ) -> Result<CalendarEntry> {
    let entry = CalendarEntry {
      entry_id: Uuid::new_v4(),
      subject_id,
      day_of_week,
      time,
    };

    let id_str      = encode_uuid(entry.entry_id);
    let subject_str = encode_uuid(subject_id);
    let day         = entry.day_of_week.clone();
    let time        = entry.time.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO academic_calendar (entry_id, day_of_week, time, subject_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, day, time, subject_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        dangling_or_database(e, format!("calendar entry for subject {subject_id}"))
      })?;

    Ok(entry)
  }

  async fn calendar_for_user(&self, user_id: Uuid) -> Result<Vec<ScheduledClass>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawScheduledClass> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT c.entry_id, c.subject_id, c.day_of_week, c.time, s.name
           FROM student_subjects e
           JOIN academic_calendar c ON c.subject_id = e.subject_id
           LEFT JOIN subjects     s ON s.subject_id = c.subject_id
           WHERE e.user_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawScheduledClass::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScheduledClass::into_scheduled).collect()
  }
}
