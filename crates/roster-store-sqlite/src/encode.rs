//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Capacities and counts are SQLite integers.

use chrono::{DateTime, Utc};
use roster_core::{
  record::{Grade, ResolvedGrade, ScheduledClass, UNKNOWN_SUBJECT},
  subject::{CalendarEntry, Subject},
  user::{StoredUser, User},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counts ───────────────────────────────────────────────────────────────────

pub fn decode_count(n: i64, column: &str) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::OutOfRange(format!("{column} = {n}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns of a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub surname:       String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  /// Expects `user_id, name, surname, email, password_hash, created_at`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      surname:       row.get(2)?,
      email:         row.get(3)?,
      password_hash: row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredUser> {
    Ok(StoredUser {
      user:          User {
        user_id:    decode_uuid(&self.user_id)?,
        name:       self.name,
        surname:    self.surname,
        email:      self.email,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }

  pub fn into_user(self) -> Result<User> { Ok(self.into_stored()?.user) }
}

/// Raw columns of a `subjects` row.
pub struct RawSubject {
  pub subject_id:   String,
  pub name:         String,
  pub max_students: i64,
  pub day_of_week:  String,
  pub time:         String,
}

impl RawSubject {
  /// Expects `subject_id, name, max_students, day_of_week, time`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subject_id:   row.get(0)?,
      name:         row.get(1)?,
      max_students: row.get(2)?,
      day_of_week:  row.get(3)?,
      time:         row.get(4)?,
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id:   decode_uuid(&self.subject_id)?,
      name:         self.name,
      max_capacity: decode_count(self.max_students, "max_students")?,
      day_of_week:  self.day_of_week,
      time:         self.time,
    })
  }
}

/// Raw columns of a `grades` row plus the LEFT JOINed subject name.
pub struct RawResolvedGrade {
  pub grade_id:     String,
  pub user_id:      String,
  pub subject_id:   String,
  pub value:        f64,
  pub recorded_at:  String,
  pub subject_name: Option<String>,
}

impl RawResolvedGrade {
  /// Expects `grade_id, user_id, subject_id, value, recorded_at, name`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      grade_id:     row.get(0)?,
      user_id:      row.get(1)?,
      subject_id:   row.get(2)?,
      value:        row.get(3)?,
      recorded_at:  row.get(4)?,
      subject_name: row.get(5)?,
    })
  }

  pub fn into_resolved(self) -> Result<ResolvedGrade> {
    Ok(ResolvedGrade {
      grade:        Grade {
        grade_id:    decode_uuid(&self.grade_id)?,
        user_id:     decode_uuid(&self.user_id)?,
        subject_id:  decode_uuid(&self.subject_id)?,
        value:       self.value,
        recorded_at: decode_dt(&self.recorded_at)?,
      },
      subject_name: self
        .subject_name
        .unwrap_or_else(|| UNKNOWN_SUBJECT.to_owned()),
    })
  }
}

/// Raw columns of an `academic_calendar` row plus the LEFT JOINed subject
/// name.
pub struct RawScheduledClass {
  pub entry_id:     String,
  pub subject_id:   String,
  pub day_of_week:  String,
  pub time:         String,
  pub subject_name: Option<String>,
}

impl RawScheduledClass {
  /// Expects `entry_id, subject_id, day_of_week, time, name`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:     row.get(0)?,
      subject_id:   row.get(1)?,
      day_of_week:  row.get(2)?,
      time:         row.get(3)?,
      subject_name: row.get(4)?,
    })
  }

  pub fn into_scheduled(self) -> Result<ScheduledClass> {
    Ok(ScheduledClass {
      entry:        CalendarEntry {
        entry_id:    decode_uuid(&self.entry_id)?,
        subject_id:  decode_uuid(&self.subject_id)?,
        day_of_week: self.day_of_week,
        time:        self.time,
      },
      subject_name: self
        .subject_name
        .unwrap_or_else(|| UNKNOWN_SUBJECT.to_owned()),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unresolved_grade_subject_is_unknown() {
    let raw = RawResolvedGrade {
      grade_id:     encode_uuid(Uuid::new_v4()),
      user_id:      encode_uuid(Uuid::new_v4()),
      subject_id:   encode_uuid(Uuid::new_v4()),
      value:        4.5,
      recorded_at:  encode_dt(Utc::now()),
      subject_name: None,
    };
    let resolved = raw.into_resolved().unwrap();
    assert_eq!(resolved.subject_name, "Unknown");
    assert_eq!(resolved.grade.value, 4.5);
  }

  #[test]
  fn unresolved_calendar_subject_is_unknown() {
    let raw = RawScheduledClass {
      entry_id:     encode_uuid(Uuid::new_v4()),
      subject_id:   encode_uuid(Uuid::new_v4()),
      day_of_week:  "Friday".into(),
      time:         "14:00".into(),
      subject_name: None,
    };
    assert_eq!(raw.into_scheduled().unwrap().subject_name, "Unknown");
  }

  #[test]
  fn negative_capacity_is_rejected() {
    let raw = RawSubject {
      subject_id:   encode_uuid(Uuid::new_v4()),
      name:         "Broken".into(),
      max_students: -1,
      day_of_week:  String::new(),
      time:         String::new(),
    };
    assert!(matches!(raw.into_subject(), Err(Error::OutOfRange(_))));
  }

  #[test]
  fn bad_timestamp_is_a_date_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
