//! Per-student records: enrollments and grades, plus the joined read views
//! handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::subject::CalendarEntry;

/// Subject name reported when a join finds no matching subject.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// Membership of a student in a subject. The `(user_id, subject_id)` pair is
/// unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
  pub user_id:     Uuid,
  pub subject_id:  Uuid,
  pub enrolled_at: DateTime<Utc>,
}

/// A single recorded grade. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
  pub grade_id:    Uuid,
  pub user_id:     Uuid,
  pub subject_id:  Uuid,
  pub value:       f64,
  pub recorded_at: DateTime<Utc>,
}

/// A grade joined with the name of its subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGrade {
  pub grade:        Grade,
  pub subject_name: String,
}

/// A calendar entry joined with the name of its subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledClass {
  pub entry:        CalendarEntry,
  pub subject_name: String,
}
