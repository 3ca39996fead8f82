//! Subjects and their calendar slots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capacity given to subjects created without an explicit limit, and the
/// backfill value for subjects that predate the capacity column.
pub const DEFAULT_MAX_CAPACITY: u32 = 30;

/// A course students can enroll in. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  #[serde(rename = "id")]
  pub subject_id:   Uuid,
  pub name:         String,
  pub max_capacity: u32,
  /// Free-form weekday label, e.g. `"Monday"`. Empty when unscheduled.
  pub day_of_week:  String,
  /// Free-form time label, e.g. `"09:00"`. Empty when unscheduled.
  pub time:         String,
}

/// Input to [`crate::store::RosterStore::create_subject`].
#[derive(Debug, Clone)]
pub struct NewSubject {
  pub name:         String,
  pub max_capacity: u32,
  pub day_of_week:  String,
  pub time:         String,
}

impl NewSubject {
  /// An unscheduled subject with the default capacity.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:         name.into(),
      max_capacity: DEFAULT_MAX_CAPACITY,
      day_of_week:  String::new(),
      time:         String::new(),
    }
  }

  pub fn with_capacity(mut self, max_capacity: u32) -> Self {
    self.max_capacity = max_capacity;
    self
  }

  pub fn scheduled(
    mut self,
    day_of_week: impl Into<String>,
    time: impl Into<String>,
  ) -> Self {
    self.day_of_week = day_of_week.into();
    self.time = time.into();
    self
  }

  /// True when both a day and a time are set.
  pub fn is_scheduled(&self) -> bool {
    !self.day_of_week.is_empty() && !self.time.is_empty()
  }
}

/// A row of the academic calendar: when a subject meets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
  pub entry_id:    Uuid,
  pub subject_id:  Uuid,
  pub day_of_week: String,
  pub time:        String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_subject_defaults_to_thirty_seats_unscheduled() {
    let s = NewSubject::new("Mathematics");
    assert_eq!(s.max_capacity, 30);
    assert!(!s.is_scheduled());
    assert!(s.scheduled("Monday", "09:00").is_scheduled());
  }

  #[test]
  fn subject_serialises_with_wire_field_names() {
    let subject = Subject {
      subject_id:   Uuid::nil(),
      name:         "Physics".into(),
      max_capacity: 12,
      day_of_week:  "Tuesday".into(),
      time:         "10:30".into(),
    };
    let json = serde_json::to_value(&subject).unwrap();
    assert_eq!(json["id"], Uuid::nil().to_string());
    assert_eq!(json["maxCapacity"], 12);
    assert_eq!(json["dayOfWeek"], "Tuesday");
    assert_eq!(json["time"], "10:30");
  }
}
