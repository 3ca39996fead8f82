//! Server configuration, deserialised from `config.toml` and `ROSTER_*`
//! environment variables.

use std::path::PathBuf;

use roster_core::subject::{DEFAULT_MAX_CAPACITY, NewSubject};
use serde::Deserialize;

/// Top-level server configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// Path of the SQLite database. A leading `~/` is expanded.
  pub store_path: PathBuf,
  pub argon2:     Argon2Config,
  /// Subjects inserted on startup when the store has none.
  pub subjects:   Vec<SeedSubject>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("roster.db"),
      argon2:     Argon2Config::default(),
      subjects:   Vec::new(),
    }
  }
}

/// Argon2id cost parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
  pub memory_kib:  u32,
  pub iterations:  u32,
  pub parallelism: u32,
}

impl Default for Argon2Config {
  fn default() -> Self {
    Self { memory_kib: 19 * 1024, iterations: 2, parallelism: 1 }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SeedSubject {
  pub name:         String,
  #[serde(default = "default_capacity")]
  pub max_capacity: u32,
  #[serde(default)]
  pub day_of_week:  String,
  #[serde(default)]
  pub time:         String,
}

fn default_capacity() -> u32 { DEFAULT_MAX_CAPACITY }

impl From<&SeedSubject> for NewSubject {
  fn from(s: &SeedSubject) -> Self {
    NewSubject {
      name:         s.name.clone(),
      max_capacity: s.max_capacity,
      day_of_week:  s.day_of_week.clone(),
      time:         s.time.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("roster.db"));
    assert_eq!(cfg.argon2.iterations, 2);
    assert!(cfg.subjects.is_empty());
  }

  #[test]
  fn seed_subjects_default_capacity_and_schedule() {
    let cfg = parse(
      r#"
        port = 9000

        [argon2]
        memory_kib = 64

        [[subjects]]
        name = "Mathematics"
        max_capacity = 2
        day_of_week = "Monday"
        time = "09:00"

        [[subjects]]
        name = "History"
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.argon2.memory_kib, 64);
    assert_eq!(cfg.argon2.parallelism, 1);
    assert_eq!(cfg.subjects.len(), 2);

    let maths = NewSubject::from(&cfg.subjects[0]);
    assert_eq!(maths.max_capacity, 2);
    assert!(maths.is_scheduled());

    let history = NewSubject::from(&cfg.subjects[1]);
    assert_eq!(history.max_capacity, 30);
    assert!(!history.is_scheduled());
  }
}
