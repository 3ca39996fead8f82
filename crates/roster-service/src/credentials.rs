//! Argon2 implementation of [`CredentialVerifier`].

use argon2::{
  Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
  Version, password_hash::SaltString,
};
use rand_core::OsRng;
use roster_core::credentials::CredentialVerifier;
use thiserror::Error;

/// Failure to produce a password hash.
#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("argon2 hashing failed: {0}")]
  Hash(argon2::password_hash::Error),
}

/// Hashes passwords into argon2id PHC strings (`$argon2id$v=19$…`) with a
/// fresh random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2Credentials {
  argon2: Argon2<'static>,
}

impl Argon2Credentials {
  /// Argon2id with explicit cost parameters. `memory_kib` must be at least
  /// `8 * parallelism`.
  pub fn with_params(
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
  ) -> Result<Self, argon2::Error> {
    let params = Params::new(memory_kib, iterations, parallelism, None)?;
    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

impl CredentialVerifier for Argon2Credentials {
  type Error = CredentialError;

  fn hash(&self, password: &str) -> Result<String, Self::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = self
      .argon2
      .hash_password(password.as_bytes(), &salt)
      .map_err(CredentialError::Hash)?;
    Ok(hash.to_string())
  }

  fn verify(&self, password: &str, stored: &str) -> bool {
    // Parameters are read back from the PHC string, so hashes made with
    // other costs still verify.
    PasswordHash::new(stored)
      .map(|hash| {
        self
          .argon2
          .verify_password(password.as_bytes(), &hash)
          .is_ok()
      })
      .unwrap_or(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cheap() -> Argon2Credentials {
    Argon2Credentials::with_params(8, 1, 1).unwrap()
  }

  #[test]
  fn hash_then_verify() {
    let c = cheap();
    let stored = c.hash("secret").unwrap();
    assert!(stored.starts_with("$argon2id$"));
    assert!(c.verify("secret", &stored));
    assert!(!c.verify("Secret", &stored));
  }

  #[test]
  fn same_password_hashes_differently() {
    let c = cheap();
    assert_ne!(c.hash("secret").unwrap(), c.hash("secret").unwrap());
  }

  #[test]
  fn garbage_stored_string_never_verifies() {
    assert!(!cheap().verify("secret", "secret"));
    assert!(!cheap().verify("", ""));
  }

  #[test]
  fn hash_failures_are_boxable_errors() {
    let err = CredentialError::Hash(argon2::password_hash::Error::Password);
    assert!(err.to_string().starts_with("argon2 hashing failed"));

    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
    assert!(boxed.source().is_none());
  }

  #[test]
  fn too_little_memory_is_rejected() {
    assert!(Argon2Credentials::with_params(1, 1, 1).is_err());
  }
}
