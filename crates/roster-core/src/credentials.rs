//! The credential-verification collaborator.
//!
//! Stores persist whatever string [`CredentialVerifier::hash`] returns and
//! never compare passwords themselves.

pub trait CredentialVerifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce the string to persist for `password`.
  fn hash(&self, password: &str) -> Result<String, Self::Error>;

  /// True iff `password` matches a string previously produced by
  /// [`hash`](Self::hash). Malformed stored strings never match.
  fn verify(&self, password: &str, stored: &str) -> bool;
}
