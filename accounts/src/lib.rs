//! Shared account model and the credential login flow.
//!
//! This crate owns the user-list wire representation used by `client`, `cli`
//! and the `userstub` fixture server. Transport lives with each caller: the
//! browser goes through `gloo-net`, the CLI through `reqwest`, and tests through
//! an in-memory [`UserDirectory`].
//!
//! ERROR HANDLING
//! ==============
//! A login that matches nobody is an expected outcome and surfaces as
//! [`LoginError::InvalidCredentials`]. Transport failures are carried through
//! untouched in [`LoginError::Transport`] so callers pick their own message.


use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User-facing message for a credential pair that matches no user.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email hoặc mật khẩu không đúng";

/// Path of the user collection on the fixture server.
pub const USERS_PATH: &str = "/users";

/// Build the user-list endpoint for `base_url`, tolerating a trailing slash.
#[must_use]
pub fn users_endpoint(base_url: &str) -> String {
    format!("{}{USERS_PATH}", base_url.trim_end_matches('/'))
}

/// Transient email/password pair. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Query parameters understood by `GET /users`.
    ///
    /// Transports must percent-encode these values; both `gloo-net` and
    /// `reqwest` do so through their `query` builders.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [("email", self.email.as_str()), ("password", self.password.as_str())]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A user as returned by the fixture server.
///
/// Only `token` is required. Every other field is kept verbatim in `extra`
/// so records with richer shapes pass through without loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque bearer token issued for this user.
    pub token: String,
    /// Remaining fields (`id`, `email`, `role`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.str_field("role")
    }

    /// Read a string-valued extension field.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Successful login: the matched user's token plus the full record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    pub token: String,
    pub user: UserRecord,
}

/// Failure to obtain a user list from the directory.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (connection refused, CORS, ...).
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),
    /// The body was not a JSON array of user records.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Error returned by [`login`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Source of user records matching a credential pair.
pub trait UserDirectory {
    /// Issue `GET /users?email=..&password=..` and decode the response.
    fn find_users(&self, credentials: &Credentials) -> impl Future<Output = Result<Vec<UserRecord>, TransportError>>;
}

/// Resolve a directory response into a login outcome.
///
/// The first record in response order wins; duplicates are not checked.
///
/// # Errors
///
/// Returns [`LoginError::InvalidCredentials`] when `records` is empty.
pub fn select_first_match(records: Vec<UserRecord>) -> Result<AuthResult, LoginError> {
    let user = records.into_iter().next().ok_or(LoginError::InvalidCredentials)?;
    Ok(AuthResult { token: user.token.clone(), user })
}

/// Look up `credentials` in `directory` and return the matched session data.
///
/// The result is not persisted; storing the token is the caller's job.
///
/// # Errors
///
/// [`LoginError::InvalidCredentials`] when nobody matches, or
/// [`LoginError::Transport`] when the directory could not be queried.
pub async fn login<D: UserDirectory>(directory: &D, credentials: &Credentials) -> Result<AuthResult, LoginError> {
    let records = directory.find_users(credentials).await?;
    select_first_match(records)
}
