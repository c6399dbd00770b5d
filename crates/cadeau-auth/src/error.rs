use thiserror::Error;

use crate::password::PasswordError;

/// Failures surfaced by the public auth operations.
///
/// These are result values, not panics; their `Display` text is what a form
/// would show inline.  `InvalidCredentials` deliberately reads the same for
/// an unknown identifier and a wrong password, so callers cannot tell which
/// half was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("This email or phone number is already registered")]
    DuplicateIdentifier,

    #[error("Invalid email/phone or password")]
    InvalidCredentials,

    /// The matched record has an empty credential hash (incompletely
    /// migrated); the account must be re-registered.
    #[error("This account needs its password set again. Please re-register.")]
    PasswordResetRequired,

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AuthError>;
