//! # cadeau-auth
//!
//! Account operations for the Cadeau storefront: credential hashing,
//! registration, login/logout, session resolution, and default admin
//! seeding.  All state lives in the slot store from `cadeau-store`; this
//! crate never throws across its public boundary — every operation returns
//! a `Result` whose error text is suitable for inline display.

pub mod ops;
pub mod password;
pub mod seed;
pub mod session;

mod error;

pub use error::AuthError;
pub use ops::{login, register};
pub use seed::{seed_admin, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
pub use session::{is_logged_in, logout, session_user};
