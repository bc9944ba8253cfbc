//! Authentication types for the OpenBB Hub.
//!
//! This module provides:
//! - `Session`: token and account metadata returned by a successful login
//! - `Credentials`: provider API keys in the local naming convention
//! - `TokenClaims`: unverified view of a personal access token payload
//!
//! Secret values are held in `secrecy::SecretString` and never rendered by
//! `Debug` or `Display`.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::Credentials;
pub use session::{Session, REDACTED};
pub use token::TokenClaims;
