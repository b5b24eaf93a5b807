//! Credential material: redacted secrets, API credentials, and the cached token payload.

pub mod credentials;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use secret::*;
pub use token::*;
