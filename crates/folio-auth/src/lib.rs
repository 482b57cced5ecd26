//! # folio-auth
//!
//! Admin authentication for the Folio gallery.
//!
//! There is a single admin identity. Its password is stored only as an
//! Argon2id hash in configuration; a successful login yields a signed JWT
//! that gates every write endpoint until it expires or is revoked.
//!
//! ## Modules
//!
//! - `jwt`: token creation, validation, and the revocation blocklist
//! - `password`: Argon2id hashing and strength policy
//! - `admin`: the login/logout/authenticate facade used by the API

pub mod admin;
pub mod jwt;
pub mod password;

pub use admin::{AdminAuthenticator, AdminToken};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
