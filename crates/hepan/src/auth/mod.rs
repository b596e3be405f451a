//! Authentication types and session management.
//!
//! The forum has two credential worlds: a cookie session established by the
//! legacy login form (plus the per-page [`FormHash`]), and a bearer
//! [`Authorization`] used by the JSON API. A [`Session`] owns both.

mod credentials;
mod session;
mod tokens;

pub use credentials::Credentials;
pub use session::{FormHashPolicy, ReplyPages, Session};
pub use tokens::{Authorization, FormHash};
