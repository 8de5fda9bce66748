//! Bearer token authentication.

pub mod extractor;
pub mod jwt;

pub use extractor::AuthenticatedUser;
pub use jwt::{issue_access_token, JwtClaims, JwtService};
