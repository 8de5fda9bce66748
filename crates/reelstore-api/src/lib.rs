//! Reelstore API Library
//!
//! HTTP handlers, authentication and application setup for the upload service.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
