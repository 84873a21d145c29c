//! HTTP handlers, grouped by resource.
//!
//! Public read handlers only ever see visible records. Every handler that
//! changes state takes an [`AdminSession`](crate::auth::AdminSession) argument,
//! so the session gate runs before any repository call even if a route is
//! mounted without the admin middleware.

pub mod auth;
pub mod experience;
pub mod portfolio;
pub mod projects;
pub mod singletons;
pub mod skills;
pub mod upload;

use crate::error::ApiError;

/// Maps a payload validation message to a 400.
pub(crate) fn invalid(message: String) -> ApiError {
    tracing::debug!(%message, "payload rejected");
    ApiError::BadRequest(message)
}
