/// Router Module Index
///
/// Splits the API by access level. Access control is applied per module with
/// an axum layer in `create_router`, and repeated in each privileged handler
/// through the `AdminSession` extractor.

/// Read-only content, the public aggregate and the session endpoints.
/// Collection reads are visible-only.
pub mod public;

/// Content writes and image upload. Requires an admin session.
pub mod authenticated;

/// Admin dashboard reads under `/admin`, hidden records included.
pub mod admin;
