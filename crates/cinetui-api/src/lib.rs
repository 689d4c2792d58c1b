//! API client library for cinetui.
//!
//! Provides a typed client for the movie catalog backend.

/// Movie catalog API client.
pub mod catalog;
