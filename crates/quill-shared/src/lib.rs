//! # Quill Shared
//!
//! Wire types shared by the server and API clients: request/response bodies
//! and the RFC 7807 error document.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
