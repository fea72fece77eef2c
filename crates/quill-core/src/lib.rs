//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! Entities, the ownership rule, repository ports, and the services that
//! enforce the resource access contracts. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
