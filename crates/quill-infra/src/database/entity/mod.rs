//! SeaORM entities, one per table.

pub mod comment;
pub mod group;
pub mod post;
pub mod user;
