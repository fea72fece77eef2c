//! Data Transfer Objects - request/response types for the API.
//!
//! Request bodies only carry client-writable fields. Anything else a client
//! sends (`author`, `post`, `pub_date`, ...) is ignored during decoding.

mod auth;
mod comments;
mod groups;
mod posts;

pub use auth::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
pub use comments::{CommentRequest, CommentResponse};
pub use groups::{CreateGroupRequest, GroupResponse};
pub use posts::{PostRequest, PostResponse};

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
