use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;

/// Body of comment create, update and partial update. Only `text` is writable;
/// an explicit `null` is distinct from leaving it out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub text: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    /// Author's username.
    pub author: String,
    pub post: i32,
    pub text: String,
    pub created: DateTime<Utc>,
}
