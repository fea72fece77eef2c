use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;

/// Body of post create, update and partial update.
///
/// For create and update `text` is required; for partial update every
/// field is optional and `null` clears `image` or `group`. A `null` text is
/// kept apart from an absent one so it can be rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub group: Option<Option<i32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Author's username.
    pub author: String,
    pub image: Option<String>,
    pub group: Option<i32>,
}
