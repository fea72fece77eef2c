use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Authored, check_text, require_text};
use crate::error::DomainError;

/// Comment entity - a reply attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: Author,
    pub post: i32,
}

impl Comment {
    /// Apply a client-sent `text`, the only mutable field. Absent leaves the
    /// text as it is unless `required`; an explicit `null` is rejected.
    pub fn edit_text(
        &mut self,
        text: Option<Option<String>>,
        required: bool,
    ) -> Result<(), DomainError> {
        check_text(&text, required)?;
        if let Some(Some(text)) = text {
            self.text = text;
        }
        Ok(())
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author.id
    }
}

/// A comment that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: Author,
    pub post: i32,
}

impl NewComment {
    pub fn new(author: Author, post: i32, text: String) -> Self {
        Self {
            text,
            created: Utc::now(),
            author,
            post,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_text(&self.text)
    }
}
