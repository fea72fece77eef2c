use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Authored, check_text, require_text};
use crate::error::DomainError;

/// Post entity - a published blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: Author,
    pub image: Option<String>,
    pub group: Option<i32>,
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author.id
    }
}

/// A post that has not been persisted yet.
///
/// `author` and `pub_date` are fixed here and never change afterwards.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: Author,
    pub image: Option<String>,
    pub group: Option<i32>,
}

impl NewPost {
    pub fn new(author: Author, text: String, image: Option<String>, group: Option<i32>) -> Self {
        Self {
            text,
            pub_date: Utc::now(),
            author,
            image,
            group,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_text(&self.text)
    }
}

/// Client-mutable fields of a post. `None` leaves the field untouched;
/// `text: Some(None)` is an explicit `null`, which validation rejects.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub group: Option<Option<i32>>,
    full: bool,
}

impl PostChanges {
    /// Changes for a partial update.
    pub fn partial(
        text: Option<Option<String>>,
        image: Option<Option<String>>,
        group: Option<Option<i32>>,
    ) -> Self {
        Self {
            text,
            image,
            group,
            full: false,
        }
    }

    /// Changes for a full replacement: `text` is required and absent
    /// optional fields are cleared.
    pub fn replace(
        text: Option<Option<String>>,
        image: Option<String>,
        group: Option<i32>,
    ) -> Self {
        Self {
            text,
            image: Some(image),
            group: Some(group),
            full: true,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_text(&self.text, self.full)
    }

    /// The group the post will reference once applied, if it changes.
    pub fn new_group(&self) -> Option<i32> {
        self.group.flatten()
    }

    pub fn apply(self, post: &mut Post) {
        if let Some(Some(text)) = self.text {
            post.text = text;
        }
        if let Some(image) = self.image {
            post.image = image;
        }
        if let Some(group) = self.group {
            post.group = group;
        }
    }
}
