use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_TITLE_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 50;

/// Group - a classification tag that posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A group that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "This field may not be blank."));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::validation(
                "title",
                format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
            ));
        }
        if self.slug.is_empty() || self.slug.len() > MAX_SLUG_LEN {
            return Err(DomainError::validation(
                "slug",
                format!("Slug must be between 1 and {MAX_SLUG_LEN} characters."),
            ));
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            ));
        }
        Ok(())
    }
}
