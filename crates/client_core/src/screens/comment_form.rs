//! State behind the "add comment" form.

use shared::protocol::Comment;
use tracing::error;

use crate::{
    error::ClientError, resource::ResourceController, screens::sources::CommentsSection,
    validation::validate_comment,
};

pub struct CommentForm {
    content: String,
    author: String,
    submission: ResourceController<Comment>,
}

impl Default for CommentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentForm {
    pub fn new() -> Self {
        Self::with_values("", "")
    }

    pub fn with_values(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            submission: ResourceController::new("comment-form")
                .with_on_error(|message| error!("failed to submit comment: {message}")),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn error(&self) -> Option<String> {
        self.submission.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_pending()
    }

    pub fn is_valid(&self) -> bool {
        validate_comment(&self.content, &self.author).is_ok()
    }

    /// Editing a field dismisses a previously shown submission error.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dismiss_error();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
        self.dismiss_error();
    }

    fn dismiss_error(&self) {
        if self.submission.error().is_some() {
            self.submission.reset();
        }
    }

    /// Validates, then posts through `section` so the comment list goes back
    /// to its first page and refetches. Fields are cleared only on success.
    pub async fn submit(&mut self, section: &mut CommentsSection) -> Result<Comment, ClientError> {
        let draft = validate_comment(&self.content, &self.author)?;
        self.submission.reset();
        let comment = self
            .submission
            .execute(move || section.submit_create(draft))
            .await?;
        self.content.clear();
        self.author.clear();
        Ok(comment)
    }
}
