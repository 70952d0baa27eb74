use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::{
    models::{
        comment::{Comment, CommentForest, CommentNode},
        credential::credential_matches,
    },
    ports::{CommentRepository, EventRepository, ParticipantRepository},
};
use crate::error::AppError;

pub struct CommentThread {
    comment_repo: Arc<dyn CommentRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl CommentThread {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        event_repo: Arc<dyn EventRepository>,
    ) -> Self {
        Self { comment_repo, participant_repo, event_repo }
    }

    pub async fn create_comment(
        &self,
        event_id: &str,
        author_id: &str,
        content: String,
        parent_id: Option<String>,
    ) -> Result<Comment, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let comment = Comment::new(event.id.clone(), author_id.to_string(), content, parent_id)?;

        self.participant_repo.find_by_id(author_id).await?
            .filter(|p| p.event_id == event.id)
            .ok_or_else(|| AppError::Validation("Author is not a participant of this event".into()))?;

        if let Some(parent_id) = &comment.parent_id {
            self.comment_repo.find_by_id(parent_id).await?
                .filter(|parent| parent.event_id == event.id)
                .ok_or_else(|| AppError::Validation("Parent comment does not belong to this event".into()))?;
        }

        let created = self.comment_repo.create(&comment).await?;
        info!(event_id = %event.id, comment_id = %created.id, "Comment posted");
        Ok(created)
    }

    /// Top-level comments, each carrying its transitive replies.
    pub async fn list_root_comments(&self, event_id: &str) -> Result<Vec<CommentNode>, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let comments = self.comment_repo.list_by_event(&event.id).await?;
        let names: HashMap<String, String> = self.participant_repo.list_by_event(&event.id).await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(CommentForest::new(comments).into_tree(&names))
    }

    /// `caller_id` is either the author's participant id or the event's
    /// edit id. Replies go with the comment.
    pub async fn delete_comment(&self, comment_id: &str, caller_id: &str) -> Result<(), AppError> {
        let comment = self.comment_repo.find_by_id(comment_id).await?
            .ok_or_else(|| AppError::not_found("Comment"))?;
        let event = self.event_repo.find_by_id(&comment.event_id).await?
            .ok_or_else(|| AppError::not_found("Comment"))?;

        let is_author = credential_matches(&comment.author_id, caller_id);
        let is_organizer = credential_matches(&event.edit_id, caller_id);
        if !is_author && !is_organizer {
            return Err(AppError::not_found("Comment"));
        }

        let forest = CommentForest::new(self.comment_repo.list_by_event(&event.id).await?);
        let mut subtree = forest.subtree_ids(&comment.id);
        if subtree.is_empty() {
            subtree.push(comment.id.clone());
        }

        let removed = self.comment_repo.delete_many(&event.id, &subtree).await?;
        info!(event_id = %event.id, comment_id = %comment.id, removed, "Comment thread deleted");
        Ok(())
    }
}
