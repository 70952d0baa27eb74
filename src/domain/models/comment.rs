use std::collections::HashMap;

use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::{credential, require_text};
use crate::error::AppError;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Comment {
    pub id: String,
    pub event_id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(event_id: String, author_id: String, content: String, parent_id: Option<String>) -> Result<Self, AppError> {
        require_text("content", &content)?;
        Ok(Self {
            id: credential::new_public_id(),
            event_id,
            parent_id,
            author_id,
            content,
            created_at: Utc::now(),
        })
    }
}

/// Listing shape. The author's participant id is a credential, so only the
/// display name is exposed.
#[derive(Debug, Serialize, Clone)]
pub struct CommentNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentNode>,
}

/// One event's comments held in an arena, with the parent relation
/// resolved through an id -> slot index.
pub struct CommentForest {
    comments: Vec<Comment>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl CommentForest {
    pub fn new(mut comments: Vec<Comment>) -> Self {
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let index: HashMap<String, usize> = comments
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id.clone(), slot))
            .collect();

        let mut children = vec![Vec::new(); comments.len()];
        let mut roots = Vec::new();
        for (slot, comment) in comments.iter().enumerate() {
            match comment.parent_id.as_ref().and_then(|p| index.get(p)) {
                Some(&parent) => children[parent].push(slot),
                // A parent outside this set can only be a dangling row; surface it at the top.
                None => roots.push(slot),
            }
        }

        Self { comments, index, children, roots }
    }

    /// `id` followed by every transitive reply, parents before children.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        let mut stack = vec![start];
        while let Some(slot) = stack.pop() {
            ids.push(self.comments[slot].id.clone());
            stack.extend(self.children[slot].iter().rev());
        }
        ids
    }

    /// Builds the nested listing, resolving author names through `names`
    /// (participant id -> display name).
    pub fn into_tree(self, names: &HashMap<String, String>) -> Vec<CommentNode> {
        self.roots.iter().map(|&slot| self.node(slot, names)).collect()
    }

    fn node(&self, slot: usize, names: &HashMap<String, String>) -> CommentNode {
        let comment = &self.comments[slot];
        CommentNode {
            id: comment.id.clone(),
            parent_id: comment.parent_id.clone(),
            author_name: names.get(&comment.author_id).cloned().unwrap_or_default(),
            content: comment.content.clone(),
            created_at: comment.created_at,
            replies: self.children[slot].iter().map(|&child| self.node(child, names)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn comment(id: &str, parent: Option<&str>, minutes: i64) -> Comment {
        Comment {
            id: id.into(),
            event_id: "ev".into(),
            parent_id: parent.map(Into::into),
            author_id: "p1".into(),
            content: format!("comment {}", id),
            created_at: Utc::now() + Duration::minutes(minutes),
        }
    }

    fn forest() -> CommentForest {
        CommentForest::new(vec![
            comment("reply-b", Some("root-1"), 3),
            comment("root-1", None, 0),
            comment("reply-a", Some("root-1"), 1),
            comment("nested", Some("reply-a"), 2),
            comment("root-2", None, 4),
        ])
    }

    #[test]
    fn builds_nested_tree_in_creation_order() {
        let names = HashMap::from([("p1".to_string(), "Ada".to_string())]);
        let tree = forest().into_tree(&names);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, "root-1");
        assert_eq!(tree[0].author_name, "Ada");
        let replies: Vec<_> = tree[0].replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(replies, vec!["reply-a", "reply-b"]);
        assert_eq!(tree[0].replies[0].replies[0].id, "nested");
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn subtree_of_root_contains_all_descendants() {
        let f = forest();
        let mut ids = f.subtree_ids("root-1");
        ids.sort();
        assert_eq!(ids, vec!["nested", "reply-a", "reply-b", "root-1"]);
    }

    #[test]
    fn subtree_of_leaf_is_itself() {
        assert_eq!(forest().subtree_ids("reply-b"), vec!["reply-b"]);
        assert!(forest().subtree_ids("missing").is_empty());
    }

    #[test]
    fn empty_content_is_rejected() {
        assert!(Comment::new("ev".into(), "p1".into(), "  ".into(), None).is_err());
    }
}
