//! Operations over one complaint's comment forest.
//!
//! Every mutating function takes the current forest by reference and returns
//! a rebuilt copy, leaving the input untouched for readers. Traversal is
//! depth-first pre-order (a comment before its replies, siblings in posting
//! order) and uses an explicit stack, so thread depth is bounded only by
//! memory.

use crate::models::{Comment, CommentId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pre-order iterator over every comment in a forest.
pub struct Walk<'a> {
    stack: Vec<&'a Comment>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Comment;

    fn next(&mut self) -> Option<Self::Item> {
        let comment = self.stack.pop()?;
        self.stack.extend(comment.replies.iter().rev());
        Some(comment)
    }
}

pub fn walk(forest: &[Comment]) -> Walk<'_> {
    Walk {
        stack: forest.iter().rev().collect(),
    }
}

pub fn find<'a>(forest: &'a [Comment], comment_id: &CommentId) -> Option<&'a Comment> {
    walk(forest).find(|comment| &comment.id == comment_id)
}

pub fn contains(forest: &[Comment], comment_id: &CommentId) -> bool {
    find(forest, comment_id).is_some()
}

/// Total number of comments, replies included.
pub fn count(forest: &[Comment]) -> usize {
    walk(forest).count()
}

/// Nesting depth of a comment; roots are at depth 0.
pub fn depth_of(forest: &[Comment], comment_id: &CommentId) -> Option<usize> {
    let mut stack: Vec<(&Comment, usize)> = forest.iter().rev().map(|c| (c, 0)).collect();
    while let Some((comment, depth)) = stack.pop() {
        if &comment.id == comment_id {
            return Some(depth);
        }
        stack.extend(comment.replies.iter().rev().map(|reply| (reply, depth + 1)));
    }
    None
}

/// Comments reported at least once, in traversal order.
pub fn flagged(forest: &[Comment]) -> Vec<&Comment> {
    walk(forest).filter(|comment| comment.is_reported()).collect()
}

fn find_mut<'a>(forest: &'a mut [Comment], comment_id: &CommentId) -> Option<&'a mut Comment> {
    let mut stack: Vec<&'a mut Comment> = forest.iter_mut().rev().collect();
    while let Some(comment) = stack.pop() {
        if &comment.id == comment_id {
            return Some(comment);
        }
        stack.extend(comment.replies.iter_mut().rev());
    }
    None
}

/// Rebuilds the forest with `edit` applied to the first comment matching
/// `comment_id`. Returns `None` when no comment matches.
pub fn update<F>(forest: &[Comment], comment_id: &CommentId, edit: F) -> Option<Vec<Comment>>
where
    F: FnOnce(&mut Comment),
{
    let mut rebuilt = forest.to_vec();
    let target = find_mut(&mut rebuilt, comment_id)?;
    edit(target);
    Some(rebuilt)
}

/// Appends `comment` as a root, or as the last reply of `parent_id`.
/// Returns `None` if a parent was named and does not exist.
pub fn try_insert(
    forest: &[Comment],
    comment: Comment,
    parent_id: Option<&CommentId>,
) -> Option<Vec<Comment>> {
    match parent_id {
        None => {
            let mut rebuilt = forest.to_vec();
            rebuilt.push(comment);
            Some(rebuilt)
        }
        Some(parent_id) => update(forest, parent_id, |parent| parent.replies.push(comment)),
    }
}

/// Like [`try_insert`], but an unknown parent leaves the forest unchanged.
pub fn insert(forest: &[Comment], comment: Comment, parent_id: Option<&CommentId>) -> Vec<Comment> {
    try_insert(forest, comment, parent_id).unwrap_or_else(|| forest.to_vec())
}

pub fn toggle_upvote(forest: &[Comment], comment_id: &CommentId, user_id: &UserId) -> Vec<Comment> {
    update(forest, comment_id, |comment| {
        if !comment.upvotes.remove(user_id) {
            comment.upvotes.insert(*user_id);
        }
    })
    .unwrap_or_else(|| forest.to_vec())
}

/// Idempotent: reporting the same comment twice has no further effect.
pub fn mark_reported(forest: &[Comment], comment_id: &CommentId, user_id: &UserId) -> Vec<Comment> {
    update(forest, comment_id, |comment| {
        comment.reported_by.insert(*user_id);
    })
    .unwrap_or_else(|| forest.to_vec())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributorScore {
    pub user_id: UserId,
    pub score: u32,
}

/// Sums upvotes per author over community comments. Official business
/// responses are skipped. Authors appear in the order they are first seen.
pub fn score_contributors(forest: &[Comment]) -> Vec<ContributorScore> {
    let mut scores: Vec<ContributorScore> = Vec::new();
    let mut index: HashMap<UserId, usize> = HashMap::new();
    for comment in walk(forest).filter(|c| !c.is_official_response) {
        let slot = *index.entry(comment.author_id).or_insert_with(|| {
            scores.push(ContributorScore {
                user_id: comment.author_id,
                score: 0,
            });
            scores.len() - 1
        });
        scores[slot].score += comment.upvote_count();
    }
    scores
}

/// Author with the strictly highest positive score. On a tie the author
/// reached first in pre-order traversal wins.
pub fn top_contributor(forest: &[Comment]) -> Option<ContributorScore> {
    let mut best: Option<ContributorScore> = None;
    for candidate in score_contributors(forest) {
        if candidate.score == 0 {
            continue;
        }
        match best {
            Some(current) if current.score >= candidate.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}
