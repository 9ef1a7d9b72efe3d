//! Plain data contracts for users, complaints and their discussion threads.
//!
//! Entities carry no validation of their own; the rules live in
//! [`crate::store::ComplaintStore`].

pub mod comment;
pub mod complaint;
pub mod sentiment;
pub mod user;

pub use comment::{Comment, NewComment};
pub use complaint::{
    Complaint, ComplaintPatch, ComplaintStatus, HistoryEntry, NewComplaint, Priority,
};
pub use sentiment::{SentimentData, SentimentLabel};
pub use user::{NewUser, NotificationSettings, ProfileUpdate, Role, User};

use uuid::Uuid;

pub type UserId = Uuid;
pub type ComplaintId = Uuid;
pub type CommentId = Uuid;
