//! # GitHub Discussions
//!
//! Remote collaborator holding the documentation feedback threads.
//!
//! Everything goes through one GraphQL primitive, [`GitHubClient::query`], which
//! serializes a query with its variables, decodes the `{data, errors}` envelope
//! and fails on any reported error. The feedback pipeline only sees the
//! [`DiscussionApi`] trait so it can run against an in-memory fake.
//!
//! ## Queries
//! - `GetDiscussions`: paginated (`first`/`after`) listing filtered by category
//! - `GetDiscussion`: body of a single discussion by number
//! - `UpdateDiscussion`: body replace
//! - `ReopenDiscussion`
//! - `AddDiscussionComment`
//! - `CreateDiscussion`

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use api::DiscussionApi;
pub use client::{GitHubClient, GitHubConfig};
pub use error::{QueryError, QueryFailure};
pub use models::{Comment, CreatedDiscussion, Discussion, DiscussionPage, PageInfo};
