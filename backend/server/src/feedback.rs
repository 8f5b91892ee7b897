//! # Feedback Recording
//!
//! One request, one linear sequence of remote calls:
//!
//! 1. Spurious submissions stop here with nothing recorded.
//! 2. The path is reduced to its last two segments and turned into a title.
//! 3. Discussions in the feedback category are scanned for that exact title.
//! 4. Found: the body is fetched, the tally for the rating is bumped and written back.
//!    Missing: a discussion is created with the tally seeded to 1/0 or 0/1.
//! 5. A closed discussion is reopened, but only when there is a comment to post.
//! 6. The comment is added and its URL returned.
//!
//! The first failing call aborts the sequence. Nothing already applied is
//! rolled back, so a tally can be bumped without its comment landing.
use github::{Discussion, DiscussionApi};
use tracing::info;

use crate::{
    error::AppError,
    models::FeedbackRequest,
    state::DiscussionLocks,
    utils::{create_comment_body, create_discussion_body, create_title, normalize_path, update_rating},
};

/// Returns the new comment's URL, or `None` when the submission was spurious.
pub async fn record_feedback(
    api: &dyn DiscussionApi,
    locks: &DiscussionLocks,
    site_url: &str,
    request: &FeedbackRequest,
) -> Result<Option<String>, AppError> {
    if request.spurious_comment {
        info!("Spurious comment, ignoring");
        return Ok(None);
    }

    let path = normalize_path(&request.path);
    let title = create_title(&path);

    let discussion = {
        let _guard = locks.lock(&title).await;
        resolve_discussion(api, &path, &title, request).await?
    };

    if request.comment().is_some() && discussion.closed {
        info!("Discussion is closed, re-opening...");
        api.reopen_discussion(&discussion.id).await?;
        info!("... done!");
    }

    info!("Adding comment to discussion...");
    let comment = api
        .add_discussion_comment(&discussion.id, &create_comment_body(site_url, request))
        .await?;
    info!("... done! Added comment:\n{}\n{}", comment.url, comment.body);

    Ok(Some(comment.url))
}

async fn resolve_discussion(
    api: &dyn DiscussionApi,
    path: &str,
    title: &str,
    request: &FeedbackRequest,
) -> Result<Discussion, AppError> {
    match api.find_discussion(title).await? {
        Some(discussion) => {
            info!("Found discussion for {path}");
            record_vote(api, &discussion, request).await?;
            Ok(discussion)
        }
        None => create_discussion(api, path, title, request).await,
    }
}

async fn record_vote(
    api: &dyn DiscussionApi,
    discussion: &Discussion,
    request: &FeedbackRequest,
) -> Result<(), AppError> {
    let current_body = api.discussion_body(discussion.number).await?;
    let body = update_rating(&current_body, request.rating)?;

    info!("Updating discussion with new rating...");
    let updated_body = api.update_discussion_body(&discussion.id, &body).await?;
    info!("... done! Updated body:\n{updated_body}");

    Ok(())
}

async fn create_discussion(
    api: &dyn DiscussionApi,
    path: &str,
    title: &str,
    request: &FeedbackRequest,
) -> Result<Discussion, AppError> {
    info!("Creating new discussion for {path}...");
    let created = api
        .create_discussion(title, &create_discussion_body(request.rating))
        .await?;
    info!("... done! Added discussion:\n{}\n{}\n{}", created.url, created.title, created.body);

    Ok(created.into())
}
