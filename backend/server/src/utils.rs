use axum::http::HeaderMap;
use regex::{NoExpand, Regex};
use thiserror::Error;

use crate::models::{FeedbackRequest, Rating};

const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("No {0} rating marker in discussion body")]
    MissingMarker(&'static str),

    #[error("Rating count {0:?} is not a valid number")]
    InvalidCount(String),

    #[error("Invalid rating pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Keeps the last two `/` segments, so versioned and framework-specific URLs
/// of the same page share one discussion.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let tail = &segments[segments.len().saturating_sub(2)..];

    format!("/{}", tail.join("/"))
}

pub fn create_title(path: &str) -> String {
    format!("Feedback for {path} docs page")
}

pub fn create_rating(rating: Rating, value: &str) -> String {
    let kind = rating.as_str();
    format!("<!--start-{kind}-->{value}<!--end-{kind}-->")
}

pub fn create_discussion_body(rating: Rating) -> String {
    let count = |kind: Rating| if kind == rating { "1" } else { "0" };

    [
        format!("| {} | {} |", Rating::Up.symbol(), Rating::Down.symbol()),
        "| :-: | :-: |".to_string(),
        format!(
            "| {} | {} |",
            create_rating(Rating::Up, count(Rating::Up)),
            create_rating(Rating::Down, count(Rating::Down))
        ),
    ]
    .join("\r\n")
}

/// Increments the marker for `rating` by one. The other marker is left as is.
pub fn update_rating(body: &str, rating: Rating) -> Result<String, TallyError> {
    let regex = Regex::new(&create_rating(rating, r"(\d+)"))?;

    let captures = regex
        .captures(body)
        .ok_or(TallyError::MissingMarker(rating.as_str()))?;

    let current = &captures[1];
    let next = current
        .parse::<u64>()
        .ok()
        .and_then(|count| count.checked_add(1))
        .ok_or_else(|| TallyError::InvalidCount(current.to_string()))?;

    let replacement = create_rating(rating, &next.to_string());
    Ok(regex.replacen(body, 1, NoExpand(&replacement)).into_owned())
}

/// Reads `(up, down)` back out of a discussion body.
pub fn read_tally(body: &str) -> Result<(u64, u64), TallyError> {
    let read = |rating: Rating| -> Result<u64, TallyError> {
        let regex = Regex::new(&create_rating(rating, r"(\d+)"))?;
        let captures = regex
            .captures(body)
            .ok_or(TallyError::MissingMarker(rating.as_str()))?;

        captures[1]
            .parse()
            .map_err(|_| TallyError::InvalidCount(captures[1].to_string()))
    };

    Ok((read(Rating::Up)?, read(Rating::Down)?))
}

/// Link to the page as submitted, a meta table, then the comment if there is one.
pub fn create_comment_body(site_url: &str, request: &FeedbackRequest) -> String {
    let path = &request.path;
    let link = format!("**[{path}]({site_url}{path})**");

    let meta = [
        format!(
            "| {} | v{} | {} | {} |",
            request.rating.symbol(),
            request.version,
            request.framework,
            request.code_language
        ),
        "| - | - | - | - |".to_string(),
    ]
    .join("\r\n");

    [Some(link.as_str()), Some(meta.as_str()), request.comment()]
        .into_iter()
        .flatten()
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\r\n\r\n")
}

/// Configured header first, then the first `x-forwarded-for` hop.
pub fn client_identifier(headers: &HeaderMap, header: &str) -> String {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    };

    value(header)
        .or_else(|| value("x-forwarded-for"))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
