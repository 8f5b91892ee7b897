//! In-memory discussion store that records every call made against it.
use std::sync::Mutex;

use async_trait::async_trait;
use github::{
    Comment, CreatedDiscussion, Discussion, DiscussionApi, DiscussionPage, PageInfo, QueryError,
    QueryFailure,
};
use serde_json::json;

use crate::{
    models::{FeedbackRequest, Rating},
    utils::{create_rating, read_tally},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Option<String>),
    Body(u64),
    Update { id: String, body: String },
    Reopen(String),
    Comment { id: String, body: String },
    Create { title: String, body: String },
}

#[derive(Default)]
pub struct FakeApi {
    pub fail_on: Option<&'static str>,
    /// Listing page size; everything comes back in one page when unset.
    pub page_size: Option<usize>,
    discussions: Mutex<Vec<(Discussion, String)>>,
    calls: Mutex<Vec<Call>>,
}

pub fn feedback(path: &str, rating: Rating, comment: Option<&str>) -> FeedbackRequest {
    FeedbackRequest {
        path: path.to_string(),
        rating,
        comment: comment.map(str::to_string),
        version: "7.6".to_string(),
        framework: "react".to_string(),
        code_language: "ts".to_string(),
        spurious_comment: false,
    }
}

impl FakeApi {
    pub fn with_discussion(title: &str, up: u64, down: u64, closed: bool) -> Self {
        let api = Self::default();
        let body = format!(
            "| 👍 | 👎 |\r\n| :-: | :-: |\r\n| {} | {} |",
            create_rating(Rating::Up, &up.to_string()),
            create_rating(Rating::Down, &down.to_string())
        );
        api.insert(title, &body, closed);
        api
    }

    pub fn insert(&self, title: &str, body: &str, closed: bool) {
        let mut discussions = self.discussions.lock().unwrap();
        let number = discussions.len() as u64 + 1;

        discussions.push((
            Discussion {
                title: title.to_string(),
                id: format!("D_{number}"),
                number,
                closed,
            },
            body.to_string(),
        ));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tally(&self, title: &str) -> Option<(u64, u64)> {
        self.discussions
            .lock()
            .unwrap()
            .iter()
            .find(|(discussion, _)| discussion.title == title)
            .and_then(|(_, body)| read_tally(body).ok())
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), QueryError> {
        self.calls.lock().unwrap().push(call);

        if self.fail_on == Some(operation) {
            return Err(QueryError::new(
                operation,
                json!({}),
                Some(r#"{"errors":[{"message":"Something went wrong"}]}"#.to_string()),
                QueryFailure::GraphQl("Something went wrong".to_string()),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl DiscussionApi for FakeApi {
    async fn list_discussions(&self, after: Option<String>) -> Result<DiscussionPage, QueryError> {
        self.record("list", Call::List(after.clone()))?;
        tokio::task::yield_now().await;

        let discussions = self.discussions.lock().unwrap();
        let start = after
            .and_then(|cursor| cursor.strip_prefix("cursor-")?.parse().ok())
            .unwrap_or(0);
        let end = self
            .page_size
            .map_or(discussions.len(), |size| (start + size).min(discussions.len()));

        let nodes = discussions[start.min(end)..end]
            .iter()
            .map(|(discussion, _)| discussion.clone())
            .collect();
        let has_next_page = end < discussions.len();

        Ok(DiscussionPage {
            nodes,
            page_info: PageInfo {
                has_next_page,
                end_cursor: has_next_page.then(|| format!("cursor-{end}")),
            },
        })
    }

    async fn discussion_body(&self, number: u64) -> Result<String, QueryError> {
        self.record("body", Call::Body(number))?;
        tokio::task::yield_now().await;

        let discussions = self.discussions.lock().unwrap();
        let body = discussions
            .iter()
            .find(|(discussion, _)| discussion.number == number)
            .map(|(_, body)| body.clone())
            .unwrap_or_default();

        Ok(body)
    }

    async fn update_discussion_body(&self, id: &str, body: &str) -> Result<String, QueryError> {
        self.record(
            "update",
            Call::Update {
                id: id.to_string(),
                body: body.to_string(),
            },
        )?;

        let mut discussions = self.discussions.lock().unwrap();
        if let Some((_, stored)) = discussions.iter_mut().find(|(discussion, _)| discussion.id == id) {
            *stored = body.to_string();
        }

        Ok(body.to_string())
    }

    async fn reopen_discussion(&self, id: &str) -> Result<bool, QueryError> {
        self.record("reopen", Call::Reopen(id.to_string()))?;

        let mut discussions = self.discussions.lock().unwrap();
        if let Some((discussion, _)) = discussions.iter_mut().find(|(discussion, _)| discussion.id == id) {
            discussion.closed = false;
        }

        Ok(false)
    }

    async fn add_discussion_comment(&self, id: &str, body: &str) -> Result<Comment, QueryError> {
        self.record(
            "comment",
            Call::Comment {
                id: id.to_string(),
                body: body.to_string(),
            },
        )?;

        let count = self.calls.lock().unwrap().len();
        Ok(Comment {
            body: body.to_string(),
            url: format!("https://github.com/storybookjs/storybook/discussions/{id}#discussioncomment-{count}"),
        })
    }

    async fn create_discussion(
        &self,
        title: &str,
        body: &str,
    ) -> Result<CreatedDiscussion, QueryError> {
        self.record(
            "create",
            Call::Create {
                title: title.to_string(),
                body: body.to_string(),
            },
        )?;

        self.insert(title, body, false);
        let (discussion, _) = self
            .discussions
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap();

        Ok(CreatedDiscussion {
            url: format!("https://github.com/storybookjs/storybook/discussions/{}", discussion.number),
            title: discussion.title,
            id: discussion.id,
            number: discussion.number,
            closed: discussion.closed,
            body: body.to_string(),
        })
    }
}
