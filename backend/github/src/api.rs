use async_trait::async_trait;
use tracing::info;

use crate::{
    error::QueryError,
    models::{Comment, CreatedDiscussion, Discussion, DiscussionPage},
};

/// Discussion operations used by the feedback pipeline.
#[async_trait]
pub trait DiscussionApi: Send + Sync {
    /// One page of the configured category, starting after `after`.
    async fn list_discussions(&self, after: Option<String>) -> Result<DiscussionPage, QueryError>;

    async fn discussion_body(&self, number: u64) -> Result<String, QueryError>;

    /// Replaces the body and returns it as stored.
    async fn update_discussion_body(&self, id: &str, body: &str) -> Result<String, QueryError>;

    /// Returns `closed` after the mutation.
    async fn reopen_discussion(&self, id: &str) -> Result<bool, QueryError>;

    async fn add_discussion_comment(&self, id: &str, body: &str) -> Result<Comment, QueryError>;

    async fn create_discussion(&self, title: &str, body: &str)
        -> Result<CreatedDiscussion, QueryError>;

    /// Linear scan over every page until a discussion titled exactly `title` shows up.
    async fn find_discussion(&self, title: &str) -> Result<Option<Discussion>, QueryError> {
        info!("Fetching discussions...");

        let mut after = None;
        loop {
            let page = self.list_discussions(after).await?;

            if let Some(found) = page.nodes.into_iter().find(|discussion| discussion.title == title) {
                info!("... done!");
                return Ok(Some(found));
            }

            after = if page.page_info.has_next_page {
                page.page_info.end_cursor
            } else {
                None
            };

            if after.is_none() {
                info!("... done!");
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{error::QueryFailure, models::PageInfo};

    struct PagedFake {
        pages: Vec<DiscussionPage>,
        requested: Mutex<Vec<Option<String>>>,
    }

    fn discussion(title: &str, number: u64) -> Discussion {
        Discussion {
            title: title.to_string(),
            id: format!("D_{number}"),
            number,
            closed: false,
        }
    }

    fn page(nodes: Vec<Discussion>, end_cursor: Option<&str>) -> DiscussionPage {
        DiscussionPage {
            nodes,
            page_info: PageInfo {
                has_next_page: end_cursor.is_some(),
                end_cursor: end_cursor.map(str::to_string),
            },
        }
    }

    #[async_trait]
    impl DiscussionApi for PagedFake {
        async fn list_discussions(&self, after: Option<String>) -> Result<DiscussionPage, QueryError> {
            let mut requested = self.requested.lock().unwrap();
            let index = requested.len();
            requested.push(after);

            self.pages.get(index).cloned().ok_or_else(|| {
                QueryError::new("GetDiscussions", json!({}), None, QueryFailure::NoData)
            })
        }

        async fn discussion_body(&self, _: u64) -> Result<String, QueryError> {
            unimplemented!()
        }

        async fn update_discussion_body(&self, _: &str, _: &str) -> Result<String, QueryError> {
            unimplemented!()
        }

        async fn reopen_discussion(&self, _: &str) -> Result<bool, QueryError> {
            unimplemented!()
        }

        async fn add_discussion_comment(&self, _: &str, _: &str) -> Result<Comment, QueryError> {
            unimplemented!()
        }

        async fn create_discussion(&self, _: &str, _: &str) -> Result<CreatedDiscussion, QueryError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_follows_cursor_to_later_page() {
        let fake = PagedFake {
            pages: vec![
                page(vec![discussion("a", 1), discussion("b", 2)], Some("c1")),
                page(vec![discussion("c", 3)], Some("c2")),
                page(vec![discussion("d", 4)], None),
            ],
            requested: Mutex::new(Vec::new()),
        };

        let found = fake.find_discussion("d").await.unwrap();

        assert_eq!(found.map(|d| d.number), Some(4));
        assert_eq!(
            *fake.requested.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_match() {
        let fake = PagedFake {
            pages: vec![
                page(vec![discussion("a", 1)], Some("c1")),
                page(vec![discussion("b", 2)], None),
            ],
            requested: Mutex::new(Vec::new()),
        };

        assert!(fake.find_discussion("a").await.unwrap().is_some());
        assert_eq!(fake.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_title_match_is_exact() {
        let fake = PagedFake {
            pages: vec![page(vec![discussion("Feedback for /a/b docs page ", 1)], None)],
            requested: Mutex::new(Vec::new()),
        };

        assert_eq!(fake.find_discussion("Feedback for /a/b docs page").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_propagates_page_failure() {
        let fake = PagedFake {
            pages: vec![page(vec![discussion("a", 1)], Some("c1"))],
            requested: Mutex::new(Vec::new()),
        };

        assert!(fake.find_discussion("missing").await.is_err());
    }
}
