use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    api::DiscussionApi,
    error::{QueryError, QueryFailure},
    models::{
        ADD_DISCUSSION_COMMENT, AddDiscussionCommentData, Body, CREATE_DISCUSSION, Comment,
        CreateDiscussionData, CreatedDiscussion, DiscussionField, DiscussionPage,
        DiscussionsField, ENDPOINT, GET_DISCUSSION, GET_DISCUSSIONS, GraphQlError,
        REOPEN_DISCUSSION, RepositoryData, ReopenDiscussionData, UPDATE_DISCUSSION,
        USER_AGENT, UpdateDiscussionData,
    },
};

pub struct GitHubConfig {
    pub endpoint: String,
    pub token: String,
    pub owner: String,
    pub name: String,
    pub repository_id: String,
    pub category_id: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl GitHubConfig {
    /// Storybook's "Documentation feedback" category.
    pub fn storybook(token: String) -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            token,
            owner: "storybookjs".to_string(),
            name: "storybook".to_string(),
            repository_id: "MDEwOlJlcG9zaXRvcnk1NDE3MzU5Mw==".to_string(),
            category_id: "DIC_kwDOAzqfmc4CWGpo".to_string(),
            page_size: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    endpoint: String,
    authorization: String,
    owner: String,
    name: String,
    repository_id: String,
    category_id: String,
    page_size: u32,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            authorization: format!("bearer {}", config.token),
            owner: config.owner,
            name: config.name,
            repository_id: config.repository_id,
            category_id: config.category_id,
            page_size: config.page_size,
        })
    }

    /// Runs one query. Any transport failure, non-2xx status or non-empty
    /// `errors` list comes back as a [`QueryError`] holding the query, its
    /// variables and the raw response.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, QueryError> {
        let mut response_text = None;

        match self.execute(query, &variables, &mut response_text).await {
            Ok(data) => Ok(data),
            Err(failure) => Err(QueryError::new(query, variables, response_text, failure)),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
        response_text: &mut Option<String>,
    ) -> Result<T, QueryFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let text = response_text.insert(response.text().await?);

        if !status.is_success() {
            return Err(QueryFailure::Status(status));
        }

        decode_response(text)
    }
}

pub fn decode_response<T: DeserializeOwned>(text: &str) -> Result<T, QueryFailure> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        data: Option<Value>,
        errors: Option<Vec<GraphQlError>>,
    }

    let envelope: Envelope = serde_json::from_str(text)?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<&str> = errors.iter().map(|error| error.message.as_str()).collect();
        return Err(QueryFailure::GraphQl(messages.join("\n")));
    }

    match envelope.data {
        Some(Value::Null) | None => Err(QueryFailure::NoData),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}

#[async_trait]
impl DiscussionApi for GitHubClient {
    async fn list_discussions(&self, after: Option<String>) -> Result<DiscussionPage, QueryError> {
        debug!("Listing discussions after {after:?}");

        let data: RepositoryData<DiscussionsField> = self
            .query(
                GET_DISCUSSIONS,
                json!({
                    "owner": self.owner,
                    "name": self.name,
                    "first": self.page_size,
                    "after": after,
                    "categoryId": self.category_id,
                }),
            )
            .await?;

        Ok(data.repository.discussions)
    }

    async fn discussion_body(&self, number: u64) -> Result<String, QueryError> {
        let data: RepositoryData<DiscussionField<Body>> = self
            .query(
                GET_DISCUSSION,
                json!({
                    "owner": self.owner,
                    "name": self.name,
                    "number": number,
                }),
            )
            .await?;

        Ok(data.repository.discussion.body)
    }

    async fn update_discussion_body(&self, id: &str, body: &str) -> Result<String, QueryError> {
        let data: UpdateDiscussionData = self
            .query(UPDATE_DISCUSSION, json!({ "discussionId": id, "body": body }))
            .await?;

        Ok(data.update_discussion.discussion.body)
    }

    async fn reopen_discussion(&self, id: &str) -> Result<bool, QueryError> {
        let data: ReopenDiscussionData = self
            .query(REOPEN_DISCUSSION, json!({ "discussionId": id }))
            .await?;

        Ok(data.reopen_discussion.discussion.closed)
    }

    async fn add_discussion_comment(&self, id: &str, body: &str) -> Result<Comment, QueryError> {
        let data: AddDiscussionCommentData = self
            .query(ADD_DISCUSSION_COMMENT, json!({ "discussionId": id, "body": body }))
            .await?;

        Ok(data.add_discussion_comment.comment)
    }

    async fn create_discussion(
        &self,
        title: &str,
        body: &str,
    ) -> Result<CreatedDiscussion, QueryError> {
        let data: CreateDiscussionData = self
            .query(
                CREATE_DISCUSSION,
                json!({
                    "repositoryId": self.repository_id,
                    "categoryId": self.category_id,
                    "title": title,
                    "body": body,
                }),
            )
            .await?;

        Ok(data.create_discussion.discussion)
    }
}
