use serde::Deserialize;

pub const ENDPOINT: &str = "https://api.github.com/graphql";
pub const USER_AGENT: &str = "storybook-bot";

pub const GET_DISCUSSIONS: &str = r#"
    query GetDiscussions($owner: String!, $name: String!, $first: Int!, $after: String, $categoryId: ID!) {
        repository(owner: $owner, name: $name) {
            discussions(first: $first, after: $after, categoryId: $categoryId) {
                nodes {
                    title
                    id
                    number
                    closed
                }
                pageInfo {
                    hasNextPage
                    endCursor
                }
            }
        }
    }
"#;

pub const GET_DISCUSSION: &str = r#"
    query GetDiscussion($owner: String!, $name: String!, $number: Int!) {
        repository(owner: $owner, name: $name) {
            discussion(number: $number) {
                body
            }
        }
    }
"#;

pub const UPDATE_DISCUSSION: &str = r#"
    mutation UpdateDiscussion($discussionId: ID!, $body: String!) {
        updateDiscussion(input: {
            discussionId: $discussionId,
            body: $body,
        }) {
            discussion {
                body
            }
        }
    }
"#;

pub const REOPEN_DISCUSSION: &str = r#"
    mutation ReopenDiscussion($discussionId: ID!) {
        reopenDiscussion(input: {
            discussionId: $discussionId
        }) {
            discussion {
                closed
            }
        }
    }
"#;

pub const ADD_DISCUSSION_COMMENT: &str = r#"
    mutation AddDiscussionComment($discussionId: ID!, $body: String!) {
        addDiscussionComment(input: {
            discussionId: $discussionId,
            body: $body,
        }) {
            comment {
                body
                url
            }
        }
    }
"#;

pub const CREATE_DISCUSSION: &str = r#"
    mutation CreateDiscussion($repositoryId: ID!, $categoryId: ID!, $title: String!, $body: String!) {
        createDiscussion(input: {
            repositoryId: $repositoryId,
            categoryId: $categoryId,
            title: $title,
            body: $body
        }) {
            discussion {
                title
                id
                number
                closed
                body
                url
            }
        }
    }
"#;

#[derive(Deserialize, Debug)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct RepositoryData<T> {
    pub repository: T,
}

#[derive(Deserialize, Debug)]
pub struct DiscussionsField {
    pub discussions: DiscussionPage,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPage {
    pub nodes: Vec<Discussion>,
    pub page_info: PageInfo,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Listing node. `id` is opaque and only ever handed back to mutations.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    pub title: String,
    pub id: String,
    pub number: u64,
    pub closed: bool,
}

#[derive(Deserialize, Debug)]
pub struct DiscussionField<T> {
    pub discussion: T,
}

#[derive(Deserialize, Debug)]
pub struct Body {
    pub body: String,
}

#[derive(Deserialize, Debug)]
pub struct Closed {
    pub closed: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiscussionData {
    pub update_discussion: DiscussionField<Body>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReopenDiscussionData {
    pub reopen_discussion: DiscussionField<Closed>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub body: String,
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub struct CommentField {
    pub comment: Comment,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddDiscussionCommentData {
    pub add_discussion_comment: CommentField,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedDiscussion {
    pub title: String,
    pub id: String,
    pub number: u64,
    pub closed: bool,
    pub body: String,
    pub url: String,
}

impl From<CreatedDiscussion> for Discussion {
    fn from(created: CreatedDiscussion) -> Self {
        Self {
            title: created.title,
            id: created.id,
            number: created.number,
            closed: created.closed,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionData {
    pub create_discussion: DiscussionField<CreatedDiscussion>,
}
