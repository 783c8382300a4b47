//! GitHub ProjectV2 source adapter.
//!
//! Fetches project-board items through the GitHub GraphQL API, following
//! cursor pagination until the server reports no further page. The client
//! carries a request timeout so a stuck fetch cannot wedge a poll cycle
//! indefinitely; retries are left to the next scheduled cycle.

use crate::tracker::domain::{
    ContentDetails, ContentState, FieldData, FieldValue, ProjectItem, ProjectItemContent,
    ProjectRef,
};
use crate::tracker::ports::{ProjectSource, SourceError, SourceResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;

/// GitHub GraphQL endpoint.
const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Page size for project item queries.
const PAGE_SIZE: u32 = 100;

/// Items query with inline fragments for the content union and the four
/// custom-field value types the tracker understands.
const ITEMS_QUERY: &str = r"
    query($org: String!, $project: Int!, $pageSize: Int!, $cursor: String) {
        organization(login: $org) {
            projectV2(number: $project) {
                items(first: $pageSize, after: $cursor) {
                    pageInfo { hasNextPage endCursor }
                    nodes {
                        createdAt
                        content {
                            __typename
                            ... on Issue {
                                number title state createdAt updatedAt
                                repository { nameWithOwner }
                                assignees(first: 50) { nodes { login } }
                            }
                            ... on PullRequest {
                                number title state createdAt updatedAt
                                repository { nameWithOwner }
                                assignees(first: 50) { nodes { login } }
                            }
                        }
                        fieldValues(first: 50) {
                            nodes {
                                __typename
                                ... on ProjectV2ItemFieldTextValue {
                                    text
                                    field { ... on ProjectV2FieldCommon { name } }
                                }
                                ... on ProjectV2ItemFieldDateValue {
                                    date
                                    field { ... on ProjectV2FieldCommon { name } }
                                }
                                ... on ProjectV2ItemFieldSingleSelectValue {
                                    name
                                    field { ... on ProjectV2FieldCommon { name } }
                                }
                                ... on ProjectV2ItemFieldNumberValue {
                                    number
                                    field { ... on ProjectV2FieldCommon { name } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

/// GraphQL-backed project source against the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubProjectSource {
    http: reqwest::Client,
    token: String,
}

impl GitHubProjectSource {
    /// Creates a source client with the given API token and request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(token: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("boardwatch")
            .build()
            .map_err(SourceError::transport)?;
        Ok(Self {
            http,
            token: token.into(),
        })
    }

    /// Fetches one page of project items.
    async fn fetch_page(
        &self,
        project: &ProjectRef,
        cursor: Option<&str>,
    ) -> SourceResult<ItemsPage> {
        let variables = serde_json::json!({
            "org": project.organization(),
            "project": project.number(),
            "pageSize": PAGE_SIZE,
            "cursor": cursor,
        });

        let response = self
            .http
            .post(GITHUB_GRAPHQL_URL)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "query": ITEMS_QUERY, "variables": variables }))
            .send()
            .await
            .map_err(SourceError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response.json().await.map_err(SourceError::decode)?;
        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_null()) {
            return Err(SourceError::Query(errors.to_string()));
        }

        envelope
            .data
            .and_then(|data| data.organization)
            .and_then(|organization| organization.project_v2)
            .map(|project_node| project_node.items)
            .ok_or_else(|| SourceError::Query(format!("project {project} not found")))
    }
}

#[async_trait]
impl ProjectSource for GitHubProjectSource {
    async fn fetch_all_items(&self, project: &ProjectRef) -> SourceResult<Vec<ProjectItem>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(project, cursor.as_deref()).await?;
            items.extend(page.nodes.into_iter().map(node_to_item));

            if !page.page_info.has_next_page {
                break;
            }
            match page.page_info.end_cursor {
                Some(next_cursor) => cursor = Some(next_cursor),
                // Server claimed another page but sent no cursor; stop
                // rather than refetch the same page forever.
                None => break,
            }
        }

        Ok(items)
    }
}

// -- GraphQL response deserialization helpers -------------------------------

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<PayloadData>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PayloadData {
    organization: Option<OrganizationNode>,
}

#[derive(Debug, Deserialize)]
struct OrganizationNode {
    #[serde(rename = "projectV2")]
    project_v2: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    items: ItemsPage,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    nodes: Vec<ItemNode>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemNode {
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    content: Option<ContentNode>,
    #[serde(rename = "fieldValues")]
    field_values: FieldValuesNode,
}

#[derive(Debug, Deserialize)]
struct FieldValuesNode {
    nodes: Vec<FieldValueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum ContentNode {
    Issue(ContentFields),
    PullRequest(ContentFields),
    DraftIssue,
}

#[derive(Debug, Deserialize)]
struct ContentFields {
    number: u64,
    title: String,
    state: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
    repository: RepositoryNode,
    assignees: AssigneeConnection,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    #[serde(rename = "nameWithOwner")]
    name_with_owner: String,
}

#[derive(Debug, Deserialize)]
struct AssigneeConnection {
    nodes: Vec<AssigneeNode>,
}

#[derive(Debug, Deserialize)]
struct AssigneeNode {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum FieldValueNode {
    ProjectV2ItemFieldTextValue {
        text: Option<String>,
        field: FieldRef,
    },
    ProjectV2ItemFieldDateValue {
        date: Option<NaiveDate>,
        field: FieldRef,
    },
    ProjectV2ItemFieldSingleSelectValue {
        name: Option<String>,
        field: FieldRef,
    },
    ProjectV2ItemFieldNumberValue {
        number: Option<f64>,
        field: FieldRef,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct FieldRef {
    name: String,
}

// -- Wire-to-domain conversion ----------------------------------------------

fn node_to_item(node: ItemNode) -> ProjectItem {
    ProjectItem {
        added_at: node.created_at,
        content: node.content.and_then(content_to_domain),
        fields: node
            .field_values
            .nodes
            .into_iter()
            .filter_map(field_to_domain)
            .collect(),
    }
}

fn content_to_domain(content: ContentNode) -> Option<ProjectItemContent> {
    match content {
        ContentNode::Issue(fields) => content_details(fields).map(ProjectItemContent::Issue),
        ContentNode::PullRequest(fields) => {
            content_details(fields).map(ProjectItemContent::PullRequest)
        }
        ContentNode::DraftIssue => Some(ProjectItemContent::Draft),
    }
}

/// Maps wire content fields into domain details.
///
/// An unrecognized state string drops the content, which the normalizer
/// then treats as "no task".
fn content_details(fields: ContentFields) -> Option<ContentDetails> {
    let state = parse_content_state(&fields.state)?;
    Some(ContentDetails {
        repository: fields.repository.name_with_owner,
        number: fields.number,
        title: fields.title,
        state,
        assignees: fields
            .assignees
            .nodes
            .into_iter()
            .map(|assignee| assignee.login)
            .collect(),
        created_at: fields.created_at,
        updated_at: fields.updated_at,
    })
}

fn parse_content_state(raw: &str) -> Option<ContentState> {
    match raw.to_ascii_lowercase().as_str() {
        "open" => Some(ContentState::Open),
        "closed" => Some(ContentState::Closed),
        "merged" => Some(ContentState::Merged),
        _ => None,
    }
}

fn field_to_domain(node: FieldValueNode) -> Option<FieldValue> {
    match node {
        FieldValueNode::ProjectV2ItemFieldTextValue { text, field } => text.map(|value| FieldValue {
            name: field.name,
            data: FieldData::Text(value),
        }),
        FieldValueNode::ProjectV2ItemFieldDateValue { date, field } => date.map(|value| FieldValue {
            name: field.name,
            data: FieldData::Date(value),
        }),
        FieldValueNode::ProjectV2ItemFieldSingleSelectValue { name, field } => {
            name.map(|value| FieldValue {
                name: field.name,
                data: FieldData::SingleSelect(value),
            })
        }
        FieldValueNode::ProjectV2ItemFieldNumberValue { number, field } => {
            number.map(|value| FieldValue {
                name: field.name,
                data: FieldData::Number(value),
            })
        }
        FieldValueNode::Unknown => None,
    }
}
