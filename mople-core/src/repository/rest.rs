//! REST client for the Mople API.
//!
//! Every request carries the stored bearer token (when signed in). Failures
//! are folded into `FetchError`:
//!
//! - connect failures and timeouts → `Network`
//! - non-2xx responses and undecodable bodies → `Server`
//! - 404 on a delete → `Application` (the resource is already gone)

use async_trait::async_trait;
use mople_paging::{FetchError, Page, PageSource};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::envelope::PageEnvelope;
use super::{CommentApi, MeetingApi, PlanApi, Result};
use crate::config::AppConfig;
use crate::model::{
    Comment, CommentDraft, CommentId, Meeting, MeetingDraft, MeetingId, Notification, Participant,
    Plan, PlanDraft, PlanId, PostId, Review,
};
use crate::storage::PreferenceStore;

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        FetchError::network(err.to_string())
    } else if err.is_decode() || err.is_body() {
        FetchError::server(None, format!("malformed response: {}", err))
    } else {
        FetchError::server(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

/// Map a non-2xx status. A delete of something that no longer exists is an
/// application-level condition, not a server failure.
fn status_error(status: StatusCode, detail: String, is_delete: bool) -> FetchError {
    if is_delete && status == StatusCode::NOT_FOUND {
        FetchError::application(detail)
    } else {
        FetchError::server(Some(status.as_u16()), detail)
    }
}

// ---------------------------------------------------------------------------
// RestClient
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    prefs: Arc<dyn PreferenceStore>,
}

impl RestClient {
    pub fn new(config: &AppConfig, prefs: Arc<dyn PreferenceStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            prefs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.prefs.access_token() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                log::warn!("Could not read access token: {}", e);
                builder
            }
        }
    }

    async fn execute(&self, builder: RequestBuilder, is_delete: bool) -> Result<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        log::warn!("Request failed with {}: {}", status, detail);
        Err(status_error(status, detail, is_delete))
    }

    async fn call<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, false)
            .await?
            .json::<R>()
            .await
            .map_err(transport_error)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path), true)
            .await
            .map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Page sources
    // -----------------------------------------------------------------------

    pub fn page_source<T>(&self, path: impl Into<String>) -> RemotePageSource<T> {
        RemotePageSource {
            client: self.clone(),
            path: path.into(),
            query: Vec::new(),
            _item: PhantomData,
        }
    }

    /// Meetings the signed-in user belongs to.
    pub fn meetings(&self) -> RemotePageSource<Meeting> {
        self.page_source("meetings")
    }

    pub fn plans(&self, meeting_id: MeetingId) -> RemotePageSource<Plan> {
        self.page_source(format!("meetings/{}/plans", meeting_id))
    }

    pub fn reviews(&self, meeting_id: MeetingId) -> RemotePageSource<Review> {
        self.page_source(format!("meetings/{}/reviews", meeting_id))
    }

    pub fn comments(&self, post_id: PostId) -> RemotePageSource<Comment> {
        self.page_source(format!("posts/{}/comments", post_id))
    }

    pub fn notifications(&self) -> RemotePageSource<Notification> {
        self.page_source("notifications")
    }

    pub fn participants(&self, meeting_id: MeetingId) -> RemotePageSource<Participant> {
        self.page_source(format!("meetings/{}/members", meeting_id))
    }

    pub fn participant_search(
        &self,
        meeting_id: MeetingId,
        keyword: &str,
    ) -> RemotePageSource<Participant> {
        self.page_source(format!("meetings/{}/members/search", meeting_id))
            .with_query("keyword", keyword)
    }
}

// ---------------------------------------------------------------------------
// RemotePageSource
// ---------------------------------------------------------------------------

/// `GET {base}/{path}?cursor=&size=` decoded through `PageEnvelope`.
pub struct RemotePageSource<T> {
    client: RestClient,
    path: String,
    query: Vec<(String, String)>,
    _item: PhantomData<fn() -> T>,
}

impl<T> RemotePageSource<T> {
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<T> PageSource<T> for RemotePageSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, cursor: Option<String>, size: usize) -> Result<Page<T>> {
        let mut builder = self
            .client
            .request(Method::GET, &self.path)
            .query(&[("size", size.to_string())])
            .query(&self.query);
        if let Some(cursor) = cursor {
            builder = builder.query(&[("cursor", cursor)]);
        }
        let envelope = self
            .client
            .execute(builder, false)
            .await?
            .json::<PageEnvelope<T>>()
            .await
            .map_err(transport_error)?;
        Ok(envelope.into())
    }
}

// ---------------------------------------------------------------------------
// Mutation endpoints
// ---------------------------------------------------------------------------

#[async_trait]
impl MeetingApi for RestClient {
    async fn create_meeting(&self, draft: &MeetingDraft) -> Result<Meeting> {
        self.call(Method::POST, "meetings", Some(draft)).await
    }

    async fn update_meeting(&self, id: MeetingId, draft: &MeetingDraft) -> Result<Meeting> {
        self.call(Method::PATCH, &format!("meetings/{}", id), Some(draft))
            .await
    }

    async fn leave_meeting(&self, id: MeetingId) -> Result<()> {
        self.delete(&format!("meetings/{}/members/me", id)).await
    }
}

#[async_trait]
impl PlanApi for RestClient {
    async fn create_plan(&self, draft: &PlanDraft) -> Result<Plan> {
        self.call(Method::POST, "plans", Some(draft)).await
    }

    async fn update_plan(&self, id: PlanId, draft: &PlanDraft) -> Result<Plan> {
        self.call(Method::PATCH, &format!("plans/{}", id), Some(draft))
            .await
    }

    async fn delete_plan(&self, id: PlanId) -> Result<()> {
        self.delete(&format!("plans/{}", id)).await
    }

    async fn set_participation(&self, id: PlanId, join: bool) -> Result<Plan> {
        let method = if join { Method::POST } else { Method::DELETE };
        self.call::<(), _>(method, &format!("plans/{}/participants/me", id), None)
            .await
    }
}

#[async_trait]
impl CommentApi for RestClient {
    async fn create_comment(&self, post_id: PostId, draft: &CommentDraft) -> Result<Comment> {
        self.call(Method::POST, &format!("posts/{}/comments", post_id), Some(draft))
            .await
    }

    async fn update_comment(&self, id: CommentId, draft: &CommentDraft) -> Result<Comment> {
        self.call(Method::PATCH, &format!("comments/{}", id), Some(draft))
            .await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        self.delete(&format!("comments/{}", id)).await
    }

    async fn toggle_like(&self, id: CommentId) -> Result<Comment> {
        self.call::<(), _>(Method::POST, &format!("comments/{}/likes", id), None)
            .await
    }
}
