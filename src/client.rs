use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::{BugtrackError, Result};
use crate::store::BugStore;
use crate::types::{BugReport, BugStatus, Developer, NewBug};

pub struct BugtrackClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl BugtrackClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|source| BugtrackError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(BugtrackError::InvalidUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(Self {
            http: Client::new(),
            base_url: parsed,
            token,
        })
    }

    /// Base URL with each segment appended, percent-encoded as a path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "sending request");

        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        debug!(status = status.as_u16(), "request failed");
        Err(BugtrackError::Api {
            status: status.as_u16(),
            message: response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string()),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send(self.request(Method::GET, segments)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, segments).json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T> {
        let request = self.request(Method::PUT, segments);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        self.send(request).await
    }
}

#[async_trait]
impl BugStore for BugtrackClient {
    async fn list_bugs(&self) -> Result<Vec<BugReport>> {
        self.get(&["bugs"]).await
    }

    async fn create_bug(&self, bug: &NewBug) -> Result<BugReport> {
        self.post(&["bugs"], bug).await
    }

    async fn update_status(&self, bug_id: &str, status: BugStatus) -> Result<BugReport> {
        self.put(&["bugs", bug_id], Some(&json!({ "status": status })))
            .await
    }

    async fn approve(&self, bug_id: &str) -> Result<BugReport> {
        self.put::<(), _>(&["bugs", bug_id, "approve"], None).await
    }

    async fn assign(&self, bug_id: &str, developer_id: &str) -> Result<BugReport> {
        self.put(
            &["bugs", bug_id, "assign"],
            Some(&json!({ "developerId": developer_id })),
        )
        .await
    }

    async fn list_developers(&self) -> Result<Vec<Developer>> {
        self.get(&["users", "developers"]).await
    }
}
