//! HTTP client for an Apache Atlas metadata catalog.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::payload::{BulkResponse, EntityResponse};

/// HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size used when enumerating entities by type.
const SEARCH_PAGE_SIZE: usize = 100;

/// Basic-auth credentials.
#[derive(Clone)]
pub struct AtlasCredentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for AtlasCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Blocking client for the Atlas v2 REST API.
///
/// No retries are performed; a failed request fails the call.
#[derive(Debug, Clone)]
pub struct AtlasClient {
    client: Client,
    base_url: String,
    credentials: Option<AtlasCredentials>,
}

impl AtlasClient {
    /// Create a new client for the catalog at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<AtlasCredentials>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CatalogError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|err| CatalogError::InvalidUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })
    }

    fn url_with_params<'a>(
        &self,
        path: &str,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Url> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.user, Some(&creds.password)),
            None => request,
        }
    }

    fn send(&self, url: Url, not_found_id: Option<&str>) -> Result<Response> {
        debug!(%url, "catalog request");
        let response = self
            .authorized(self.client.get(url.clone()))
            .send()
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = not_found_id {
                return Err(CatalogError::NotFound { id: id.to_string() });
            }
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().to_string();
        response
            .json()
            .map_err(|source| CatalogError::Decode { url, source })
    }
}

impl Catalog for AtlasClient {
    fn get_entity(&self, guid: &str) -> Result<EntityResponse> {
        let url = self.url(&format!("/api/atlas/v2/entity/guid/{guid}"))?;
        let response: EntityResponse = Self::decode(self.send(url, Some(guid))?)?;
        if response.entity.is_none() {
            return Err(CatalogError::NotFound { id: guid.to_string() });
        }
        Ok(response)
    }

    fn get_bulk_entities(&self, guids: &[String]) -> Result<BulkResponse> {
        let url = self.url_with_params(
            "/api/atlas/v2/entity/bulk",
            guids.iter().map(|g| ("guid", g.as_str())),
        )?;
        Self::decode(self.send(url, None)?)
    }

    fn search_guids(&self, type_name: &str) -> Result<Vec<String>> {
        let limit = SEARCH_PAGE_SIZE.to_string();
        collect_pages(SEARCH_PAGE_SIZE, |offset| {
            let offset = offset.to_string();
            let url = self.url_with_params(
                "/api/atlas/v2/search/basic",
                [
                    ("typeName", type_name),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ],
            )?;
            let page: BulkResponse = Self::decode(self.send(url, None)?)?;
            Ok(page.entities.into_iter().map(|e| e.guid).collect())
        })
    }
}

/// Pages through a search until a short page, or a page that adds nothing
/// new, ends it. `fetch` receives the number of guids collected so far.
fn collect_pages<F>(page_size: usize, mut fetch: F) -> Result<Vec<String>>
where
    F: FnMut(usize) -> Result<Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut guids = Vec::new();
    loop {
        let page = fetch(guids.len())?;
        let count = page.len();
        let before = guids.len();
        for guid in page {
            if seen.insert(guid.clone()) {
                guids.push(guid);
            }
        }
        if count < page_size || guids.len() == before {
            break;
        }
    }
    Ok(guids)
}
