//! Source client for the PokéAPI.
//!
//! A [`Source`] performs exactly one request per call and classifies the
//! outcome: a JSON body on 200, `None` on 404, and a fatal [`DexError`] for
//! everything else. There is no retry, backoff, or rate limiting; the
//! pipeline calls it sequentially, one id at a time.
//!
//! Two implementations are provided:
//!
//! | Type | Use |
//! |------|-----|
//! | [`HttpSource`] | Live requests via `reqwest::blocking` |
//! | [`MemorySource`] | Canned responses keyed by URL, for tests and offline replays |

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::DexError;

/// Resource collections the pipeline reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Item,
    Move,
    Machine,
    EvolutionChain,
}

impl ResourceKind {
    /// Path segment used by the API for this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Item => "item",
            ResourceKind::Move => "move",
            ResourceKind::Machine => "machine",
            ResourceKind::EvolutionChain => "evolution-chain",
        }
    }
}

/// Either a numeric id within a collection or a URL lifted from another
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Id { kind: ResourceKind, id: u32 },
    Url(String),
}

impl ResourceRef {
    pub fn id(kind: ResourceKind, id: u32) -> Self {
        ResourceRef::Id { kind, id }
    }

    /// Absolute URL for this reference. Embedded URLs are used verbatim.
    pub fn to_url(&self, base_url: &str) -> String {
        match self {
            ResourceRef::Id { kind, id } => {
                format!("{}/{}/{}/", base_url.trim_end_matches('/'), kind.as_str(), id)
            }
            ResourceRef::Url(url) => url.clone(),
        }
    }
}

pub trait Source {
    /// Base URL that numeric references are resolved against.
    fn base_url(&self) -> &str;

    /// Fetch one absolute URL. `Ok(None)` means the source reported 404.
    fn get(&self, url: &str) -> Result<Option<Value>, DexError>;

    fn fetch(&self, resource: &ResourceRef) -> Result<Option<Value>, DexError> {
        self.get(&resource.to_url(self.base_url()))
    }
}

/// Fetch a resource and decode it into a typed record.
pub fn fetch_as<T: DeserializeOwned>(
    source: &dyn Source,
    resource: &ResourceRef,
) -> Result<Option<T>, DexError> {
    let url = resource.to_url(source.base_url());
    match source.get(&url)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| DexError::Decode { url, source }),
        None => Ok(None),
    }
}

/// Live PokéAPI client.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut builder =
            reqwest::blocking::Client::builder().user_agent(config.user_agent.as_str());
        builder = if config.timeout_secs == 0 {
            builder.timeout(None::<Duration>)
        } else {
            builder.timeout(Duration::from_secs(config.timeout_secs))
        };

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Source for HttpSource {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> Result<Option<Value>, DexError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| DexError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| DexError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| DexError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

/// In-memory source keyed by absolute URL.
///
/// Unknown URLs answer 404. URLs registered with
/// [`fail_with`](MemorySource::fail_with) answer the given status. Every
/// requested URL is recorded in order.
pub struct MemorySource {
    base_url: String,
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            responses: HashMap::new(),
            failures: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn insert(&mut self, resource: &ResourceRef, body: Value) {
        let url = resource.to_url(&self.base_url);
        self.responses.insert(url, body);
    }

    pub fn fail_with(&mut self, resource: &ResourceRef, status: u16) {
        let url = resource.to_url(&self.base_url);
        self.failures.insert(url, status);
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Source for MemorySource {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> Result<Option<Value>, DexError> {
        self.requests.borrow_mut().push(url.to_string());
        if let Some(status) = self.failures.get(url) {
            return Err(DexError::Status {
                url: url.to_string(),
                status: *status,
            });
        }
        Ok(self.responses.get(url).cloned())
    }
}
