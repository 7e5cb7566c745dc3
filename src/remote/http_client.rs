use std::sync::Mutex;

use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, Response};

use crate::error::FlowError;
use crate::model::{ClientConfig, Definitions, NodePath, TreeSnapshot};

use super::types::{AlterRequest, ErrorBody};
use super::{Alteration, ArtifactKind, CommandVerb, WorkflowClient};

fn with_retries<T>(mut f: impl FnMut() -> Result<T, FlowError>) -> Result<T, FlowError> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<FlowError> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            // Only transport trouble is worth retrying.
            Err(err @ FlowError::Connectivity { .. }) => {
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
            Err(err) => return Err(err),
        }
    }
    Err(last.unwrap_or_else(|| FlowError::Unexpected("retry loop ended without a result".into())))
}

/// Blocking JSON client for `flowtop-server`.
pub struct HttpWorkflowClient {
    endpoint: String,
    base_url: String,
    client: Client,
    working_copy: Mutex<Option<Definitions>>,
}

impl HttpWorkflowClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self, FlowError> {
        Self::with_base_url(cfg.endpoint(), cfg.base_url())
    }

    pub fn with_base_url(endpoint: String, base_url: String) -> Result<Self, FlowError> {
        let client = Client::builder()
            .user_agent("flowtop")
            .build()
            .map_err(|err| FlowError::connectivity("build http client", err.to_string()))?;
        Ok(Self {
            endpoint,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            working_copy: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `route` followed by the node's segments, each percent-encoded so a
    /// name holding `#`, `?` or spaces still addresses that node.
    fn node_url(&self, route: &[&str], path: &NodePath) -> Result<Url, FlowError> {
        let bad_base = |detail: String| {
            FlowError::connectivity(&format!("build url on {}", self.endpoint), detail)
        };
        let mut url = Url::parse(&self.base_url).map_err(|err| bad_base(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| bad_base(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(route.iter().copied().chain(path.segments()));
        Ok(url)
    }

    fn error_detail(resp: Response) -> String {
        let status = resp.status();
        resp.json::<ErrorBody>()
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string())
    }

    fn ensure_ok(&self, resp: Response, operation: &str) -> Result<Response, FlowError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(FlowError::connectivity(
            &format!("{} on {}", operation, self.endpoint),
            Self::error_detail(resp),
        ))
    }

    fn transport(&self, operation: &str, err: reqwest::Error) -> FlowError {
        FlowError::connectivity(&format!("{} on {}", operation, self.endpoint), err.to_string())
    }
}

impl WorkflowClient for HttpWorkflowClient {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn ping(&self) -> Result<(), FlowError> {
        with_retries(|| {
            let resp = self
                .client
                .get(self.url("/healthz"))
                .send()
                .map_err(|err| self.transport("ping server", err))?;
            self.ensure_ok(resp, "ping server")?;
            Ok(())
        })
    }

    fn sync(&self) -> Result<(), FlowError> {
        let defs: Definitions = with_retries(|| {
            let resp = self
                .client
                .get(self.url("/defs"))
                .send()
                .map_err(|err| self.transport("sync", err))?;
            self.ensure_ok(resp, "sync")?
                .json()
                .map_err(|err| self.transport("sync", err))
        })?;
        tracing::debug!(suites = defs.suites.len(), "synced definitions");
        *self
            .working_copy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(defs);
        Ok(())
    }

    fn fetch_definitions(&self) -> Result<TreeSnapshot, FlowError> {
        let guard = self
            .working_copy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(defs) => TreeSnapshot::from_definitions(defs),
            None => Err(FlowError::connectivity(
                "fetch definitions",
                "no local copy yet (sync first)",
            )),
        }
    }

    fn fetch_file(&self, path: &NodePath, kind: ArtifactKind) -> Result<String, FlowError> {
        let operation = format!("fetch {} for {}", kind, path);
        let url = self.node_url(&["files", kind.as_str()], path)?;
        with_retries(|| {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .map_err(|err| self.transport(&operation, err))?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Err(FlowError::ArtifactNotFound {
                    path: path.clone(),
                    kind,
                    message: Self::error_detail(resp),
                });
            }
            self.ensure_ok(resp, &operation)?
                .text()
                .map_err(|err| self.transport(&operation, err))
        })
    }

    fn mutate(&self, path: &NodePath, verb: CommandVerb) -> Result<(), FlowError> {
        let url = self.node_url(&["commands", verb.as_str()], path)?;
        let resp = self
            .client
            .post(url)
            .send()
            .map_err(|err| FlowError::command(path, verb.as_str(), err.to_string()))?;
        if !resp.status().is_success() {
            return Err(FlowError::command(
                path,
                verb.as_str(),
                Self::error_detail(resp),
            ));
        }
        Ok(())
    }

    fn alter(&self, path: &NodePath, alteration: &Alteration) -> Result<(), FlowError> {
        let action = alteration.action();
        let url = self.node_url(&["alter"], path)?;
        let resp = self
            .client
            .post(url)
            .json(&AlterRequest::from(alteration))
            .send()
            .map_err(|err| FlowError::command(path, &action, err.to_string()))?;
        if !resp.status().is_success() {
            return Err(FlowError::command(path, &action, Self::error_detail(resp)));
        }
        Ok(())
    }
}
