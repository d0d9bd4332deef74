use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::AdminApi;
use crate::create::ensure_ancestors;
use crate::error::ApiResult;
use crate::path::{ConfigPath, Segment};

/// Result of one reconciliation operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Whether the operation changed (or, in dry-run, would have
    /// changed) the running configuration.
    pub changed: bool,
    /// Configuration fetched by [`Reconciler::query`]; `null` when
    /// nothing is stored at the queried path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl Outcome {
    const fn unchanged() -> Self {
        Self {
            changed: false,
            config: None,
        }
    }

    const fn changed() -> Self {
        Self {
            changed: true,
            config: None,
        }
    }
}

/// Request to converge the configuration at a path toward a desired
/// value.
///
/// # Example
///
/// ```
/// use balestra::Apply;
///
/// let request = Apply::new("apps/http/servers/example", serde_json::json!({ "listen": [":443"] }))
///     .force()
///     .append();
///
/// assert!(request.force);
/// assert!(request.append);
/// assert!(request.create_path);
/// ```
#[derive(Debug, Clone)]
pub struct Apply {
    pub path: ConfigPath,
    pub content: Value,
    pub force: bool,
    pub append: bool,
    pub create_path: bool,
}

impl Apply {
    #[must_use]
    pub fn new(path: &str, content: Value) -> Self {
        Self {
            path: ConfigPath::parse(path),
            content,
            force: false,
            append: false,
            create_path: true,
        }
    }

    /// Push the configuration even when no change would be made.
    #[must_use]
    pub const fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Append to the array at the path (or insert, when the path ends
    /// in an index) instead of replacing it.
    #[must_use]
    pub const fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Do not create missing ancestor containers before writing.
    #[must_use]
    pub const fn no_create_path(mut self) -> Self {
        self.create_path = false;
        self
    }
}

/// Request to ensure absence of configuration at a path.
#[derive(Debug, Clone)]
pub struct Remove {
    pub path: ConfigPath,
    pub force: bool,
}

impl Remove {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: ConfigPath::parse(path),
            force: false,
        }
    }

    /// Issue the DELETE even when nothing is stored at the path.
    #[must_use]
    pub const fn force(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Request to replace the entire running configuration.
#[derive(Debug, Clone)]
pub struct Load {
    pub content: Value,
    pub force: bool,
}

impl Load {
    #[must_use]
    pub const fn new(content: Value) -> Self {
        Self {
            content,
            force: false,
        }
    }

    /// Push the configuration even when no change would be made.
    #[must_use]
    pub const fn force(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Drives the reconciliation operations against an injected
/// [`AdminApi`].
///
/// Every operation re-observes the server before deciding; nothing is
/// cached between calls, since the remote document may change between
/// invocations. Each operation is idempotent: re-running it against a
/// converged server reports `changed: false` and performs no write.
pub struct Reconciler<'a> {
    api: &'a dyn AdminApi,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub const fn new(api: &'a dyn AdminApi) -> Self {
        Self { api }
    }

    /// Converge the configuration at `request.path` toward
    /// `request.content`, issuing the minimal API call that gets there:
    ///
    /// - already equal (and not forced): nothing;
    /// - `append` to an index: PUT (insert at position);
    /// - `append` otherwise: POST (append to array);
    /// - value present: PATCH;
    /// - value absent: PUT (PATCH on a nonexistent path is invalid).
    ///
    /// Missing ancestors are created first unless
    /// [`Apply::no_create_path`] was set. In dry-run the divergence
    /// decision still runs but no write is issued.
    pub fn apply(&self, request: &Apply) -> ApiResult<Outcome> {
        let observed = self.api.config_get(&request.path)?;
        if observed.as_ref() == Some(&request.content) && !request.force {
            debug!(path = %request.path, "already converged");
            return Ok(Outcome::unchanged());
        }
        if self.api.is_dry_run() {
            info!(path = %request.path, "dry-run, configuration would change");
            return Ok(Outcome::changed());
        }

        if request.create_path {
            ensure_ancestors(self.api, &request.path)?;
        }
        if request.append && request.path.last().is_some_and(Segment::is_index) {
            self.api.config_put(&request.path, &request.content)?;
        } else if request.append {
            self.api.config_post(&request.path, &request.content)?;
        } else if observed.is_some() {
            self.api.config_patch(&request.path, &request.content)?;
        } else {
            self.api.config_put(&request.path, &request.content)?;
        }
        info!(path = %request.path, "configuration applied");
        Ok(Outcome::changed())
    }

    /// Ensure nothing is stored at `request.path`.
    pub fn remove(&self, request: &Remove) -> ApiResult<Outcome> {
        let observed = self.api.config_get(&request.path)?;
        if observed.is_none() && !request.force {
            debug!(path = %request.path, "already absent");
            return Ok(Outcome::unchanged());
        }
        if self.api.is_dry_run() {
            info!(path = %request.path, "dry-run, configuration would be removed");
        } else {
            self.api.config_delete(&request.path)?;
            info!(path = %request.path, "configuration removed");
        }
        Ok(Outcome::changed())
    }

    /// Fetch the configuration at `path`.
    ///
    /// Absence is a legitimate result for a pure read and comes back as
    /// `config: null`; connectivity and remote failures propagate.
    pub fn query(&self, path: &ConfigPath) -> ApiResult<Outcome> {
        let observed = self.api.config_get(path)?;
        Ok(Outcome {
            changed: false,
            config: Some(observed.unwrap_or(Value::Null)),
        })
    }

    /// Replace the entire running configuration via `/load`, comparing
    /// against the document root first.
    pub fn load(&self, request: &Load) -> ApiResult<Outcome> {
        let observed = self.api.config_get(&ConfigPath::root())?;
        if observed.as_ref() == Some(&request.content) && !request.force {
            debug!("running configuration already matches");
            return Ok(Outcome::unchanged());
        }
        if self.api.is_dry_run() {
            info!("dry-run, configuration would be loaded");
        } else {
            self.api.load(&request.content)?;
            info!("configuration loaded");
        }
        Ok(Outcome::changed())
    }
}
