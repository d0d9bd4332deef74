use reqwest::Method;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::path::ConfigPath;

/// Default address of the Caddy admin endpoint.
pub const DEFAULT_ADDR: &str = "http://localhost:2019";

/// Marker the server embeds in its error body when nothing is stored at
/// the requested path. Matched as a substring for compatibility with
/// the admin API's undocumented error schema.
const TRAVERSAL_MARKER: &str = "invalid traversal path at";

/// Operations of the Caddy admin API, as consumed by the reconciler.
///
/// [`AdminClient`] is the wire implementation; tests inject in-memory
/// doubles instead of talking to a server.
pub trait AdminApi {
    /// Whether mutating calls are suppressed (dry-run).
    fn is_dry_run(&self) -> bool;

    /// Fetch the configuration stored at `path`.
    ///
    /// Returns `Ok(None)` when the server reports an invalid traversal
    /// path, i.e. nothing is stored there. Any other failure is fatal.
    /// An observed JSON `null` is `Some(Value::Null)`, distinct from
    /// absence.
    fn config_get(&self, path: &ConfigPath) -> ApiResult<Option<Value>>;

    /// Create or replace the value at `path`. Targeting an array index
    /// inserts at that position.
    fn config_put(&self, path: &ConfigPath, content: &Value) -> ApiResult<()>;

    /// Append `content` to the array at `path`.
    fn config_post(&self, path: &ConfigPath, content: &Value) -> ApiResult<()>;

    /// Replace the existing value at `path`. Invalid if nothing is
    /// stored there.
    fn config_patch(&self, path: &ConfigPath, content: &Value) -> ApiResult<()>;

    /// Remove the value at `path`.
    fn config_delete(&self, path: &ConfigPath) -> ApiResult<()>;

    /// Replace the entire running configuration via the `/load`
    /// endpoint.
    fn load(&self, content: &Value) -> ApiResult<()>;
}

/// Blocking HTTP client for the admin API.
///
/// # Example
///
/// ```
/// use balestra::AdminClient;
///
/// let client = AdminClient::new("localhost:2019").dry_run(true);
///
/// assert_eq!(client.addr(), "http://localhost:2019");
/// ```
pub struct AdminClient {
    addr: String,
    dry_run: bool,
    http: Client,
}

impl AdminClient {
    /// Build a client for the admin endpoint at `addr`.
    ///
    /// Caddy serves its admin endpoint over plain HTTP by default, so a
    /// bare `host:port` is assumed to be `http://`.
    #[must_use]
    pub fn new(addr: &str) -> Self {
        let addr = if addr.starts_with("http") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        Self {
            addr: addr.trim_end_matches('/').to_string(),
            dry_run: false,
            http: Client::new(),
        }
    }

    /// Suppress every mutating request; reads still hit the server.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// The normalized base address this client talks to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Issue one request against `<addr>/<endpoint>` and classify the
    /// response.
    ///
    /// A 2xx response with an empty or non-JSON body yields `Ok(None)`:
    /// successful writes legitimately return nothing. A non-2xx
    /// response is decoded as `{"error": ...}` and mapped to
    /// [`ApiError::PathAbsent`] or [`ApiError::RemoteStatus`].
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> ApiResult<Option<Value>> {
        let url = format!("{}/{}", self.addr, endpoint);
        if self.dry_run && method != Method::GET {
            debug!(%method, %url, "dry-run, skipping mutating request");
            return Ok(None);
        }
        debug!(%method, %url, "admin API request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().map_err(|source| ApiError::Connectivity {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().map_err(|source| ApiError::Connectivity {
                url: url.clone(),
                source,
            })?;
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(decoded) => decoded.error,
                Err(_) => text.trim().to_string(),
            };
            if message.contains(TRAVERSAL_MARKER) {
                let path = endpoint.strip_prefix("config/").unwrap_or(endpoint);
                return Err(ApiError::PathAbsent {
                    path: path.to_string(),
                });
            }
            return Err(ApiError::RemoteStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                message,
            });
        }

        // Empty and non-JSON success bodies both mean "no value".
        Ok(response.json().ok())
    }
}

impl AdminApi for AdminClient {
    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn config_get(&self, path: &ConfigPath) -> ApiResult<Option<Value>> {
        match self.request(Method::GET, &config_endpoint(path), None) {
            Err(error) if error.is_absent() => Ok(None),
            other => other,
        }
    }

    fn config_put(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.request(Method::PUT, &config_endpoint(path), Some(content))?;
        Ok(())
    }

    fn config_post(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.request(Method::POST, &config_endpoint(path), Some(content))?;
        Ok(())
    }

    fn config_patch(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.request(Method::PATCH, &config_endpoint(path), Some(content))?;
        Ok(())
    }

    fn config_delete(&self, path: &ConfigPath) -> ApiResult<()> {
        self.request(Method::DELETE, &config_endpoint(path), None)?;
        Ok(())
    }

    fn load(&self, content: &Value) -> ApiResult<()> {
        self.request(Method::POST, "load", Some(content))?;
        Ok(())
    }
}

fn config_endpoint(path: &ConfigPath) -> String {
    format!("config/{path}")
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_addr_gets_http_scheme() {
        assert_eq!(
            AdminClient::new("localhost:2019").addr(),
            "http://localhost:2019"
        );
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(
            AdminClient::new("https://caddy.internal:2019/").addr(),
            "https://caddy.internal:2019"
        );
    }

    #[test]
    fn config_endpoint_for_root() {
        assert_eq!(config_endpoint(&ConfigPath::root()), "config/");
    }

    #[test]
    fn config_endpoint_for_nested_path() {
        assert_eq!(
            config_endpoint(&ConfigPath::parse("apps/http/servers/0")),
            "config/apps/http/servers/0"
        );
    }
}
