pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The admin endpoint could not be reached at all. Always fatal,
    /// never retried.
    #[error("error accessing the Caddy API at {url}: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered non-2xx with a decoded error body.
    #[error("API request failed ({status} {reason}): {message}")]
    RemoteStatus {
        status: u16,
        reason: String,
        message: String,
    },

    /// The server reported an invalid traversal path, i.e. nothing is
    /// stored at the requested path. Expected during reconciliation and
    /// recovered by [`AdminApi::config_get`](crate::AdminApi::config_get);
    /// fatal everywhere else.
    #[error("no configuration at '{path}': invalid traversal path")]
    PathAbsent { path: String },
}

impl ApiError {
    /// Whether this error is the "nothing stored here" signal.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::PathAbsent { .. })
    }
}
