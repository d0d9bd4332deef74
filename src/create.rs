use serde_json::json;
use tracing::debug;

use crate::client::AdminApi;
use crate::error::ApiResult;
use crate::path::ConfigPath;

/// Create every missing ancestor container of `path`, shallowest
/// first.
///
/// Each strict prefix of `path` is probed with a GET and, when absent,
/// created with a PUT. The container type is decided by one-segment
/// lookahead: a prefix whose next segment is an array index is created
/// as `[]`, everything else as `{}`. For `a/b/0/c` that creates `a` as
/// `{}`, `a/b` as `[]`, and `a/b/0` as `{}`.
///
/// The final segment of `path` is never written; that is the caller's
/// job. Paths of zero or one segments need no ancestors, and a target
/// that already resolves exits early without any writes.
///
/// Creation failures are fatal. A half-created ancestor chain is left
/// as-is; the server remains the source of truth.
pub fn ensure_ancestors(api: &dyn AdminApi, path: &ConfigPath) -> ApiResult<()> {
    if path.len() < 2 {
        return Ok(());
    }
    if api.config_get(path)?.is_some() {
        return Ok(());
    }
    for depth in 1..path.len() {
        let prefix = path.prefix(depth);
        if api.config_get(&prefix)?.is_none() {
            let container = if path.segments()[depth].is_index() {
                json!([])
            } else {
                json!({})
            };
            debug!(path = %prefix, ?container, "creating missing ancestor");
            api.config_put(&prefix, &container)?;
        }
    }
    Ok(())
}
