//! Shared test double for the admin API.

use std::cell::RefCell;

use balestra::{AdminApi, ApiError, ApiResult, ConfigPath, Segment};
use serde_json::Value;

/// One recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Expected call without a body (GET, DELETE).
pub fn call(method: &'static str, path: &str) -> Call {
    Call {
        method,
        path: path.to_string(),
        body: None,
    }
}

/// Expected call carrying a JSON body.
pub fn call_with(method: &'static str, path: &str, body: Value) -> Call {
    Call {
        method,
        path: path.to_string(),
        body: Some(body),
    }
}

/// In-memory admin API with real traversal semantics and a recorded
/// call log, injected into the reconciler instead of a live server.
pub struct MockApi {
    document: RefCell<Value>,
    calls: RefCell<Vec<Call>>,
    dry_run: bool,
}

impl MockApi {
    pub fn new(document: Value) -> Self {
        Self {
            document: RefCell::new(document),
            calls: RefCell::new(Vec::new()),
            dry_run: false,
        }
    }

    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Snapshot of the stored document.
    pub fn document(&self) -> Value {
        self.document.borrow().clone()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the mutating calls made so far, in order.
    pub fn write_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|recorded| recorded.method != "GET")
            .cloned()
            .collect()
    }

    fn record(&self, method: &'static str, path: &ConfigPath, body: Option<&Value>) {
        self.calls.borrow_mut().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
    }
}

fn absent(path: &ConfigPath) -> ApiError {
    ApiError::PathAbsent {
        path: path.to_string(),
    }
}

fn remote(message: &str) -> ApiError {
    ApiError::RemoteStatus {
        status: 500,
        reason: "Internal Server Error".to_string(),
        message: message.to_string(),
    }
}

fn lookup<'a>(document: &'a Value, path: &ConfigPath) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.segments() {
        current = match segment {
            Segment::Name(name) => current.get(name.as_str())?,
            Segment::Index(index) => current.get(*index)?,
        };
    }
    Some(current)
}

fn lookup_mut<'a>(document: &'a mut Value, path: &ConfigPath) -> Option<&'a mut Value> {
    let mut current = document;
    for segment in path.segments() {
        current = match segment {
            Segment::Name(name) => current.get_mut(name.as_str())?,
            Segment::Index(index) => current.get_mut(*index)?,
        };
    }
    Some(current)
}

impl AdminApi for MockApi {
    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn config_get(&self, path: &ConfigPath) -> ApiResult<Option<Value>> {
        self.record("GET", path, None);
        Ok(lookup(&self.document.borrow(), path).cloned())
    }

    fn config_put(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.record("PUT", path, Some(content));
        if self.dry_run {
            return Ok(());
        }
        let mut document = self.document.borrow_mut();
        if path.is_empty() {
            *document = content.clone();
            return Ok(());
        }
        let parent = lookup_mut(&mut document, &path.prefix(path.len() - 1))
            .ok_or_else(|| absent(path))?;
        match (path.last().expect("non-root path"), parent) {
            (Segment::Name(name), Value::Object(map)) => {
                map.insert(name.clone(), content.clone());
                Ok(())
            }
            (Segment::Index(index), Value::Array(items)) if *index <= items.len() => {
                items.insert(*index, content.clone());
                Ok(())
            }
            _ => Err(remote("value does not fit into parent container")),
        }
    }

    fn config_post(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.record("POST", path, Some(content));
        if self.dry_run {
            return Ok(());
        }
        let mut document = self.document.borrow_mut();
        match lookup_mut(&mut document, path) {
            Some(Value::Array(items)) => {
                items.push(content.clone());
                Ok(())
            }
            Some(_) => Err(remote("POST target is not an array")),
            None => Err(absent(path)),
        }
    }

    fn config_patch(&self, path: &ConfigPath, content: &Value) -> ApiResult<()> {
        self.record("PATCH", path, Some(content));
        if self.dry_run {
            return Ok(());
        }
        let mut document = self.document.borrow_mut();
        match lookup_mut(&mut document, path) {
            Some(slot) => {
                *slot = content.clone();
                Ok(())
            }
            None => Err(absent(path)),
        }
    }

    fn config_delete(&self, path: &ConfigPath) -> ApiResult<()> {
        self.record("DELETE", path, None);
        if self.dry_run {
            return Ok(());
        }
        let mut document = self.document.borrow_mut();
        if path.is_empty() {
            *document = Value::Null;
            return Ok(());
        }
        let parent = lookup_mut(&mut document, &path.prefix(path.len() - 1))
            .ok_or_else(|| absent(path))?;
        match (path.last().expect("non-root path"), parent) {
            (Segment::Name(name), Value::Object(map)) => map
                .remove(name.as_str())
                .map(|_| ())
                .ok_or_else(|| absent(path)),
            (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
                items.remove(*index);
                Ok(())
            }
            _ => Err(absent(path)),
        }
    }

    fn load(&self, content: &Value) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call {
            method: "POST",
            path: "load".to_string(),
            body: Some(content.clone()),
        });
        if self.dry_run {
            return Ok(());
        }
        *self.document.borrow_mut() = content.clone();
        Ok(())
    }
}
