//! Configuration reconciler for the Caddy admin API.
//!
//! [Repository](https://github.com/LeakIX/balestra) |
//! [Online docs](https://leakix.github.io/balestra/balestra/) |
//! [crates.io](https://crates.io/crates/balestra)
//!
//! Balestra reads a desired configuration fragment, compares it
//! against what a Caddy server is currently running at a given path,
//! and issues the minimal admin-API call needed to converge the two.
//! No templating, no server restarts, no blind overwrites.
//!
//! The name is Italian for *crossbow*: aim a configuration at any
//! running Caddy server and let fly.
//!
//! # Overview
//!
//! A reconciliation is driven by a [`Reconciler`] that wires together:
//!
//! - An [`AdminApi`] transport (the wire implementation is
//!   [`AdminClient`]) issuing verbed requests against
//!   `<addr>/config/<path>`
//! - A [`ConfigPath`] value type addressing one node of the running
//!   JSON document, where all-digit segments are array indices
//! - Request builders ([`Apply`], [`Remove`], [`Load`]) describing the
//!   desired state
//!
//! # Architecture
//!
//! Every operation follows the same observe-decide-act model:
//!
//! 1. **Observe** - fetch the value currently stored at the target
//!    path; "nothing stored here" is an expected answer, not a failure
//! 2. **Decide** - deep structural comparison of observed and desired
//!    values; equal means done, report `changed: false`
//! 3. **Act** - create missing ancestor containers shallowest-first
//!    ([`ensure_ancestors`]), then issue the one verb that converges
//!    the path (PUT, POST, or PATCH), or DELETE for removal
//!
//! Under `--dry-run` steps 1 and 2 run in full and step 3 is skipped,
//! so the reported `changed` flag is exact. The whole crate is
//! synchronous and blocking: one bounded sequence of round trips per
//! operation, no caching between operations, no retries.
//!
//! # Examples
//!
//! ## Converge one HTTP server
//!
//! ```rust,no_run
//! use balestra::{AdminClient, Apply, Reconciler};
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = AdminClient::new("localhost:2019");
//!     let reconciler = Reconciler::new(&client);
//!
//!     let outcome = reconciler.apply(&Apply::new(
//!         "apps/http/servers/example",
//!         serde_json::json!({
//!             "listen": [":443"],
//!             "routes": [{
//!                 "handle": [{
//!                     "handler": "static_response",
//!                     "body": "Hello, world!"
//!                 }]
//!             }]
//!         }),
//!     ))?;
//!
//!     println!("changed: {}", outcome.changed);
//!     Ok(())
//! }
//! ```
//!
//! ## Append a route without replacing the others
//!
//! ```rust,no_run
//! use balestra::{AdminClient, Apply, Reconciler};
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = AdminClient::new("localhost:2019");
//!     let reconciler = Reconciler::new(&client);
//!
//!     reconciler.apply(
//!         &Apply::new(
//!             "apps/http/servers/example/routes",
//!             serde_json::json!({ "handle": [{ "handler": "file_server" }] }),
//!         )
//!         .append(),
//!     )?;
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// reconciliation tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod client;
pub mod create;
pub mod error;
pub mod path;
pub mod reconcile;

pub use client::AdminApi;
pub use client::AdminClient;
pub use client::DEFAULT_ADDR;
pub use create::ensure_ancestors;
pub use error::ApiError;
pub use error::ApiResult;
pub use path::ConfigPath;
pub use path::Segment;
pub use reconcile::Apply;
pub use reconcile::Load;
pub use reconcile::Outcome;
pub use reconcile::Reconciler;
pub use reconcile::Remove;
