#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! shelf looks up book metadata by ISBN-13 and reconciles it into a single [`BookRecord`].
//!
//! Google Books is searched first. When it has no match, Open Library is searched and the other
//! ISBN-13s it lists for the same work are tried against Google Books in order. Whichever entry
//! is selected, the largest available cover is looked up and the record is normalized so that
//! it never carries empty fields.
//!
//! Google Books requires an API key, without one shelf works from Open Library alone. See
//! [`Config`].
//!
//! ```no_run
//! let config = shelf::Config::from_env(None);
//! let record = shelf::lookup("978-0735619678", &config)?;
//! println!("{}", record.title.unwrap_or_default());
//! # Ok::<(), shelf::Error>(())
//! ```

mod api;
pub mod config;
mod error;
pub mod isbn;
pub mod record;
mod reconcile;

pub use api::{Client, Fetcher, Response, RetryPolicy};
pub use config::{Config, Endpoints};
pub use error::{Error, ErrorKind};
pub use reconcile::Engine;
pub use record::{BookRecord, MatchQuality, Source};

use log::trace;

type HttpClient = reqwest::blocking::Client;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Creates the HTTP client used by [`lookup`].
///
/// # Errors
///
/// An [`ErrorKind::IO`] error when the TLS backend cannot be initialised.
pub fn http_client() -> Result<HttpClient, Error> {
    HttpClient::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::wrap(ErrorKind::IO, e))
}

/// Look up `isbn` with the default HTTP client.
///
/// Convenience for a one-off lookup, create an [`Engine`] to reuse the client across lookups.
///
/// # Errors
///
/// See [`Engine::reconcile`].
pub fn lookup(isbn: &str, config: &Config) -> Result<BookRecord, Error> {
    trace!("Lookup ISBN '{isbn}'");
    Engine::new(http_client()?, config.clone()).reconcile(isbn)
}
