//! Configuration handed to the [`Engine`](crate::Engine) at construction time.

use log::{debug, trace};

use crate::api::{
    covers::COVERS_URL, google_books::GOOGLE_BOOKS_URL, open_library::OPEN_LIBRARY_SEARCH_URL,
    RetryPolicy,
};

/// Environment variable holding the Google Books API key.
pub const API_KEY_ENV: &str = "GOOGLE_BOOKS_API_KEY";

/// Base URLs of the services consulted during a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Google Books volumes endpoint, used for both search and detail requests.
    pub google_books: String,
    /// Open Library search endpoint.
    pub open_library: String,
    /// Open Library covers endpoint for ISBN lookups.
    pub covers: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_books: GOOGLE_BOOKS_URL.to_owned(),
            open_library: OPEN_LIBRARY_SEARCH_URL.to_owned(),
            covers: COVERS_URL.to_owned(),
        }
    }
}

/// Everything the engine needs to know about its environment.
///
/// Without a `primary_key` the Google Books catalog is never consulted and every lookup runs
/// against Open Library alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Google Books API key.
    pub primary_key: Option<String>,
    /// Where to send requests.
    pub endpoints: Endpoints,
    /// Retry behaviour of every request.
    pub retry: RetryPolicy,
}

impl Config {
    /// Creates a [`Config`] using the key resolved by [`resolve_key`] from the process
    /// environment and the `explicit` setting.
    #[must_use]
    pub fn from_env(explicit: Option<String>) -> Self {
        let env = std::env::var(API_KEY_ENV).ok();
        trace!("{API_KEY_ENV} is {}", if env.is_some() { "set" } else { "not set" });
        Self::with_key(resolve_key(env, explicit))
    }

    /// Creates a default [`Config`] with the given key.
    #[must_use]
    pub fn with_key(primary_key: Option<String>) -> Self {
        Self {
            primary_key,
            ..Self::default()
        }
    }

    /// The key to use for the primary catalog, if it is enabled.
    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Picks the API key: a non-empty environment value wins over a non-empty explicit setting.
///
/// ```
/// use shelf::config::resolve_key;
///
/// let key = resolve_key(Some("from-env".into()), Some("explicit".into()));
/// assert_eq!(Some("from-env".to_owned()), key);
///
/// let key = resolve_key(Some(String::new()), Some("explicit".into()));
/// assert_eq!(Some("explicit".to_owned()), key);
/// ```
#[must_use]
pub fn resolve_key(env: Option<String>, explicit: Option<String>) -> Option<String> {
    let key = env
        .filter(|key| !key.trim().is_empty())
        .or_else(|| explicit.filter(|key| !key.trim().is_empty()));

    if key.is_none() {
        debug!("No Google Books API key configured - only Open Library will be searched");
    }
    key
}
