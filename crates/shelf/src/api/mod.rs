pub(crate) mod covers;
pub(crate) mod fetch;
pub(crate) mod google_books;
pub(crate) mod open_library;

pub use fetch::{Fetcher, RetryPolicy};

use crate::{Error, ErrorKind};

/// A single HTTP exchange as seen by the [`Fetcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Body decoded as text.
    pub body: String,
}

/// The transport seam underneath the [`Fetcher`].
///
/// Implementations only fail for transport problems; any HTTP status, including errors, is
/// reported back as a value so that the [`Fetcher`] can decide whether to retry.
pub trait Client {
    /// Performs a GET request and reads the whole body.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the request could not be completed.
    fn get(&self, url: &str) -> Result<Response, Error>;

    /// Performs a GET request and only reports the status code, the body is discarded.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the request could not be completed.
    fn status(&self, url: &str) -> Result<u16, Error>;
}

impl Client for reqwest::blocking::Client {
    fn get(&self, url: &str) -> Result<Response, Error> {
        let resp = reqwest::blocking::Client::get(self, url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        Ok(Response { status, body })
    }

    fn status(&self, url: &str) -> Result<u16, Error> {
        reqwest::blocking::Client::get(self, url)
            .send()
            .map(|r| r.status().as_u16())
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
    }
}

impl<C: Client + ?Sized> Client for &C {
    fn get(&self, url: &str) -> Result<Response, Error> {
        (**self).get(url)
    }

    fn status(&self, url: &str) -> Result<u16, Error> {
        (**self).status(url)
    }
}

/// A book catalog that can be searched by ISBN-13.
///
/// Only the first candidate of a search is ever returned, catalogs never rank results.
pub(crate) trait Catalog {
    /// What a successful search yields.
    type Candidate;

    /// The display name of the catalog, used in logs.
    fn name(&self) -> &'static str;

    /// Searches the catalog, `Ok(None)` is a miss and not an error.
    fn search(&self, isbn: &str) -> Result<Option<Self::Candidate>, Error>;
}

#[cfg(test)]
pub(crate) use test::{assert_url, MockClient, Reply};

#[cfg(test)]
mod test {
    use std::{
        cell::RefCell,
        collections::{HashMap, VecDeque},
    };

    use super::{Client, Response};
    use crate::{Error, ErrorKind};

    /// Asserts that the last URL requested through a [`MockClient`] matches the expected one.
    ///
    /// The [`MockClient`] records every URL that is passed to it, this allows for asserting
    /// that implementing functions or methods are building the correct URL.
    ///
    /// This macro provides a shortcut alternative to the following:
    ///
    /// ```ignore
    /// let url = client.calls().pop().unwrap_or_default();
    /// assert_eq!("expected url here", url);
    /// ```
    macro_rules! assert_url {
        ($client: expr, $expected: expr) => {
            assert_url!($client, $expected, "");
        };
        ($client: expr, $expected: expr, $($arg: tt)+) => {
            let url = $client.calls().pop().unwrap_or_default();
            assert_eq!($expected, url, $($arg)+);
        };
    }

    /// A canned answer for a routed URL.
    #[derive(Clone, Debug)]
    pub(crate) enum Reply {
        Json(String),
        Status(u16),
        NetworkError,
    }

    impl Reply {
        pub(crate) fn json<S: Into<String>>(body: S) -> Self {
            Self::Json(body.into())
        }
    }

    /// A [`Client`] which answers from a routing table keyed by the exact URL.
    ///
    /// Each route holds a queue of replies; the last reply of a queue is repeated for any further
    /// request. URLs without a route answer with a 404.
    #[derive(Default)]
    pub(crate) struct MockClient {
        routes: RefCell<HashMap<String, VecDeque<Reply>>>,
        calls: RefCell<Vec<String>>,
    }

    impl MockClient {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn route<S: Into<String>>(self, url: S, reply: Reply) -> Self {
            self.routes
                .borrow_mut()
                .entry(url.into())
                .or_default()
                .push_back(reply);
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub(crate) fn count(&self, url: &str) -> usize {
            self.calls.borrow().iter().filter(|u| *u == url).count()
        }

        fn reply(&self, url: &str) -> Reply {
            self.calls.borrow_mut().push(url.to_owned());

            let mut routes = self.routes.borrow_mut();
            match routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Status(404)),
                Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
                None => Reply::Status(404),
            }
        }
    }

    impl Client for MockClient {
        fn get(&self, url: &str) -> Result<Response, Error> {
            match self.reply(url) {
                Reply::Json(body) => Ok(Response { status: 200, body }),
                Reply::Status(status) => Ok(Response {
                    status,
                    body: String::new(),
                }),
                Reply::NetworkError => Err(Error::new(ErrorKind::IO, "Network error")),
            }
        }

        fn status(&self, url: &str) -> Result<u16, Error> {
            self.get(url).map(|r| r.status)
        }
    }

    pub(crate) use assert_url;
}
