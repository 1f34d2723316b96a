use std::{thread, time::Duration};

use log::{trace, warn};
use serde::de::DeserializeOwned;

use super::Client;
use crate::{Error, ErrorKind};

/// How many times a failed request is repeated, and how long to wait in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub retries: u32,
    /// Delay before retry `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that retries `retries` times without waiting.
    #[must_use]
    pub const fn immediate(retries: u32) -> Self {
        Self {
            retries,
            base_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(350),
        }
    }
}

/// GET requests with bounded retry, shared by every catalog client and the cover resolver.
///
/// A 4xx answer is terminal and fails on the first attempt. Transport errors and any other
/// non-success status are retried with the same URL until the [`RetryPolicy`] is exhausted, at
/// which point the last error is returned.
pub struct Fetcher<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: Client> Fetcher<C> {
    /// Creates a new [`Fetcher`] over `client`.
    pub const fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetches `url` and decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Status`] error for a 4xx answer or when retries run out on a non-success
    /// status, an [`ErrorKind::IO`] error when retries run out on transport failures and an
    /// [`ErrorKind::Deserialize`] error when the body is not the expected JSON.
    pub fn fetch_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let body = self.with_retry(url, || {
            let resp = self.client.get(url)?;
            if (200..300).contains(&resp.status) {
                Ok(resp.body)
            } else {
                Err(Error::status(resp.status, url))
            }
        })?;

        serde_json::from_str(&body).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }

    /// Probes `url`, a 200 answer is `true` and a 404 answer is `false`.
    ///
    /// # Errors
    ///
    /// Any other status is an error and is retried the same way as [`Fetcher::fetch_json`].
    pub fn probe(&self, url: &str) -> Result<bool, Error> {
        self.with_retry(url, || match self.client.status(url)? {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(Error::status(status, url)),
        })
    }

    fn with_retry<T, F>(&self, url: &str, mut attempt: F) -> Result<T, Error>
    where
        F: FnMut() -> Result<T, Error>,
    {
        let mut tries = 0;
        loop {
            trace!("GET {url} (attempt {})", tries + 1);
            match attempt() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && tries < self.policy.retries => {
                    tries += 1;
                    warn!(
                        "Request to {url} failed, retrying ({tries}/{}): {err}",
                        self.policy.retries
                    );
                    thread::sleep(self.policy.base_delay * tries);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{Fetcher, RetryPolicy};
    use crate::{
        api::{assert_url, MockClient, Reply},
        ErrorKind,
    };

    const URL: &str = "https://example.com/volumes/abc123";

    fn fetcher(client: &MockClient) -> Fetcher<&MockClient> {
        Fetcher::new(client, RetryPolicy::immediate(3))
    }

    #[test]
    fn client_error_fails_after_one_attempt() {
        let client = MockClient::new().route(URL, Reply::Status(404));
        let err = fetcher(&client)
            .fetch_json::<Value>(URL)
            .expect_err("404 is a client error");

        assert_eq!(ErrorKind::Status, err.kind());
        assert_eq!(Some(404), err.status_code());
        assert_eq!(1, client.count(URL));
    }

    #[test]
    fn server_error_is_retried_three_more_times() {
        let client = MockClient::new().route(URL, Reply::Status(503));
        let err = fetcher(&client)
            .fetch_json::<Value>(URL)
            .expect_err("503 on every attempt");

        assert_eq!(Some(503), err.status_code());
        assert_eq!(4, client.count(URL));
    }

    #[test]
    fn network_error_then_success_recovers() {
        let client = MockClient::new()
            .route(URL, Reply::NetworkError)
            .route(URL, Reply::Status(502))
            .route(URL, Reply::json(r#"{"id": "abc123"}"#));

        let value: Value = fetcher(&client).fetch_json(URL).unwrap();

        assert_eq!("abc123", value["id"]);
        assert_eq!(3, client.count(URL));
        assert_url!(client, URL);
    }

    #[test]
    fn exhausted_network_errors_surface_the_last_error() {
        let client = MockClient::new().route(URL, Reply::NetworkError);
        let err = fetcher(&client)
            .fetch_json::<Value>(URL)
            .expect_err("network is down");

        assert_eq!(ErrorKind::IO, err.kind());
        assert_eq!(4, client.count(URL));
    }

    #[test]
    fn invalid_json_is_not_retried() {
        let client = MockClient::new().route(URL, Reply::json("<html>"));
        let err = fetcher(&client)
            .fetch_json::<Value>(URL)
            .expect_err("body is not json");

        assert_eq!(ErrorKind::Deserialize, err.kind());
        assert_eq!(1, client.count(URL));
    }

    #[test]
    fn probe_treats_not_found_as_a_value() {
        let client = MockClient::new().route(URL, Reply::Status(200));
        assert!(fetcher(&client).probe(URL).unwrap());

        let client = MockClient::new();
        assert!(!fetcher(&client).probe(URL).unwrap());
        assert_eq!(1, client.count(URL));
    }

    #[test]
    fn probe_retries_server_errors() {
        let client = MockClient::new()
            .route(URL, Reply::Status(500))
            .route(URL, Reply::Status(200));

        assert!(fetcher(&client).probe(URL).unwrap());
        assert_eq!(2, client.count(URL));
    }
}
