use log::{info, trace};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, ErrorKind};

use super::{Catalog, Client, Fetcher};

pub(crate) const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// The primary catalog, every request is signed with an API key.
pub(crate) struct GoogleBooks<'a, C> {
    fetcher: &'a Fetcher<C>,
    base: &'a str,
    key: &'a str,
}

impl<'a, C: Client> GoogleBooks<'a, C> {
    pub(crate) const fn new(fetcher: &'a Fetcher<C>, base: &'a str, key: &'a str) -> Self {
        Self { fetcher, base, key }
    }

    /// Builds `<base><path>?<params>&key=<key>` with every query value form encoded.
    fn signed_url(&self, path: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let params = params.iter().copied().chain([("key", self.key)]);
        Url::parse_with_params(&format!("{}{path}", self.base), params)
            .map(String::from)
            .map_err(|e| Error::wrap(ErrorKind::InvalidInput, e))
    }

    /// Retrieves the full volume for an id previously returned by [`Catalog::search`].
    pub(crate) fn fetch_detail(&self, id: &str) -> Result<Volume, Error> {
        info!("Fetching volume '{id}' from Google Books");
        let url = self.signed_url(&format!("/{id}"), &[])?;

        let raw: Value = self.fetcher.fetch_json(&url)?;
        let VolumeModel { volume_info } = serde_json::from_value(raw.clone())
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

        Ok(Volume {
            id: id.to_owned(),
            info: volume_info,
            raw,
        })
    }
}

impl<C: Client> Catalog for GoogleBooks<'_, C> {
    /// The volume id of the first item.
    type Candidate = String;

    fn name(&self) -> &'static str {
        "Google Books"
    }

    fn search(&self, isbn: &str) -> Result<Option<String>, Error> {
        info!("Searching for ISBN '{isbn}' using Google Books API");
        let query = format!("isbn:{isbn}");
        let url = self.signed_url("", &[("q", query.as_str())])?;

        let SearchModel { items } = self.fetcher.fetch_json(&url)?;

        trace!("Request was successful, {} item(s) found", items.len());

        // only the first item is ever considered
        Ok(items.into_iter().next().map(|item| item.id))
    }
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SearchModel {
    // absent when `totalItems` is 0
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    id: String,
}

#[derive(Deserialize)]
struct VolumeModel {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Books API
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    #[serde(default)]
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    #[serde(default)]
    pub(crate) authors: Vec<String>,
    pub(crate) page_count: Option<u32>,
    pub(crate) published_date: Option<String>,
}

/// A full volume together with the payload it was decoded from.
#[derive(Debug)]
pub(crate) struct Volume {
    pub(crate) id: String,
    pub(crate) info: VolumeInfo,
    pub(crate) raw: Value,
}

impl VolumeInfo {
    /// First four characters of `publishedDate` as a year, e.g. "2004-09-01" or "2004".
    pub(crate) fn publish_year(&self) -> Option<i32> {
        self.published_date
            .as_deref()
            .map(|date| date.chars().take(4).collect::<String>())
            .and_then(|year| year.parse().ok())
    }
}
