use log::{info, trace};
use serde::Deserialize;
use serde_json::Value;

use crate::{isbn, Error, ErrorKind};

use super::{Catalog, Client, Fetcher};

pub(crate) const OPEN_LIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// The secondary catalog, needs no credentials.
pub(crate) struct OpenLibrary<'a, C> {
    fetcher: &'a Fetcher<C>,
    base: &'a str,
}

impl<'a, C: Client> OpenLibrary<'a, C> {
    pub(crate) const fn new(fetcher: &'a Fetcher<C>, base: &'a str) -> Self {
        Self { fetcher, base }
    }
}

impl<C: Client> Catalog for OpenLibrary<'_, C> {
    type Candidate = Work;

    fn name(&self) -> &'static str {
        "Open Library"
    }

    fn search(&self, isbn: &str) -> Result<Option<Work>, Error> {
        info!("Searching for ISBN '{isbn}' using Open Library");
        let url = format!("{}?q={isbn}", self.base);

        let SearchModel { docs } = self.fetcher.fetch_json(&url)?;

        trace!("Request was successful, {} doc(s) found", docs.len());

        docs.into_iter().next().map(Work::try_from).transpose()
    }
}

#[derive(Deserialize)]
struct SearchModel {
    #[serde(default)]
    docs: Vec<Value>,
}

/// A search document describing a work in Open Library.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct Doc {
    pub(crate) key: String,
    #[serde(default)]
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    #[serde(default)]
    pub(crate) author_name: Vec<String>,
    pub(crate) number_of_pages_median: Option<u32>,
    pub(crate) first_publish_year: Option<i32>,
    #[serde(default)]
    isbn: Vec<String>,
}

/// The first search document together with the payload it was decoded from.
#[derive(Debug)]
pub(crate) struct Work {
    pub(crate) doc: Doc,
    pub(crate) raw: Value,
}

impl TryFrom<Value> for Work {
    type Error = Error;

    fn try_from(raw: Value) -> Result<Self, Error> {
        let doc = Doc::deserialize(&raw).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;
        Ok(Self { doc, raw })
    }
}

impl Doc {
    /// Other ISBN-13s of the same work, in the order the catalog lists them.
    ///
    /// ISBN-10s and malformed identifiers are dropped.
    pub(crate) fn alternate_isbns(&self) -> Vec<String> {
        self.isbn
            .iter()
            .filter(|candidate| isbn::is_isbn13(candidate))
            .cloned()
            .collect()
    }
}
