//! The lookup, fallback and cross-reference workflow.

use log::{debug, info};

use crate::{
    api::{
        covers,
        google_books::{GoogleBooks, Volume},
        open_library::{OpenLibrary, Work},
        Catalog, Client, Fetcher,
    },
    config::Config,
    isbn,
    record::{self, BookRecord, MatchQuality, Source},
    Error,
};

/// Reconciles an ISBN-13 across Google Books and Open Library into one [`BookRecord`].
///
/// Each call to [`Engine::reconcile`] is independent; the engine holds no state between lookups
/// beyond its configuration and client.
pub struct Engine<C> {
    fetcher: Fetcher<C>,
    config: Config,
}

/// Progress of a single reconciliation.
#[derive(Debug, Default)]
struct LookupAttempt {
    tried: Vec<Source>,
    alternates: Vec<String>,
    cursor: usize,
}

impl LookupAttempt {
    fn tried(&mut self, source: Source) {
        if !self.tried.contains(&source) {
            self.tried.push(source);
        }
    }

    /// The next alternate identifier to probe against the primary catalog.
    fn next_alternate(&mut self) -> Option<&str> {
        let alternate = self.alternates.get(self.cursor)?;
        self.cursor += 1;
        Some(alternate)
    }
}

/// The catalog entry the record will be built from.
enum Selection<'a, C> {
    Primary {
        catalog: GoogleBooks<'a, C>,
        id: String,
        quality: MatchQuality,
    },
    Secondary(Work),
    Unresolved,
}

impl<C: Client> Engine<C> {
    /// Creates a new [`Engine`] sending its requests through `client`.
    pub fn new(client: C, config: Config) -> Self {
        let fetcher = Fetcher::new(client, config.retry);
        Self { fetcher, config }
    }

    /// The configuration this engine was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up `isbn` and returns the normalized record.
    ///
    /// Punctuation in `isbn` is ignored. An identifier unknown to both catalogs is not an error,
    /// it produces the [`BookRecord::unresolved`] placeholder.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::InvalidInput`](crate::ErrorKind::InvalidInput) error when `isbn` has no
    /// digits. Any request to a catalog that fails, after retries where allowed, aborts the
    /// lookup with that error. Cover failures never surface here.
    pub fn reconcile(&self, isbn: &str) -> Result<BookRecord, Error> {
        let isbn = isbn::normalize(isbn)?;
        let mut attempt = LookupAttempt::default();

        let selection = self.select(&isbn, &mut attempt)?;
        debug!("Sources tried for ISBN '{isbn}': {:?}", attempt.tried);

        let record = match selection {
            Selection::Unresolved => {
                info!("ISBN '{isbn}' is unknown to every catalog");
                return Ok(record::normalize(BookRecord::unresolved(isbn)));
            }
            Selection::Primary {
                catalog,
                id,
                quality,
            } => from_volume(isbn, catalog.fetch_detail(&id)?, quality),
            Selection::Secondary(work) => from_work(isbn, work),
        };

        let cover_image_url =
            covers::resolve_cover(&self.fetcher, &self.config.endpoints.covers, &record.isbn13);

        Ok(record::normalize(BookRecord {
            cover_image_url,
            ..record
        }))
    }

    fn select(
        &self,
        isbn: &str,
        attempt: &mut LookupAttempt,
    ) -> Result<Selection<'_, C>, Error> {
        if let Some(hit) = self.search_primary(isbn, MatchQuality::Exact, attempt)? {
            return Ok(hit);
        }

        let secondary = OpenLibrary::new(&self.fetcher, &self.config.endpoints.open_library);
        attempt.tried(Source::Secondary);
        let work = match secondary.search(isbn)? {
            Some(work) => work,
            None => return Ok(Selection::Unresolved),
        };

        attempt.alternates = work.doc.alternate_isbns();
        debug!(
            "{} lists {} alternate ISBN-13(s) for '{isbn}'",
            secondary.name(),
            attempt.alternates.len()
        );

        // stop at the first alternate the primary catalog knows, never look for a better one
        while let Some(alternate) = attempt.next_alternate().map(str::to_owned) {
            if let Some(hit) = self.search_primary(&alternate, MatchQuality::Nearest, attempt)? {
                info!("ISBN '{isbn}' matched through alternate ISBN '{alternate}'");
                return Ok(hit);
            }
        }

        Ok(Selection::Secondary(work))
    }

    /// Searches the primary catalog, a disabled catalog always misses.
    fn search_primary(
        &self,
        isbn: &str,
        quality: MatchQuality,
        attempt: &mut LookupAttempt,
    ) -> Result<Option<Selection<'_, C>>, Error> {
        let catalog = match self.primary() {
            Some(catalog) => catalog,
            None => {
                debug!("Primary catalog disabled, skipping search for '{isbn}'");
                return Ok(None);
            }
        };

        attempt.tried(Source::Primary);
        let hit = catalog.search(isbn)?;
        Ok(hit.map(|id| Selection::Primary {
            catalog,
            id,
            quality,
        }))
    }

    fn primary(&self) -> Option<GoogleBooks<'_, C>> {
        self.config
            .primary_key()
            .map(|key| GoogleBooks::new(&self.fetcher, &self.config.endpoints.google_books, key))
    }
}

fn from_volume(isbn: String, volume: Volume, quality: MatchQuality) -> BookRecord {
    let Volume { id, info, raw } = volume;
    let publish_year = info.publish_year();

    BookRecord {
        source: Source::Primary,
        source_id: Some(id),
        match_quality: quality,
        title: Some(record::build_title(&info.title, info.subtitle.as_deref())),
        author: Some(record::join_authors(&info.authors)),
        publish_year,
        page_count: info.page_count,
        raw_detail: Some(raw),
        ..BookRecord::empty(isbn)
    }
}

fn from_work(isbn: String, work: Work) -> BookRecord {
    let Work { doc, raw } = work;

    BookRecord {
        source: Source::Secondary,
        match_quality: MatchQuality::Exact,
        title: Some(record::build_title(&doc.title, doc.subtitle.as_deref())),
        author: Some(record::join_authors(&doc.author_name)),
        publish_year: doc.first_publish_year,
        page_count: doc.number_of_pages_median,
        source_id: Some(doc.key),
        raw_detail: Some(raw),
        ..BookRecord::empty(isbn)
    }
}
