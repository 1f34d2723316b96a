//! The canonical book record produced by a lookup.
//!
//! A [`BookRecord`] is source agnostic: whichever catalog it was reconciled from, the same fields
//! carry the same meaning. Once [`normalize`]d every present field is non-empty, which is the
//! contract relied upon by whatever publishes the record downstream.

use serde::Serialize;
use serde_json::Value;

/// The catalog a record was reconciled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Google Books.
    Primary,
    /// Open Library.
    Secondary,
    /// Neither catalog knows the identifier.
    Unresolved,
}

impl Source {
    const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

/// How directly the record matches the supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    /// The catalog matched the identifier itself.
    Exact,
    /// Matched through another identifier of the same work.
    Nearest,
    /// No match at all.
    None,
}

impl MatchQuality {
    const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// The canonical description of a book.
///
/// `Unresolved` sources and `None` match qualities are the absent states of those fields and are
/// omitted when serialized, like every other absent field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Catalog the record came from.
    #[serde(skip_serializing_if = "Source::is_unresolved")]
    pub source: Source,
    /// Identifier of the record within [`BookRecord::source`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// See [`MatchQuality`].
    #[serde(skip_serializing_if = "MatchQuality::is_none")]
    pub match_quality: MatchQuality,
    /// Title, including the subtitle when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Authors joined by `", "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// URL of the largest cover available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// The identifier that was looked up, digits only.
    pub isbn13: String,
    /// Year of publication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    /// Number of pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// The upstream payload the record was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_detail: Option<Value>,
}

impl BookRecord {
    /// The placeholder for an identifier neither catalog knows about.
    #[must_use]
    pub fn unresolved(isbn13: String) -> Self {
        Self {
            title: Some(format!("Unidentified Book with ISBN: {isbn13}")),
            ..Self::empty(isbn13)
        }
    }

    pub(crate) const fn empty(isbn13: String) -> Self {
        Self {
            source: Source::Unresolved,
            source_id: None,
            match_quality: MatchQuality::None,
            title: None,
            author: None,
            cover_image_url: None,
            isbn13,
            publish_year: None,
            page_count: None,
            raw_detail: None,
        }
    }
}

/// Joins a title and an optional subtitle as `"<title>: <subtitle>"`.
///
/// ```
/// use shelf::record::build_title;
///
/// assert_eq!("Example: A Tale", build_title("Example", Some("A Tale")));
/// assert_eq!("Example", build_title("Example", Some("")));
/// assert_eq!("Example", build_title("Example", None));
/// ```
#[must_use]
pub fn build_title(title: &str, subtitle: Option<&str>) -> String {
    match subtitle {
        Some(subtitle) if !subtitle.is_empty() => format!("{title}: {subtitle}"),
        _ => title.to_owned(),
    }
}

/// Joins author names with `", "`, skipping blank names.
pub(crate) fn join_authors(authors: &[String]) -> String {
    authors
        .iter()
        .map(|author| author.trim())
        .filter(|author| !author.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drops every empty value from `record`.
///
/// Empty strings and a JSON `null` payload are treated exactly like missing values. Normalizing
/// an already normalized record returns it unchanged.
#[must_use]
pub fn normalize(record: BookRecord) -> BookRecord {
    #[inline]
    fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|s| !s.is_empty())
    }

    BookRecord {
        source_id: non_empty(record.source_id),
        title: non_empty(record.title),
        author: non_empty(record.author),
        cover_image_url: non_empty(record.cover_image_url),
        raw_detail: record.raw_detail.filter(|v| !v.is_null()),
        ..record
    }
}
