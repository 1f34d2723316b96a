use log::{info, trace, warn};

use super::{Client, Fetcher};

pub(crate) const COVERS_URL: &str = "https://covers.openlibrary.org/b/isbn";

/// Cover sizes offered by the covers service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CoverSize {
    Large,
    Medium,
    Small,
}

impl CoverSize {
    /// Largest first.
    pub(crate) const LADDER: [Self; 3] = [Self::Large, Self::Medium, Self::Small];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Large => "L",
            Self::Medium => "M",
            Self::Small => "S",
        }
    }
}

macro_rules! cover_url {
    ($base: expr, $isbn: expr, $size: expr) => {
        format!("{}/{}-{}.jpg", $base, $isbn, $size.as_str())
    };
}

/// Finds the largest cover available for `isbn`.
///
/// Each size is probed with `?default=false` so that the service answers 404 rather than a
/// placeholder image. The returned URL never carries that query string. Errors while probing are
/// logged and count as a missing size, so this never fails.
pub(crate) fn resolve_cover<C: Client>(
    fetcher: &Fetcher<C>,
    base: &str,
    isbn: &str,
) -> Option<String> {
    for size in CoverSize::LADDER {
        let url = cover_url!(base, isbn, size);
        let probe = format!("{url}?default=false");

        match fetcher.probe(&probe) {
            Ok(true) => {
                info!("Found {size:?} cover for ISBN '{isbn}'");
                return Some(url);
            }
            Ok(false) => trace!("No {size:?} cover for ISBN '{isbn}'"),
            Err(err) => warn!("Ignoring cover probe failure for {url}: {err}"),
        }
    }

    info!("No cover found for ISBN '{isbn}'");
    None
}
