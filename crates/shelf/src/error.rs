pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when reconciling a book record.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    status: Option<u16>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The error is associated with an underlying transport error.
    IO,
    /// The upstream service answered with a non-success HTTP status.
    Status,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// The identifier or configuration supplied by the caller cannot be used.
    InvalidInput,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            status: None,
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            status: None,
            source: Some(source.into()),
        }
    }

    /// Creates an [`ErrorKind::Status`] error for the HTTP `status` returned by `url`.
    pub fn status<S: Into<String>>(status: u16, url: S) -> Self {
        Self {
            kind: ErrorKind::Status,
            message: Some(url.into()),
            status: Some(status),
            source: None,
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code attached to this error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Client errors (400-499) are never retried.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status, Some(400..=499))
    }

    /// Whether another attempt of the same request could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ErrorKind::IO => true,
            ErrorKind::Status => !self.is_client_error(),
            ErrorKind::Deserialize | ErrorKind::InvalidInput => false,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Status => f.write_str("Status error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::InvalidInput => f.write_str("Invalid input error")?,
        };

        if let Some(status) = self.status {
            write!(f, ": {status}")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn status_error_displays_code_and_url() {
        let err = Error::status(404, "https://example.com/volumes/abc");
        assert_eq!(
            "Status error: 404: https://example.com/volumes/abc",
            err.to_string()
        );
        assert_eq!(Some(404), err.status_code());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!Error::status(400, "").is_transient());
        assert!(!Error::status(499, "").is_transient());
        assert!(Error::status(503, "").is_transient());
        assert!(Error::new(ErrorKind::IO, "Network error").is_transient());
        assert!(!Error::new(ErrorKind::Deserialize, "bad json").is_transient());
    }
}
