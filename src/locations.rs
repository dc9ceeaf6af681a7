//! Resource location resolution
//!
//! A WSDL document can be named by a file path, a URL, or handed over as
//! in-memory text.

use std::fmt;
use std::path::PathBuf;

use url::Url;

/// Where a WSDL document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, ...)
    Url(Url),
    /// In-memory document text
    String(String),
}

impl Location {
    /// Classify a command-line style argument.
    ///
    /// Anything that parses as a non-`file` URL is remote, `file://` URLs
    /// become paths, and everything else is taken as a path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Location::Path(path),
                Err(()) => Location::Url(url),
            },
            // single-letter schemes are Windows drive letters
            Ok(url) if url.scheme().len() > 1 => Location::Url(url),
            _ => Location::Path(PathBuf::from(s)),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::Url(u) => write!(f, "{}", u),
            Location::String(_) => write!(f, "<inline document>"),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Location::Url(url)
    }
}
