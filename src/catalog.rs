//! Static catalog of retrievable documents.
//!
//! A catalog maps logical document keys to the location their Markdown lives
//! at, either a file under a documentation directory or a URL under a remote
//! base. Catalogs are described by a small TOML file:
//!
//! ```toml
//! name = "roblox-ts"
//! base_url = "https://raw.githubusercontent.com/roblox-ts/roblox-ts.com/master/docs"
//!
//! [[docs]]
//! key = "introduction"
//! path = "introduction.mdx"
//! ```
//!
//! Entry order in the file is preserved and is the order search and listing
//! walk the catalog in.

use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::error::DocError;

/// Catalog used when no catalog file is supplied.
pub const DEFAULT_CATALOG: &str = include_str!("../catalogs/roblox-ts.toml");

/// Default time-to-live for documents fetched over HTTP.
pub const DEFAULT_REMOTE_TTL: Duration = Duration::from_secs(3600);

const MAIN_CATEGORY: &str = "main";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid URL for '{key}': {source}")]
    InvalidUrl {
        key: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Duplicate documentation key: {0}")]
    DuplicateKey(String),

    #[error("Document '{0}' has a relative path but the catalog has no docs_dir or base_url")]
    MissingRoot(String),
}

/// Where a document's text is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(Url),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Root that relative catalog paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRoot {
    Dir(PathBuf),
    BaseUrl(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    /// The path as written in the catalog.
    pub path: String,
    pub location: SourceLocation,
    pub category: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    name: String,
    #[serde(default)]
    docs_dir: Option<PathBuf>,
    #[serde(default)]
    base_url: Option<Url>,
    #[serde(default)]
    ttl_secs: Option<u64>,
    #[serde(default)]
    docs: Vec<DocSpec>,
}

#[derive(Debug, Deserialize)]
struct DocSpec {
    key: String,
    path: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    root: Option<CatalogRoot>,
    ttl: Option<Duration>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from `(key, path)` pairs, in the given order.
    pub fn new<K, P>(
        name: impl Into<String>,
        root: Option<CatalogRoot>,
        docs: impl IntoIterator<Item = (K, P)>,
    ) -> Result<Self, CatalogError>
    where
        K: Into<String>,
        P: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (key, path) in docs {
            let key = key.into();
            let path = path.into();
            if !seen.insert(key.clone()) {
                return Err(CatalogError::DuplicateKey(key));
            }
            let location = resolve_location(&key, &path, root.as_ref())?;
            entries.push(CatalogEntry {
                category: category_of(&path),
                title: title_of(&key),
                key,
                path,
                location,
            });
        }

        let ttl = match root {
            Some(CatalogRoot::BaseUrl(_)) => Some(DEFAULT_REMOTE_TTL),
            _ => None,
        };

        Ok(Self {
            name: name.into(),
            root,
            ttl,
            entries,
        })
    }

    /// Parses a catalog from TOML. Relative `docs_dir` values are resolved
    /// against `base_dir`.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;

        let root = match (file.docs_dir, file.base_url) {
            (_, Some(url)) => Some(CatalogRoot::BaseUrl(url)),
            (Some(dir), None) if dir.is_absolute() => Some(CatalogRoot::Dir(dir)),
            (Some(dir), None) => Some(CatalogRoot::Dir(base_dir.join(dir))),
            (None, None) => None,
        };

        let mut catalog = Self::new(
            file.name,
            root,
            file.docs.into_iter().map(|doc| (doc.key, doc.path)),
        )?;
        if let Some(secs) = file.ttl_secs {
            catalog.ttl = Some(Duration::from_secs(secs));
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml(&content, base_dir)
    }

    /// The embedded roblox-ts catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(DEFAULT_CATALOG, Path::new("."))
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<&CatalogRoot> {
        self.root.as_ref()
    }

    /// Time-to-live for cached documents; `None` means cached bodies never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Result<&CatalogEntry, DocError> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .ok_or_else(|| DocError::UnknownKey(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by category. Groups appear in the order their first
    /// entry appears in the catalog.
    pub fn grouped_by_category(&self) -> Vec<(&str, Vec<&CatalogEntry>)> {
        self.entries
            .iter()
            .map(|entry| entry.category.as_str())
            .unique()
            .map(|category| {
                let members = self
                    .entries
                    .iter()
                    .filter(|entry| entry.category == category)
                    .collect();
                (category, members)
            })
            .collect()
    }
}

fn resolve_location(
    key: &str,
    path: &str,
    root: Option<&CatalogRoot>,
) -> Result<SourceLocation, CatalogError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        let url = Url::parse(path).map_err(|source| CatalogError::InvalidUrl {
            key: key.to_string(),
            source,
        })?;
        return Ok(SourceLocation::Url(url));
    }

    if Path::new(path).is_absolute() {
        return Ok(SourceLocation::Path(PathBuf::from(path)));
    }

    match root {
        Some(CatalogRoot::Dir(dir)) => Ok(SourceLocation::Path(dir.join(path))),
        Some(CatalogRoot::BaseUrl(base)) => {
            let url = Url::parse(&format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                path.trim_start_matches('/')
            ))
            .map_err(|source| CatalogError::InvalidUrl {
                key: key.to_string(),
                source,
            })?;
            Ok(SourceLocation::Url(url))
        }
        None => Err(CatalogError::MissingRoot(key.to_string())),
    }
}

fn category_of(path: &str) -> String {
    if path.contains("://") || Path::new(path).is_absolute() {
        return MAIN_CATEGORY.to_string();
    }
    match path.split_once('/') {
        Some((first, _)) if !first.is_empty() => first.to_string(),
        _ => MAIN_CATEGORY.to_string(),
    }
}

/// `quickStart` -> `quick Start`. Only word breaks are added; the key's
/// casing is kept as written.
fn title_of(key: &str) -> String {
    let mut title = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() && !title.is_empty() {
            title.push(' ');
        }
        title.push(ch);
    }
    title
}

/// Title-cases `word`: a letter following a non-letter (or starting the
/// word) is upper-cased, every other letter is lower-cased. `api-ref` ->
/// `Api-Ref`.
pub fn capitalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_is_letter = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
        } else {
            out.push(ch);
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}
