//! Container image references
//!
//! Parses textual references such as `public.ecr.aws/docker/library/alpine:3.20`
//! into their parts and formats them back. Parsing never fails: malformed input
//! produces a best-effort structure, and formatting a parsed reference always
//! re-parses to the same structure.
//!
//! The registry host is told apart from an organization path only by the
//! presence of `.` or `:` in the first segment. An organization literally named
//! `my.org` is therefore read as a registry.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Image used when a stage does not name a runner, relative to the default registry
pub const DEFAULT_RUNNER_PATH: &str = "docker/library/alpine:latest";

/// A parsed container image reference
///
/// `domain/context_path/name:tag@digest`, where every part except `name` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageReference {
    /// Registry host with optional port (e.g., "docker.io", "localhost:5000")
    pub domain: Option<String>,
    /// Slash-joined path between registry and name (e.g., "docker/library")
    pub context_path: Option<String>,
    /// Repository name (e.g., "golang")
    pub name: String,
    /// Version label (e.g., "1.22")
    pub tag: Option<String>,
    /// Content digest (e.g., "sha256:123...")
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parses an image reference
    ///
    /// Empty input yields a reference with every field empty.
    ///
    /// # Example
    /// ```
    /// use sonic_core::domain::image::ImageReference;
    ///
    /// let image = ImageReference::parse("docker.io/library/golang:1.22");
    /// assert_eq!(image.domain.as_deref(), Some("docker.io"));
    /// assert_eq!(image.context_path.as_deref(), Some("library"));
    /// assert_eq!(image.name, "golang");
    /// assert_eq!(image.tag.as_deref(), Some("1.22"));
    /// ```
    pub fn parse(reference: &str) -> Self {
        let mut image = Self::default();
        if reference.is_empty() {
            return image;
        }

        let mut segments: Vec<&str> = reference.split('/').collect();

        if segments.len() > 1 && looks_like_domain(segments[0]) {
            image.domain = non_empty(segments.remove(0));
        }

        let Some((last, context)) = segments.split_last() else {
            return image;
        };

        // Digest first, then tag: "name:tag@algo:hex"
        let mut by_at = last.split('@');
        let name_and_tag = by_at.next().unwrap_or_default();
        image.digest = by_at.next().and_then(non_empty);

        let mut by_colon = name_and_tag.split(':');
        image.name = by_colon.next().unwrap_or_default().to_string();
        image.tag = by_colon.next().and_then(non_empty);

        if !context.is_empty() {
            image.context_path = non_empty(&context.join("/"));
        }

        image
    }

    /// Returns true if the reference names a registry
    pub fn has_domain(&self) -> bool {
        self.domain.as_deref().is_some_and(|d| !d.is_empty())
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Name is always present, even when empty ("docker.io/")
        let path: Vec<&str> = [self.domain.as_deref(), self.context_path.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .chain(std::iter::once(self.name.as_str()))
            .collect();
        write!(f, "{}", path.join("/"))?;

        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = self.digest.as_deref().filter(|d| !d.is_empty()) {
            write!(f, "@{}", digest)?;
        }

        Ok(())
    }
}

impl FromStr for ImageReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Resolves a runner string into a fully qualified image reference
///
/// An empty runner falls back to `{default_registry}/docker/library/alpine:latest`.
/// A runner without a registry gets `default_registry` as its domain.
/// No registry is contacted.
///
/// # Example
/// ```
/// use sonic_core::domain::image::resolve_runner_image;
///
/// assert_eq!(
///     resolve_runner_image("golang:1.22", "public.ecr.aws"),
///     "public.ecr.aws/golang:1.22"
/// );
/// ```
pub fn resolve_runner_image(runner: &str, default_registry: &str) -> String {
    if runner.is_empty() {
        return format!("{}/{}", default_registry, DEFAULT_RUNNER_PATH);
    }

    let mut image = ImageReference::parse(runner);
    if !image.has_domain() {
        image.domain = Some(default_registry.to_string());
    }

    image.to_string()
}

fn looks_like_domain(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':')
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
