//! Link targets and the lookup contracts used to validate them.
//!
//! How resolvers are populated (remote link registries, legacy URL filters)
//! is outside the parser; it only calls the synchronous lookups below.

use docsmith_config::Config;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolves `scheme://path` references to another documentation set.
pub trait CrossLinkResolver: Send + Sync {
    fn try_resolve(&self, uri: &str) -> Option<String>;
}

/// Existence check for pages of the legacy documentation site.
///
/// Implementations may report false positives but never false negatives,
/// so `false` is authoritative.
pub trait LegacyPathIndex: Send + Sync {
    fn path_exists(&self, path: &str) -> bool;
}

#[derive(Clone, Default)]
pub struct Resolvers {
    pub cross_links: Option<Arc<dyn CrossLinkResolver>>,
    pub legacy: Option<Arc<dyn LegacyPathIndex>>,
}

/// Maps each configured scheme to a base URL.
///
/// `kibana://setup/install.md#step-2` with base `https://docs.example.com/kibana/`
/// resolves to `https://docs.example.com/kibana/setup/install#step-2`.
#[derive(Debug, Clone, Default)]
pub struct StaticCrossLinkResolver {
    schemes: BTreeMap<String, String>,
}

impl StaticCrossLinkResolver {
    pub fn new(schemes: BTreeMap<String, String>) -> Self {
        Self { schemes }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cross_links.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl CrossLinkResolver for StaticCrossLinkResolver {
    fn try_resolve(&self, uri: &str) -> Option<String> {
        let (scheme, rest) = uri.split_once("://")?;
        let base = self.schemes.get(scheme)?;
        let (path, fragment) = match rest.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (rest, None),
        };
        if path.is_empty() {
            return None;
        }
        let path = path
            .strip_suffix("index.md")
            .or_else(|| path.strip_suffix(".md"))
            .unwrap_or(path);

        let mut url = format!("{}/{}", base.trim_end_matches('/'), path);
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        Some(url)
    }
}

/// What a link destination points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// `#fragment` within the same document.
    Local(&'a str),
    /// `http`, `https` or `mailto`.
    External,
    /// A path under the configured legacy prefix.
    Legacy(&'a str),
    CrossLink(&'a str),
    /// Relative path to another page in the same set.
    Relative,
}

impl<'a> LinkTarget<'a> {
    const EXTERNAL_SCHEMES: [&'static str; 3] = ["http", "https", "mailto"];

    pub fn classify(destination: &'a str, legacy_prefix: Option<&str>) -> Self {
        if let Some(fragment) = destination.strip_prefix('#') {
            return LinkTarget::Local(fragment);
        }
        if let Some(path) = legacy_prefix.and_then(|prefix| destination.strip_prefix(prefix)) {
            return LinkTarget::Legacy(path);
        }
        if destination.starts_with("mailto:") {
            return LinkTarget::External;
        }
        match destination.split_once("://") {
            Some((scheme, _)) if Self::EXTERNAL_SCHEMES.contains(&scheme) => LinkTarget::External,
            Some(_) => LinkTarget::CrossLink(destination),
            None => LinkTarget::Relative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn resolver() -> StaticCrossLinkResolver {
        let mut schemes = BTreeMap::new();
        schemes.insert(
            "kibana".to_string(),
            "https://docs.example.com/kibana/".to_string(),
        );
        StaticCrossLinkResolver::new(schemes)
    }

    #[rstest]
    #[case("kibana://setup/install.md", Some("https://docs.example.com/kibana/setup/install"))]
    #[case("kibana://setup/install.md#step-2", Some("https://docs.example.com/kibana/setup/install#step-2"))]
    #[case("kibana://setup/index.md", Some("https://docs.example.com/kibana/setup/"))]
    #[case("kibana://", None)]
    #[case("beats://setup.md", None)]
    #[case("not a uri", None)]
    fn static_resolution(#[case] uri: &str, #[case] expected: Option<&str>) {
        assert_eq!(resolver().try_resolve(uri).as_deref(), expected);
    }

    #[rstest]
    #[case("#install", None, LinkTarget::Local("install"))]
    #[case("https://example.com", None, LinkTarget::External)]
    #[case("mailto:docs@example.com", None, LinkTarget::External)]
    #[case("kibana://setup.md", None, LinkTarget::CrossLink("kibana://setup.md"))]
    #[case("../other.md", None, LinkTarget::Relative)]
    #[case(
        "https://legacy.example.com/guide/en/page.html",
        Some("https://legacy.example.com/guide/"),
        LinkTarget::Legacy("en/page.html")
    )]
    fn classify(
        #[case] destination: &str,
        #[case] legacy_prefix: Option<&str>,
        #[case] expected: LinkTarget<'_>,
    ) {
        assert_eq!(LinkTarget::classify(destination, legacy_prefix), expected);
    }
}
