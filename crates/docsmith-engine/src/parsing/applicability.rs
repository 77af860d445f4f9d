//! Applicability expressions: `stack: ga 9.1, preview 9.0, serverless: beta`.
//!
//! Parsing never fails hard. Problems are returned as `(Severity, message)`
//! pairs for the caller to stamp with a source span; items that fail are
//! skipped and the expression parses if at least one item survives.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    TechPreview,
    Beta,
    Ga,
    Deprecated,
    Removed,
    Unavailable,
    // Retired spellings, accepted with a hint
    Development,
    Planned,
    Discontinued,
}

impl Lifecycle {
    pub fn parse(token: &str) -> Option<Self> {
        let lifecycle = match token.to_ascii_lowercase().as_str() {
            "preview" | "tech-preview" => Lifecycle::TechPreview,
            "beta" => Lifecycle::Beta,
            "ga" => Lifecycle::Ga,
            "deprecated" => Lifecycle::Deprecated,
            "removed" => Lifecycle::Removed,
            "unavailable" => Lifecycle::Unavailable,
            "development" | "dev" => Lifecycle::Development,
            "planned" | "coming" => Lifecycle::Planned,
            "discontinued" => Lifecycle::Discontinued,
            _ => return None,
        };
        Some(lifecycle)
    }

    pub fn is_retired(self) -> bool {
        matches!(
            self,
            Lifecycle::Development | Lifecycle::Planned | Lifecycle::Discontinued
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::TechPreview => "preview",
            Lifecycle::Beta => "beta",
            Lifecycle::Ga => "ga",
            Lifecycle::Deprecated => "deprecated",
            Lifecycle::Removed => "removed",
            Lifecycle::Unavailable => "unavailable",
            Lifecycle::Development => "development",
            Lifecycle::Planned => "planned",
            Lifecycle::Discontinued => "discontinued",
        }
    }
}

/// `X[.Y[.Z]]`; missing components are unspecified, not zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
}

impl Version {
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().map(str::parse).transpose().ok()?;
        let patch = parts.next().map(str::parse).transpose().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Version {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    All,
    Exact(Version),
    /// `9.1+`
    GreaterOrEqual(Version),
}

impl VersionSpec {
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(VersionSpec::All);
        }
        match s.strip_suffix('+') {
            Some(v) => Version::parse(v).map(VersionSpec::GreaterOrEqual),
            None => Version::parse(s).map(VersionSpec::Exact),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::All => f.write_str("all"),
            VersionSpec::Exact(v) => write!(f, "{v}"),
            VersionSpec::GreaterOrEqual(v) => write!(f, "{v}+"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Applicability {
    pub lifecycle: Lifecycle,
    pub version: VersionSpec,
}

impl Applicability {
    pub const GA_ALL: Applicability = Applicability {
        lifecycle: Lifecycle::Ga,
        version: VersionSpec::All,
    };
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lifecycle.as_str(), self.version)
    }
}

/// Parsed applicability, keyed by scope (`stack`, `serverless`, a product).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicableTo {
    pub scopes: BTreeMap<String, Vec<Applicability>>,
}

impl ApplicableTo {
    pub const KNOWN_SCOPES: [&'static str; 11] = [
        "stack",
        "deployment",
        "serverless",
        "product",
        "self",
        "ece",
        "eck",
        "ess",
        "elasticsearch",
        "observability",
        "security",
    ];

    /// Parses a definition, collecting problems into `diagnostics`.
    ///
    /// `products` extends the known scopes.
    pub fn parse(
        definition: &str,
        products: &[String],
        diagnostics: &mut Vec<(Severity, String)>,
    ) -> Option<Self> {
        let body = strip_braces(definition);
        let mut scopes: BTreeMap<String, Vec<Applicability>> = BTreeMap::new();
        let mut unknown_keys: Vec<String> = Vec::new();
        let mut current: Option<String> = None;
        let mut parsed_any = false;

        for segment in body.split(',') {
            let (key, value) = match segment.split_once(':') {
                Some((key, value)) => {
                    let key = key.trim().to_ascii_lowercase();
                    current = Some(key.clone());
                    (key, value.trim())
                }
                None => match &current {
                    Some(key) => (key.clone(), segment.trim()),
                    None => return None,
                },
            };
            if key.is_empty() {
                return None;
            }
            if !Self::is_known_scope(&key, products) {
                if !unknown_keys.contains(&key) {
                    unknown_keys.push(key);
                }
                continue;
            }
            let Some(item) = parse_item(value, diagnostics) else {
                continue;
            };
            scopes.entry(key).or_default().push(item);
            parsed_any = true;
        }

        if !unknown_keys.is_empty() {
            diagnostics.push((
                Severity::Warning,
                format!(
                    "Applies block does not support the following keys: {}",
                    unknown_keys.join(", ")
                ),
            ));
        }

        parsed_any.then_some(ApplicableTo { scopes })
    }

    fn is_known_scope(key: &str, products: &[String]) -> bool {
        Self::KNOWN_SCOPES.contains(&key) || products.iter().any(|p| p == key)
    }

    pub fn get(&self, scope: &str) -> Option<&[Applicability]> {
        self.scopes.get(scope).map(Vec::as_slice)
    }

    /// Sort key for tabs: serverless, then stack from newest to oldest,
    /// then deployments (ech, ece, eck, self-managed), then the rest.
    /// Anything unavailable sorts after all of those.
    pub fn display_order(&self) -> DisplayOrder {
        let unavailable = self
            .scopes
            .values()
            .flatten()
            .any(|a| a.lifecycle == Lifecycle::Unavailable);
        let has = |keys: &[&str]| keys.iter().any(|k| self.scopes.contains_key(*k));

        let (category, newest, deployment) = if has(&Self::SERVERLESS_SCOPES) {
            (0, None, 0)
        } else if let Some(stack) = self.get("stack") {
            let newest = stack
                .iter()
                .filter_map(|a| match a.version {
                    VersionSpec::All => None,
                    VersionSpec::Exact(v) | VersionSpec::GreaterOrEqual(v) => Some(v),
                })
                .max();
            (1, newest, 0)
        } else if has(&Self::DEPLOYMENT_SCOPES) {
            let rank = Self::DEPLOYMENT_SCOPES
                .iter()
                .position(|k| self.scopes.contains_key(*k))
                .unwrap_or(Self::DEPLOYMENT_SCOPES.len());
            (2, None, rank)
        } else {
            (3, None, 0)
        };

        DisplayOrder {
            unavailable,
            category,
            newest: Reverse(newest),
            deployment,
        }
    }

    const SERVERLESS_SCOPES: [&'static str; 4] =
        ["serverless", "elasticsearch", "observability", "security"];

    /// In tab order; a bare `deployment` ranks after the named ones.
    const DEPLOYMENT_SCOPES: [&'static str; 5] = ["ess", "ece", "eck", "self", "deployment"];
}

/// See [`ApplicableTo::display_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplayOrder {
    unavailable: bool,
    category: u8,
    newest: Reverse<Option<Version>>,
    deployment: usize,
}

impl fmt::Display for ApplicableTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (scope, items) in &self.scopes {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{scope}: ")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
        }
        Ok(())
    }
}

fn strip_braces(s: &str) -> &str {
    let t = s.trim();
    t.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .map_or(t, str::trim)
}

fn parse_item(value: &str, diagnostics: &mut Vec<(Severity, String)>) -> Option<Applicability> {
    let mut tokens = value.split_whitespace();
    let Some(lifecycle_token) = tokens.next() else {
        return Some(Applicability::GA_ALL);
    };
    if lifecycle_token.eq_ignore_ascii_case("all") {
        return Some(Applicability::GA_ALL);
    }

    let Some(lifecycle) = Lifecycle::parse(lifecycle_token) else {
        diagnostics.push((
            Severity::Error,
            format!("Unknown product lifecycle: {lifecycle_token}"),
        ));
        return None;
    };
    if lifecycle.is_retired() {
        diagnostics.push((
            Severity::Hint,
            format!(
                "The '{lifecycle_token}' lifecycle is deprecated and will be removed in a future release."
            ),
        ));
    }

    let version = match tokens.next() {
        None => VersionSpec::All,
        Some(token) => match VersionSpec::parse(token) {
            Some(version) => version,
            None => {
                diagnostics.push((Severity::Error, format!("Invalid version '{token}'")));
                return None;
            }
        },
    };
    if let Some(extra) = tokens.next() {
        diagnostics.push((
            Severity::Error,
            format!("Unexpected text '{extra}' after version"),
        ));
        return None;
    }

    Some(Applicability { lifecycle, version })
}

/// Identity used to synchronise switch tabs with equivalent applicability.
///
/// Values after the first colon are trimmed and sorted so that word order
/// does not matter: `stack: ga 9.1, preview 9.0` and
/// `stack: preview 9.0, ga 9.1` both give `stack-ga-9-1-preview-9-0`.
pub fn sync_key(definition: &str) -> String {
    let body = strip_braces(definition);
    let normalized = match body.split_once(':') {
        Some((scope, values)) => {
            let mut values: Vec<&str> = values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect();
            values.sort_unstable();
            format!("{} {}", scope.trim(), values.join(" "))
        }
        None => body.to_string(),
    };
    slug(&normalized)
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
