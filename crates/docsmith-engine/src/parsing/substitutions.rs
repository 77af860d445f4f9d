//! `{{key}}` substitutions and the `|` mutations applied to their values.
//!
//! Keys are matched case-insensitively against `Config::substitutions`.
//! `{{version | M.M}}` looks up `version` and then reshapes the value.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::diagnostics::Severity;
use crate::parsing::applicability::Version;

/// A key with this many mutations or more gets none of them.
pub const MAX_MUTATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Major,
    MajorX,
    MajorMinor,
    IncreaseMajor,
    IncreaseMinor,
    Lowercase,
    Uppercase,
    TitleCase,
    Capitalize,
    KebabCase,
    SnakeCase,
    CamelCase,
    PascalCase,
    Trim,
}

impl Mutation {
    const NAMES: [(Mutation, &'static str, &'static str); 14] = [
        (Mutation::Major, "M", "major-component"),
        (Mutation::MajorX, "M.x", "major-x"),
        (Mutation::MajorMinor, "M.M", "major-minor"),
        (Mutation::IncreaseMajor, "M+1", "increase-major"),
        (Mutation::IncreaseMinor, "M.M+1", "increase-minor"),
        (Mutation::Lowercase, "lc", "lowercase"),
        (Mutation::Uppercase, "uc", "uppercase"),
        (Mutation::TitleCase, "tc", "title-case"),
        (Mutation::Capitalize, "c", "capitalize"),
        (Mutation::KebabCase, "kc", "kebab-case"),
        (Mutation::SnakeCase, "sc", "snake-case"),
        (Mutation::CamelCase, "cc", "camel-case"),
        (Mutation::PascalCase, "pc", "pascal-case"),
        (Mutation::Trim, "trim", "trim"),
    ];

    /// Short or long name, any case.
    pub fn parse(token: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, short, long)| {
                token.eq_ignore_ascii_case(short) || token.eq_ignore_ascii_case(long)
            })
            .map(|(mutation, _, _)| *mutation)
    }

    /// Version mutations leave values that are not a version untouched.
    pub fn apply(self, value: &str) -> String {
        match self {
            Mutation::Major
            | Mutation::MajorX
            | Mutation::MajorMinor
            | Mutation::IncreaseMajor
            | Mutation::IncreaseMinor => match Version::parse(value.trim()) {
                Some(version) => self.apply_version(version),
                None => value.to_string(),
            },
            Mutation::Lowercase => value.to_lowercase(),
            Mutation::Uppercase => value.to_uppercase(),
            Mutation::TitleCase => value
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            Mutation::Capitalize => capitalize(value),
            Mutation::KebabCase => words(value).join("-"),
            Mutation::SnakeCase => words(value).join("_"),
            Mutation::CamelCase => words(value)
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
            Mutation::PascalCase => words(value).iter().map(|w| capitalize(w)).collect(),
            Mutation::Trim => value.trim().to_string(),
        }
    }

    fn apply_version(self, v: Version) -> String {
        let minor = v.minor.unwrap_or(0);
        match self {
            Mutation::Major => v.major.to_string(),
            Mutation::MajorX => format!("{}.x", v.major),
            Mutation::MajorMinor => format!("{}.{minor}", v.major),
            Mutation::IncreaseMajor => format!("{}.0.0", v.major.saturating_add(1)),
            Mutation::IncreaseMinor => format!("{}.{}.0", v.major, minor.saturating_add(1)),
            _ => v.to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercased words, split on punctuation, whitespace and lower-to-upper steps.
fn words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut after_lower = false;
    for ch in value.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            after_lower = false;
            continue;
        }
        if ch.is_uppercase() && after_lower {
            words.push(std::mem::take(&mut current));
        }
        after_lower = ch.is_lowercase() || ch.is_numeric();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Case-insensitive lookup of an already lowercased key.
pub fn lookup<'a>(substitutions: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    substitutions
        .get(key)
        .or_else(|| {
            substitutions
                .iter()
                .find(|(k, _)| k.to_lowercase() == key)
                .map(|(_, v)| v)
        })
        .map(String::as_str)
}

/// The outcome of resolving the text between `{{` and `}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub key: String,
    /// The mutated value, or `None` when the key is undefined.
    pub replacement: Option<String>,
    /// Problems for the caller to stamp with a span.
    pub problems: Vec<(Severity, String)>,
}

/// Resolves `key | mutation | ...` against `substitutions`.
pub fn resolve(raw: &str, substitutions: &BTreeMap<String, String>) -> Resolved {
    let raw = raw.trim_matches(['{', '}']).trim().to_lowercase();
    let mut parts = raw.split('|').map(str::trim);
    let key = parts.next().unwrap_or_default().to_string();
    let tokens: Vec<&str> = parts.collect();
    let mut problems = Vec::new();

    let Some(value) = lookup(substitutions, &key) else {
        // Keys with spaces are usually prose, not a typo'd key
        let severity = if key.contains(' ') {
            Severity::Hint
        } else {
            Severity::Error
        };
        problems.push((severity, format!("Substitution key {{{key}}} is undefined")));
        return Resolved {
            key,
            replacement: None,
            problems,
        };
    };

    let mut replacement = value.to_string();
    if tokens.len() >= MAX_MUTATIONS {
        problems.push((
            Severity::Error,
            format!("Substitution key {{{key}}} defines too many mutations, none will be applied"),
        ));
    } else {
        for token in tokens {
            match Mutation::parse(token) {
                Some(mutation) => replacement = mutation.apply(&replacement),
                None => problems.push((
                    Severity::Error,
                    format!("Mutation '{token}' on {{{key}}} is undefined"),
                )),
            }
        }
    }

    Resolved {
        key,
        replacement: Some(replacement),
        problems,
    }
}

fn pattern() -> &'static Regex {
    static SUBSTITUTION: OnceLock<Regex> = OnceLock::new();
    SUBSTITUTION.get_or_init(|| {
        Regex::new(r"\{\{([^{}\r\n\t]+)\}\}").expect("Invalid substitution regex")
    })
}

/// Replaces every defined `{{key}}` in `text`. Undefined keys stay as
/// written and nothing is reported. Returns `None` when nothing changed.
pub fn replace_in(text: &str, substitutions: &BTreeMap<String, String>) -> Option<String> {
    if substitutions.is_empty() || !text.contains("{{") {
        return None;
    }
    let mut changed = false;
    let replaced = pattern().replace_all(text, |caps: &regex::Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let inner = caps.get(1).map_or("", |m| m.as_str());
        match resolve(inner, substitutions).replacement {
            Some(value) => {
                changed = true;
                value
            }
            None => whole.to_string(),
        }
    });
    changed.then(|| replaced.into_owned())
}
