//! Language resolution and message catalogs.
//!
//! A [`Translator`] is created per request from the resolved language and
//! passed explicitly to everything that localizes output. Nothing here holds
//! an "active language", so concurrent requests cannot observe each other's
//! choice.

use std::collections::HashMap;

use thiserror::Error;

/// Catalogs embedded in the binary. English is the msgid language and has none.
const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("ur", include_str!("../locales/ur.toml")),
    ("ar", include_str!("../locales/ar.toml")),
];

/// Longest `Accept-Language` value we parse.
const MAX_ACCEPT_LANGUAGE_LEN: usize = 500;

/// Longest explicit language code accepted.
pub const MAX_LANGUAGE_TAG_LEN: usize = 35;

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Catalog for '{language}' is malformed: {source}")]
    Parse {
        language: String,
        #[source]
        source: toml::de::Error,
    },
}

/// msgid → translation tables, keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// A catalog with no translations; every lookup returns its msgid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the catalogs shipped with the crate.
    pub fn builtin() -> Result<Self, LocaleError> {
        Self::from_sources(BUILTIN_CATALOGS.iter().copied())
    }

    /// Parse `(language, toml)` pairs into a catalog.
    pub fn from_sources<'s>(
        sources: impl IntoIterator<Item = (&'s str, &'s str)>,
    ) -> Result<Self, LocaleError> {
        let mut languages = HashMap::new();
        for (language, text) in sources {
            let entries: HashMap<String, String> =
                toml::from_str(text).map_err(|source| LocaleError::Parse {
                    language: language.to_string(),
                    source,
                })?;
            tracing::debug!("Loaded {} messages for '{}'", entries.len(), language);
            languages.insert(language.to_lowercase(), entries);
        }
        Ok(Self { languages })
    }

    /// Whether a catalog exists for `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Request-scoped translator for `language`.
    pub fn translator<'a>(&'a self, language: &'a str) -> Translator<'a> {
        Translator {
            language,
            entries: self.languages.get(language),
        }
    }
}

/// Translation handle bound to one request's language.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    language: &'a str,
    entries: Option<&'a HashMap<String, String>>,
}

impl Translator<'static> {
    /// A translator that returns every msgid unchanged.
    pub fn passthrough() -> Self {
        Translator {
            language: "",
            entries: None,
        }
    }
}

impl<'a> Translator<'a> {
    pub fn language(&self) -> &'a str {
        self.language
    }

    /// Translate `msgid`, falling back to the msgid itself.
    pub fn gettext<'m>(&self, msgid: &'m str) -> &'m str
    where
        'a: 'm,
    {
        self.entries
            .and_then(|entries| entries.get(msgid))
            .map(String::as_str)
            .unwrap_or(msgid)
    }
}

/// Picks the effective language for a request.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    default_language: String,
    supported: Vec<String>,
}

impl LocaleResolver {
    pub fn new(default_language: &str, supported: &[String]) -> Self {
        Self {
            default_language: default_language.to_lowercase(),
            supported: supported.iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    /// Effective language: the explicit code lower-cased, else negotiated
    /// from the `Accept-Language` hint. Always returns a language.
    ///
    /// An explicit code that is not shaped like a language tag is ignored.
    /// The result is part of the cache key, so it never contains `_`.
    pub fn resolve(&self, explicit: Option<&str>, accept_language: Option<&str>) -> String {
        match explicit.map(str::trim).filter(|l| is_language_tag(l)) {
            Some(lang) => lang.to_lowercase(),
            None => {
                if let Some(rejected) = explicit.filter(|l| !l.trim().is_empty()) {
                    tracing::debug!("Ignoring malformed language code '{}'", rejected);
                }
                self.negotiate(accept_language)
            }
        }
    }

    /// Choose the best supported language from an `Accept-Language` header.
    pub fn negotiate(&self, accept_language: Option<&str>) -> String {
        let Some(header) = accept_language else {
            return self.default_language.clone();
        };

        for (tag, _) in parse_accept_language(header) {
            if tag == "*" {
                break;
            }
            if let Some(lang) = self.supported_variant(&tag) {
                return lang.to_string();
            }
        }

        self.default_language.clone()
    }

    fn supported_variant(&self, tag: &str) -> Option<&str> {
        let primary = tag.split('-').next().unwrap_or(tag);
        self.supported
            .iter()
            .find(|l| l.as_str() == tag)
            .or_else(|| self.supported.iter().find(|l| l.as_str() == primary))
            .map(String::as_str)
    }
}

/// ASCII letters, digits and `-`, at most [`MAX_LANGUAGE_TAG_LEN`] long.
pub fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.len() <= MAX_LANGUAGE_TAG_LEN
        && tag.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Parse an `Accept-Language` value into `(tag, q)` pairs, best first.
///
/// Tags are lower-cased. Entries with `q=0` or an unparsable weight are
/// dropped; ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let header = truncate_header(header);
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim().to_lowercase();
            if tag.is_empty() {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in pieces {
                if let Some(value) = param.trim().strip_prefix("q=") {
                    quality = value.trim().parse().ok()?;
                }
            }

            (quality > 0.0 && quality <= 1.0).then_some((tag, quality))
        })
        .collect();

    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}

// Over-long headers are cut back to the last complete entry.
fn truncate_header(header: &str) -> &str {
    if header.len() <= MAX_ACCEPT_LANGUAGE_LEN {
        return header;
    }
    match header.get(..MAX_ACCEPT_LANGUAGE_LEN) {
        Some(head) => head.rfind(',').map(|i| &head[..i]).unwrap_or(""),
        None => "",
    }
}
