//! The set of source sites the remote parser understands.
//!
//! Validation is purely syntactic: a URL is supported when it starts with
//! `http://` or `https://` immediately followed by one of the configured
//! host prefixes. No network access happens here.

use crate::ConfigError;

/// Sites accepted when nothing else is configured.
pub const DEFAULT_SUPPORTED_SITES: &str =
    "rollingmoto=www.rollingmoto.ru/,motoland=motoland-shop.ru/";

/// One supported source: a short display tag and the host prefix a URL must
/// start with (after the scheme), including the trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    pub tag: String,
    pub prefix: String,
}

impl SiteRule {
    /// Host part of the prefix, e.g. `"www.rollingmoto.ru"`.
    #[must_use]
    pub fn host(&self) -> &str {
        self.prefix.split('/').next().unwrap_or(&self.prefix)
    }
}

/// A URL classified against the configured sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMatch<'a> {
    pub tag: &'a str,
    /// Everything after the host, `/` when the URL stops at the host.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedSites {
    rules: Vec<SiteRule>,
}

impl SupportedSites {
    #[must_use]
    pub fn new(rules: Vec<SiteRule>) -> Self {
        Self { rules }
    }

    /// Parses a comma-separated list of `tag=prefix` pairs.
    ///
    /// A prefix without a trailing `/` gets one, so a bare domain can never be
    /// accepted on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] (attributed to `var`) when an
    /// entry is missing the `=`, has an empty tag or prefix, or the list is
    /// empty.
    pub fn parse(var: &str, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };

        let mut rules = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (tag, prefix) = entry
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected tag=prefix, got \"{entry}\"")))?;
            let tag = tag.trim();
            let prefix = prefix
                .trim()
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            if tag.is_empty() || prefix.trim_matches('/').is_empty() {
                return Err(invalid(format!("empty tag or prefix in \"{entry}\"")));
            }
            let prefix = if prefix.ends_with('/') {
                prefix.to_string()
            } else {
                format!("{prefix}/")
            };
            rules.push(SiteRule {
                tag: tag.to_string(),
                prefix,
            });
        }

        if rules.is_empty() {
            return Err(invalid("no supported sites configured".to_string()));
        }
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[SiteRule] {
        &self.rules
    }

    /// Returns `true` iff `normalized` belongs to one of the configured sites.
    ///
    /// Expects an already-normalized URL; see [`crate::normalize_url`].
    #[must_use]
    pub fn is_supported(&self, normalized: &str) -> bool {
        strip_scheme(normalized)
            .is_some_and(|rest| self.rules.iter().any(|r| rest.starts_with(&r.prefix)))
    }

    /// Classifies a URL for display: which site it belongs to and the path
    /// after the host.
    #[must_use]
    pub fn describe(&self, url: &str) -> Option<SiteMatch<'_>> {
        let rest = strip_scheme(url)?;
        self.rules.iter().find_map(|rule| {
            let host = rule.host();
            let path = rest.strip_prefix(host)?;
            if !(path.is_empty() || path.starts_with('/')) {
                return None;
            }
            Some(SiteMatch {
                tag: &rule.tag,
                path: if path.is_empty() {
                    "/".to_string()
                } else {
                    path.to_string()
                },
            })
        })
    }

    /// User-facing message shown when a URL fails validation.
    #[must_use]
    pub fn rejection_message(&self) -> String {
        let hosts = self
            .rules
            .iter()
            .map(|r| r.host().trim_start_matches("www."))
            .collect::<Vec<_>>()
            .join(" и ");
        format!("Неверный URL. Поддерживаются только {hosts}")
    }
}

impl Default for SupportedSites {
    fn default() -> Self {
        Self {
            rules: vec![
                SiteRule {
                    tag: "rollingmoto".to_string(),
                    prefix: "www.rollingmoto.ru/".to_string(),
                },
                SiteRule {
                    tag: "motoland".to_string(),
                    prefix: "motoland-shop.ru/".to_string(),
                },
            ],
        }
    }
}

fn strip_scheme(url: &str) -> Option<&str> {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
