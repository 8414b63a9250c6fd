//! Robots.txt parser implementation
//!
//! Only the wildcard user agent group is honoured, and only its `Disallow`
//! directives. Every rule is a plain path prefix.

use url::{Position, Url};

/// Base used to percent-encode path rules the way fetched URLs are encoded
const RULE_BASE: &str = "http://robots.invalid/";

/// Disallowed path prefixes for the wildcard user agent
///
/// Built once per crawl and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowRules {
    prefixes: Vec<String>,
}

impl DisallowRules {
    /// Creates a rule set from explicit prefixes, in order
    ///
    /// Prefixes are percent-encoded like the URLs they are matched against,
    /// so `/café` becomes `/caf%C3%A9`.
    pub fn new(prefixes: Vec<String>) -> Self {
        Self {
            prefixes: prefixes.iter().map(|p| canonical_prefix(p)).collect(),
        }
    }

    /// Creates an empty rule set that allows everything
    ///
    /// This is used as the fallback when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses raw robots.txt content
    ///
    /// A `User-agent: *` line opens a group whose `Disallow:` values are
    /// collected until a `User-agent:` line naming some other agent closes it.
    /// Comments, blank lines, and lines without a `key: value` shape are ignored,
    /// as are empty `Disallow:` values (which allow everything).
    ///
    /// # Example
    ///
    /// ```
    /// use scrappy::robots::DisallowRules;
    ///
    /// let rules = DisallowRules::from_content("User-agent: *\nDisallow: /private\n");
    /// assert_eq!(rules.prefixes(), ["/private".to_string()]);
    /// ```
    pub fn from_content(content: &str) -> Self {
        let mut prefixes = Vec::new();
        let mut applies = false;

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();

            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => applies = value == "*",
                "disallow" if applies && !value.is_empty() => prefixes.push(value.to_string()),
                _ => {}
            }
        }

        Self::new(prefixes)
    }

    /// Returns the disallowed prefixes in file order
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Returns true when there are no rules
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns the number of rules
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Checks whether a URL is excluded by any rule
    ///
    /// A rule matches when it is a literal prefix of the URL's path (query
    /// included), or of the whole URL for rules written as absolute URLs.
    /// Both sides are compared in percent-encoded form.
    pub fn is_disallowed(&self, url: &str) -> bool {
        if self.prefixes.is_empty() {
            return false;
        }

        let Ok(parsed) = Url::parse(url) else {
            return self.prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()));
        };
        let path_and_query = &parsed[Position::BeforePath..Position::AfterQuery];

        self.prefixes.iter().any(|prefix| {
            parsed.as_str().starts_with(prefix.as_str())
                || path_and_query.starts_with(prefix.as_str())
        })
    }
}

/// Encodes a rule the way the url crate encodes the URLs it is checked against
fn canonical_prefix(prefix: &str) -> String {
    let encoded = if prefix.starts_with('/') {
        Url::parse(RULE_BASE)
            .and_then(|base| base.join(prefix))
            .map(|url| url[Position::BeforePath..Position::AfterQuery].to_string())
    } else {
        Url::parse(prefix).map(String::from)
    };

    encoded.unwrap_or_else(|_| prefix.to_string())
}
