//! Per-submodule text matchers.

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::SubmoduleRecord;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SSH_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^git@([^:/\s]+):").unwrap());

/// Literal matcher that only accepts occurrences standing as a whole token.
///
/// An occurrence is rejected when the character before or after it is a
/// word character, `/` or `-`, since all of those continue a path segment.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    literal: String,
}

impl TokenMatcher {
    /// Creates a matcher for the given literal.
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    /// Returns the literal being matched.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns true if the literal occurs in `text` as a bounded token.
    pub fn is_match(&self, text: &str) -> bool {
        if self.literal.is_empty() {
            return false;
        }

        let mut from = 0;
        while let Some(offset) = text[from..].find(&self.literal) {
            let start = from + offset;
            let end = start + self.literal.len();

            let before_ok = text[..start].chars().next_back().map_or(true, is_open);
            let after_ok = text[end..].chars().next().map_or(true, is_open);
            if before_ok && after_ok {
                return true;
            }

            // Retry from the next character so overlapping candidates are seen
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        false
    }
}

/// Returns true if `c` may border a token.
fn is_open(c: char) -> bool {
    !(c.is_alphanumeric() || matches!(c, '_' | '/' | '-'))
}

/// Rewrites a remote URL into its canonical HTTPS form.
///
/// `git@host:owner/repo.git` and `https://host/owner/repo.git` both become
/// `https://host/owner/repo`.
pub fn canonical_url(url: &str) -> String {
    let url = url.trim();
    let https = SSH_PREFIX_PATTERN.replace(url, "https://$1/");
    https.strip_suffix(".git").unwrap_or(https.as_ref()).to_string()
}

/// The three matchers compiled for one registry record.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Lookup key of the record.
    pub key: String,
    /// Record path, as declared.
    pub path: String,
    /// Record URL, as declared.
    pub url: String,
    path_matcher: TokenMatcher,
    canonical_url: String,
    alias_matcher: TokenMatcher,
}

impl CompiledPattern {
    /// Compiles the matchers for a record.
    pub fn compile(record: &SubmoduleRecord) -> Self {
        Self {
            key: record.key(),
            path: record.path.clone(),
            url: record.url.clone(),
            path_matcher: TokenMatcher::new(record.path.as_str()),
            canonical_url: canonical_url(&record.url),
            alias_matcher: TokenMatcher::new(record.last_segment()),
        }
    }

    /// Returns true if the full path appears as a token.
    pub fn matches_path(&self, text: &str) -> bool {
        self.path_matcher.is_match(text)
    }

    /// Returns true if the canonical URL appears anywhere in the text.
    pub fn matches_url(&self, text: &str) -> bool {
        !self.canonical_url.is_empty() && text.contains(&self.canonical_url)
    }

    /// Returns true if the last path segment appears as a token.
    pub fn matches_alias(&self, text: &str) -> bool {
        self.alias_matcher.is_match(text)
    }

    /// Returns the canonical URL used for matching.
    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(path: &str, url: &str) -> CompiledPattern {
        CompiledPattern::compile(&SubmoduleRecord::new(path, url))
    }

    // ── TokenMatcher ───────────────────────────────────────────────

    #[test]
    fn token_matches_whole_word() {
        let m = TokenMatcher::new("core");
        assert!(m.is_match("core"));
        assert!(m.is_match("the core module"));
        assert!(m.is_match("(core)"));
        assert!(m.is_match("see core."));
        assert!(m.is_match("`core`, again"));
    }

    #[test]
    fn token_rejects_longer_segments() {
        let m = TokenMatcher::new("core");
        assert!(!m.is_match("coretools"));
        assert!(!m.is_match("my_core"));
        assert!(!m.is_match("libs/core"));
        assert!(!m.is_match("core/src"));
        assert!(!m.is_match("hardcore"));
    }

    #[test]
    fn token_hyphenated_segments_are_distinct() {
        let m = TokenMatcher::new("core");
        assert!(!m.is_match("my-core"));
        assert!(!m.is_match("core-tools"));
        assert!(!TokenMatcher::new("modules/core").is_match("modules/coretools"));
    }

    #[test]
    fn token_finds_later_bounded_occurrence() {
        let m = TokenMatcher::new("core");
        assert!(m.is_match("coretools and core"));
    }

    #[test]
    fn token_handles_overlapping_candidates() {
        let m = TokenMatcher::new("aa");
        assert!(!m.is_match("aaa"));
        assert!(m.is_match("aaa aa"));
    }

    #[test]
    fn token_respects_unicode_word_chars() {
        let m = TokenMatcher::new("core");
        assert!(!m.is_match("écore"));
        assert!(m.is_match("« core »"));
    }

    #[test]
    fn empty_token_never_matches() {
        assert!(!TokenMatcher::new("").is_match("anything"));
    }

    // ── canonical_url ──────────────────────────────────────────────

    #[test]
    fn canonical_url_rewrites_ssh() {
        assert_eq!(
            canonical_url("git@github.com:org/semantic-core.git"),
            "https://github.com/org/semantic-core"
        );
    }

    #[test]
    fn canonical_url_strips_git_suffix() {
        assert_eq!(
            canonical_url("https://gitlab.example.com/group/tool.git"),
            "https://gitlab.example.com/group/tool"
        );
    }

    #[test]
    fn canonical_url_leaves_plain_https() {
        assert_eq!(
            canonical_url("https://github.com/org/repo"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn canonical_url_handles_other_hosts() {
        assert_eq!(
            canonical_url("git@gitlab.com:team/lib.git"),
            "https://gitlab.com/team/lib"
        );
    }

    // ── CompiledPattern ────────────────────────────────────────────

    #[test]
    fn compiled_pattern_matches_each_signal() {
        let p = pattern("modules/semantic-core", "git@github.com:org/semantic-core.git");
        assert_eq!(p.key, "semantic-core");

        assert!(p.matches_path("touches modules/semantic-core today"));
        assert!(p.matches_url("see https://github.com/org/semantic-core/issues/4"));
        assert!(p.matches_alias("the semantic-core crate"));
    }

    #[test]
    fn path_mention_does_not_count_as_alias() {
        let p = pattern("modules/semantic-core", "https://github.com/org/semantic-core");
        assert!(!p.matches_alias("modules/semantic-core"));
    }

    #[test]
    fn path_rejected_inside_longer_path() {
        let p = pattern("modules/core", "https://github.com/org/core");
        assert!(!p.matches_path("modules/core/src/lib.rs"));
        assert!(!p.matches_path("vendor/modules/core"));
        assert!(!p.matches_path("modules/coretools"));
    }

    #[test]
    fn alias_is_case_sensitive() {
        let p = pattern("modules/Engine", "https://h/engine");
        assert_eq!(p.key, "engine");
        assert!(p.matches_alias("the Engine crate"));
        assert!(!p.matches_alias("the engine crate"));
    }
}
