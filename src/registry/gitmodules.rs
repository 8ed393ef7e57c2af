//! `.gitmodules` parser.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::SubmoduleRecord;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SECTION_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// Section being accumulated while scanning.
#[derive(Default)]
struct PendingSection {
    name: Option<String>,
    path: Option<String>,
    url: Option<String>,
}

impl PendingSection {
    /// Converts the section into a record when both path and url are present.
    fn finish(self) -> Option<SubmoduleRecord> {
        let path = self.path.filter(|p| !p.is_empty())?;
        let url = self.url.filter(|u| !u.is_empty())?;
        Some(SubmoduleRecord {
            name: self.name.unwrap_or_else(|| path.clone()),
            path,
            url,
        })
    }
}

/// Parses `.gitmodules` content into records, in declaration order.
///
/// Sections lacking a `path` or `url` are dropped. A path declared twice
/// keeps its first record.
pub fn parse_gitmodules(content: &str) -> Vec<SubmoduleRecord> {
    let mut records = Vec::new();
    let mut current: Option<PendingSection> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            records.extend(current.take().and_then(PendingSection::finish));
            if line.starts_with("[submodule") {
                current = Some(PendingSection {
                    name: SECTION_NAME_PATTERN
                        .captures(line)
                        .map(|c| c[1].to_string()),
                    ..PendingSection::default()
                });
            }
            continue;
        }

        let Some(section) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "path" => section.path = Some(value.trim().to_string()),
            "url" => section.url = Some(value.trim().to_string()),
            _ => {}
        }
    }
    records.extend(current.and_then(PendingSection::finish));

    let mut seen = HashSet::new();
    records.retain(|record| {
        let first = seen.insert(record.path.clone());
        if !first {
            warn!(path = %record.path, "Duplicate submodule path ignored");
        }
        first
    });
    records
}
