//! Asset name normalization.
//!
//! Hashed file names change with every build, so assets are matched across
//! builds by a name with the hash removed. The bundler's output template is
//! the reliable source for where the hash sits; names that do not fit it go
//! through a generic heuristic.

use std::ops::Range;
use regex::Regex;

use crate::{DiffError, Result};

/// Turns an emitted asset path into a build-stable name.
pub trait AssetNameNormalizer: Send + Sync {
    fn normalize(&self, path: &str) -> String;
}

impl<F> AssetNameNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, path: &str) -> String {
        self(path)
    }
}

const SEPARATORS: &[char] = &['.', '-', '_', '~'];

/// Matches names against a bundler output template such as
/// `[name].[contenthash:8].js` and drops the hash placeholders.
#[derive(Debug, Clone)]
pub struct TemplateNormalizer {
    template: String,
    pattern: Regex,
    hash_groups: usize,
}

impl TemplateNormalizer {
    pub fn new(template: &str) -> Result<Self> {
        let (source, hash_groups) = template_pattern(template);
        let pattern = Regex::new(&source).map_err(|source| DiffError::InvalidTemplate {
            template: template.to_string(),
            source,
        })?;
        Ok(Self {
            template: template.to_string(),
            pattern,
            hash_groups,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Normalized name when `path` fits the template.
    pub fn try_normalize(&self, path: &str) -> Option<String> {
        let captures = self.pattern.captures(path)?;
        let ranges: Vec<Range<usize>> = (0..self.hash_groups)
            .filter_map(|index| captures.name(&format!("h{index}")))
            .map(|m| m.range())
            .collect();
        Some(remove_hashes(path, &ranges))
    }
}

impl AssetNameNormalizer for TemplateNormalizer {
    fn normalize(&self, path: &str) -> String {
        self.try_normalize(path).unwrap_or_else(|| path.to_string())
    }
}

/// Regex source for a template, with each hash placeholder captured as
/// `h0`, `h1`, ...
fn template_pattern(template: &str) -> (String, usize) {
    let mut source = String::from("^");
    let mut hashes = 0;
    let mut rest = template;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|i| open + i) else {
            break;
        };
        let (name, length) = match rest[open + 1..close].split_once(':') {
            Some((name, length)) => (name, Some(length)),
            None => (&rest[open + 1..close], None),
        };
        let fragment = match name {
            "name" => ".+?".to_string(),
            "id" => "[0-9A-Za-z_~-]+?".to_string(),
            "ext" => r"\.[0-9A-Za-z]+".to_string(),
            "query" => r"(?:\?.*)?".to_string(),
            "hash" | "contenthash" | "chunkhash" | "fullhash" => {
                let quantifier = length.map_or_else(|| "{4,}".to_string(), |n| format!("{{{n}}}"));
                hashes += 1;
                format!("(?P<h{}>[0-9A-Za-z_-]{quantifier})", hashes - 1)
            }
            _ => regex::escape(&rest[open..=close]),
        };
        source.push_str(&regex::escape(&rest[..open]));
        source.push_str(&fragment);
        rest = &rest[close + 1..];
    }
    source.push_str(&regex::escape(rest));
    source.push('$');
    (source, hashes)
}

/// Strips generic hash segments: any segment of the file name after the
/// first, separated by `.`, `-`, `_` or `~`, that is at least four hex
/// characters long and contains a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicNormalizer;

impl AssetNameNormalizer for HeuristicNormalizer {
    fn normalize(&self, path: &str) -> String {
        let file_start = path.rfind('/').map_or(0, |index| index + 1);
        let file = &path[file_start..];
        let segments = segments(file);
        let last = segments.len().saturating_sub(1);
        let ranges: Vec<Range<usize>> = segments
            .into_iter()
            .enumerate()
            .filter(|(index, segment)| {
                *index > 0 && *index < last && looks_like_hash(&file[segment.clone()])
            })
            .map(|(_, segment)| file_start + segment.start..file_start + segment.end)
            .collect();
        remove_hashes(path, &ranges)
    }
}

/// Byte ranges of the separator-delimited, non-empty segments of `file`.
fn segments(file: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (index, c) in file.char_indices() {
        if SEPARATORS.contains(&c) {
            if index > start {
                ranges.push(start..index);
            }
            start = index + c.len_utf8();
        }
    }
    if file.len() > start {
        ranges.push(start..file.len());
    }
    ranges
}

fn looks_like_hash(segment: &str) -> bool {
    segment.len() >= 4
        && segment.chars().all(|c| c.is_ascii_hexdigit())
        && segment.chars().any(|c| c.is_ascii_digit())
}

/// Remove each range together with the separator before it, or after it
/// when the range opens the file name.
fn remove_hashes(path: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(path.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor {
            continue;
        }
        let mut start = range.start;
        let mut end = range.end;
        let before = path[cursor..start].chars().next_back();
        if before.is_some_and(|c| SEPARATORS.contains(&c)) {
            start -= 1;
        } else if path[end..].starts_with(SEPARATORS) {
            end += 1;
        }
        out.push_str(&path[cursor..start]);
        cursor = end;
    }
    out.push_str(&path[cursor..]);
    out
}

/// Template first, heuristic for names the template does not describe.
#[derive(Debug, Clone, Default)]
pub struct DefaultNormalizer {
    template: Option<TemplateNormalizer>,
}

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: &str) -> Result<Self> {
        Ok(Self {
            template: Some(TemplateNormalizer::new(template)?),
        })
    }
}

impl AssetNameNormalizer for DefaultNormalizer {
    fn normalize(&self, path: &str) -> String {
        self.template
            .as_ref()
            .and_then(|template| template.try_normalize(path))
            .unwrap_or_else(|| HeuristicNormalizer.normalize(path))
    }
}
