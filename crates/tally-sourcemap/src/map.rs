//! Slicing a generated file by its source map.

use std::path::PathBuf;

use oxc_sourcemap::SourceMap;
use rustc_hash::FxHashMap;
use tally_graph::collections::FxIndexMap;

use crate::resolve::ResolvedPaths;
use crate::{Result, SourceMapError};

/// Parse a map and reject one without any mapping.
pub fn parse_map(json: &str) -> Result<SourceMap> {
    let map =
        SourceMap::from_json_string(json).map_err(|e| SourceMapError::Invalid(e.to_string()))?;
    if map.get_tokens().next().is_none() {
        return Err(SourceMapError::NoMappings);
    }
    Ok(map)
}

/// Generated code of one asset, split by original source.
#[derive(Debug, Default)]
pub struct AssetSlices {
    /// Attributed text per resolved source path, in first-seen order.
    pub slices: FxIndexMap<PathBuf, String>,
    /// `sourcesContent` per resolved source path.
    pub sources_content: FxHashMap<PathBuf, String>,
    pub mappings: usize,
}

/// Attribute every byte of `code` that a mapping covers to that mapping's
/// source.
///
/// Mappings are grouped by generated line and sorted by column. A mapping
/// owns the text from its column to the next mapping's column on the same
/// line, or to the end of the line including the terminator. Text before the
/// first mapping of a line and text under source-less mappings is not
/// attributed. Columns count UTF-16 code units.
pub fn slice_asset(code: &str, map: &SourceMap, paths: &mut ResolvedPaths<'_>) -> AssetSlices {
    let lines: Vec<&str> = code.split_inclusive('\n').collect();
    let mut by_line: Vec<Vec<(u32, Option<u32>)>> = vec![Vec::new(); lines.len()];
    let mut out = AssetSlices::default();

    for token in map.get_tokens() {
        out.mappings += 1;
        if let Some(line) = by_line.get_mut(token.get_dst_line() as usize) {
            line.push((token.get_dst_col(), token.get_source_id()));
        }
    }

    for (text, tokens) in lines.iter().zip(by_line.iter_mut()) {
        if tokens.is_empty() {
            continue;
        }
        // a mapping with a source wins over a bare one at the same column
        tokens.sort_by_key(|(column, source)| (*column, source.is_none()));
        tokens.dedup_by_key(|(column, _)| *column);
        let offsets = LineOffsets::new(text);

        for (index, (column, source_id)) in tokens.iter().enumerate() {
            let Some(source_id) = *source_id else {
                continue;
            };
            let start = offsets.byte(*column);
            let end = tokens
                .get(index + 1)
                .map_or(text.len(), |(next, _)| offsets.byte(*next));
            if start >= end {
                continue;
            }
            let Some(path) = map
                .get_source(source_id)
                .map(|source| as_str(source))
                .and_then(|source| paths.resolve(source))
            else {
                continue;
            };
            match out.slices.get_mut(path) {
                Some(slice) => slice.push_str(&text[start..end]),
                None => {
                    out.slices.insert(path.to_path_buf(), text[start..end].to_string());
                }
            }
        }
    }

    for (source_id, source) in map.get_sources().enumerate() {
        let Ok(source_id) = u32::try_from(source_id) else {
            break;
        };
        let Some(content) = map.get_source_content(source_id).map(|c| as_str(c)) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        if let Some(path) = paths.resolve(as_str(source)) {
            out.sources_content
                .entry(path.to_path_buf())
                .or_insert_with(|| content.to_string());
        }
    }
    out
}

/// Original positions of a map's mappings, indexed by generated line.
#[derive(Debug)]
pub struct TokenIndex {
    lines: Vec<Vec<(u32, u32, u32)>>,
}

impl TokenIndex {
    pub fn new(map: &SourceMap) -> Self {
        let mut lines: Vec<Vec<(u32, u32, u32)>> = Vec::new();
        for token in map.get_tokens() {
            if token.get_source_id().is_none() {
                continue;
            }
            let line = token.get_dst_line() as usize;
            if lines.len() <= line {
                lines.resize_with(line + 1, Vec::new);
            }
            lines[line].push((token.get_dst_col(), token.get_src_line(), token.get_src_col()));
        }
        for line in &mut lines {
            line.sort_by_key(|(column, _, _)| *column);
        }
        Self { lines }
    }

    /// Original `(line, column)` of the mapping covering a zero-based
    /// generated position: the last mapping at or before `column`.
    pub fn lookup(&self, line: u32, column: u32) -> Option<(u32, u32)> {
        let tokens = self.lines.get(line as usize)?;
        let index = tokens.partition_point(|(c, _, _)| *c <= column);
        let (_, src_line, src_col) = tokens.get(index.checked_sub(1)?)?;
        Some((*src_line, *src_col))
    }
}

/// UTF-16 column to byte offset conversion for one line.
struct LineOffsets<'a> {
    text: &'a str,
    /// Byte offset of every UTF-16 unit; empty for ASCII lines.
    units: Vec<usize>,
}

impl<'a> LineOffsets<'a> {
    fn new(text: &'a str) -> Self {
        let mut units = Vec::new();
        if !text.is_ascii() {
            for (byte, ch) in text.char_indices() {
                for _ in 0..ch.len_utf16() {
                    units.push(byte);
                }
            }
        }
        Self { text, units }
    }

    fn byte(&self, column: u32) -> usize {
        let column = column as usize;
        if self.units.is_empty() {
            return column.min(self.text.len());
        }
        self.units.get(column).copied().unwrap_or(self.text.len())
    }
}

/// Source names are `&str` or `&Arc<str>` depending on the map API.
fn as_str<S: AsRef<str> + ?Sized>(value: &S) -> &str {
    value.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{MapContext, SourcePathResolver};

    fn slices(code: &str, map: &str) -> AssetSlices {
        let map = parse_map(map).unwrap();
        let resolver = SourcePathResolver::new("/app");
        let mut paths = ResolvedPaths::new(&resolver, MapContext::default());
        slice_asset(code, &map, &mut paths)
    }

    #[test]
    fn test_single_mapping_covers_line() {
        let out = slices(
            "export const a=1;\n",
            r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA"}"#,
        );
        assert_eq!(out.slices[&PathBuf::from("/app/a.js")], "export const a=1;\n");
        assert_eq!(out.mappings, 1);
    }

    #[test]
    fn test_mappings_split_a_line() {
        // "AAAA" at col 0 from a.js, "MCAA" at col 6 from b.js
        let out = slices(
            "var a;var b;",
            r#"{"version":3,"sources":["a.js","b.js"],"names":[],"mappings":"AAAA,MCAA"}"#,
        );
        assert_eq!(out.slices[&PathBuf::from("/app/a.js")], "var a;");
        assert_eq!(out.slices[&PathBuf::from("/app/b.js")], "var b;");
    }

    #[test]
    fn test_sourced_mapping_wins_at_shared_column() {
        // "A" is a bare mapping at col 0, "AAAA" maps the same col to a.js
        let out = slices(
            "var a;\n",
            r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"A,AAAA"}"#,
        );
        assert_eq!(out.slices[&PathBuf::from("/app/a.js")], "var a;\n");
    }

    #[test]
    fn test_utf16_columns() {
        // "é" is one UTF-16 unit and two bytes; second mapping at col 8
        let out = slices(
            "var é=1;var b;",
            r#"{"version":3,"sources":["a.js","b.js"],"names":[],"mappings":"AAAA,QCAA"}"#,
        );
        assert_eq!(out.slices[&PathBuf::from("/app/a.js")], "var é=1;");
        assert_eq!(out.slices[&PathBuf::from("/app/b.js")], "var b;");
    }

    #[test]
    fn test_sources_content_collected() {
        let out = slices(
            "x",
            r#"{"version":3,"sources":["a.js"],"sourcesContent":["const x = 1"],"names":[],"mappings":"AAAA"}"#,
        );
        assert_eq!(out.sources_content[&PathBuf::from("/app/a.js")], "const x = 1");
    }

    #[test]
    fn test_map_without_mappings_rejected() {
        let err = parse_map(r#"{"version":3,"sources":[],"names":[],"mappings":""}"#).unwrap_err();
        assert!(matches!(err, SourceMapError::NoMappings));
        assert!(matches!(parse_map("{"), Err(SourceMapError::Invalid(_))));
    }

    #[test]
    fn test_token_index_lookup() {
        // line 0: col 0 -> a.js 0:0, col 6 -> a.js 1:0
        let map = parse_map(
            r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA,MACA"}"#,
        )
        .unwrap();
        let index = TokenIndex::new(&map);
        assert_eq!(index.lookup(0, 0), Some((0, 0)));
        assert_eq!(index.lookup(0, 7), Some((1, 0)));
        assert_eq!(index.lookup(1, 0), None);
    }
}
