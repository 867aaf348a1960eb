use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{DependencyId, ModuleId};

/// How a dependency was introduced in the dependent module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[default]
    Unknown,
    /// `import x from '...'`
    ImportStatement,
    /// `export { x } from '...'`
    ExportImport,
    /// `require('...')`
    RequireCall,
    /// `import('...')`
    DynamicImport,
    /// `require(['...'], cb)`
    AmdRequire,
}

impl DependencyKind {
    /// Map a bundler reason type (`"harmony import specifier"`, `"cjs require"`, ...).
    pub fn from_reason_type(reason: &str) -> Self {
        let reason = reason.to_ascii_lowercase();
        if reason.contains("import()") || reason.contains("dynamic") {
            Self::DynamicImport
        } else if reason.contains("export") && reason.contains("import") {
            Self::ExportImport
        } else if reason.contains("harmony") || reason.contains("esm") || reason.contains("import")
        {
            Self::ImportStatement
        } else if reason.contains("amd") {
            Self::AmdRequire
        } else if reason.contains("require") || reason.contains("cjs") {
            Self::RequireCall
        } else {
            Self::Unknown
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::DynamicImport)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::ImportStatement => "import",
            Self::ExportImport => "export-import",
            Self::RequireCall => "require",
            Self::DynamicImport => "dynamic-import",
            Self::AmdRequire => "amd-require",
        };
        f.write_str(name)
    }
}

/// One-based line, zero-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Option<Position>,
}

impl SourceRange {
    /// Parse a bundler location string.
    ///
    /// Accepted shapes: `"3:0-27"`, `"3:0-5:2"`, `"12"`, `"3-5"`. Anything else
    /// (e.g. `"main"` for entry reasons) yields `None`.
    pub fn parse_loc(loc: &str) -> Option<Self> {
        let loc = loc.trim();
        let (start, end) = match loc.split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (loc, None),
        };
        let start = parse_position(start)?;
        let end = match end {
            None => None,
            Some(end) if end.contains(':') => Some(parse_position(end)?),
            Some(end) => {
                let value: u32 = end.parse().ok()?;
                // `3:0-27` is a column on the start line, `3-5` a line range
                if start.column.is_some() {
                    Some(Position {
                        line: start.line,
                        column: Some(value),
                    })
                } else {
                    Some(Position {
                        line: value,
                        column: None,
                    })
                }
            }
        };
        Some(Self { start, end })
    }
}

fn parse_position(text: &str) -> Option<Position> {
    match text.split_once(':') {
        Some((line, column)) => Some(Position {
            line: line.parse().ok()?,
            column: Some(column.parse().ok()?),
        }),
        None => Some(Position {
            line: text.parse().ok()?,
            column: None,
        }),
    }
}

/// A statement range in transformed coordinates, plus the original range
/// once a source map has been consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementPosition {
    pub transformed: SourceRange,
    #[serde(default)]
    pub source: Option<SourceRange>,
}

/// The import site of a dependency inside its owning module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub module: ModuleId,
    pub position: StatementPosition,
}

impl Statement {
    pub fn new(module: ModuleId, transformed: SourceRange) -> Self {
        Self {
            module,
            position: StatementPosition {
                transformed,
                source: None,
            },
        }
    }
}

/// A directed edge owned by the dependent module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub request: String,
    /// Resolved file path of the target, when known.
    pub resolved_request: String,
    pub kind: DependencyKind,
    /// The dependent (owning) module.
    pub module: ModuleId,
    /// Logical target: the concatenation root when the target was hoisted.
    pub dependency: ModuleId,
    /// The module the request literally resolved to.
    pub original_dependency: ModuleId,
    pub statements: Vec<Statement>,
}

impl Dependency {
    /// Record another import site, ignoring exact duplicates.
    pub fn add_statement(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            return false;
        }
        self.statements.push(statement);
        true
    }

    /// True when the logical target differs from the literal one.
    pub fn is_hoisted_target(&self) -> bool {
        self.dependency != self.original_dependency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loc_column_range() {
        let range = SourceRange::parse_loc("3:0-27").unwrap();
        assert_eq!(range.start.line, 3);
        assert_eq!(range.start.column, Some(0));
        let end = range.end.unwrap();
        assert_eq!(end.line, 3);
        assert_eq!(end.column, Some(27));
    }

    #[test]
    fn test_parse_loc_multiline() {
        let range = SourceRange::parse_loc("3:4-5:2").unwrap();
        assert_eq!(
            range.end,
            Some(Position {
                line: 5,
                column: Some(2)
            })
        );
    }

    #[test]
    fn test_parse_loc_line_only() {
        let range = SourceRange::parse_loc("12").unwrap();
        assert_eq!(range.start.line, 12);
        assert!(range.end.is_none());

        let range = SourceRange::parse_loc("3-5").unwrap();
        assert_eq!(range.end.unwrap().line, 5);
    }

    #[test]
    fn test_parse_loc_rejects_names() {
        assert!(SourceRange::parse_loc("main").is_none());
        assert!(SourceRange::parse_loc("").is_none());
    }

    #[test]
    fn test_kind_from_reason_type() {
        assert_eq!(
            DependencyKind::from_reason_type("harmony side effect evaluation"),
            DependencyKind::ImportStatement
        );
        assert_eq!(
            DependencyKind::from_reason_type("harmony export imported specifier"),
            DependencyKind::ExportImport
        );
        assert_eq!(
            DependencyKind::from_reason_type("import()"),
            DependencyKind::DynamicImport
        );
        assert_eq!(
            DependencyKind::from_reason_type("cjs require"),
            DependencyKind::RequireCall
        );
        assert_eq!(
            DependencyKind::from_reason_type("entry"),
            DependencyKind::Unknown
        );
    }

    #[test]
    fn test_add_statement_dedupes() {
        let module = ModuleId::new(1);
        let mut dep = Dependency {
            id: DependencyId::new(1),
            request: "./b".into(),
            resolved_request: "/app/b.js".into(),
            kind: DependencyKind::ImportStatement,
            module,
            dependency: ModuleId::new(2),
            original_dependency: ModuleId::new(2),
            statements: Vec::new(),
        };
        let range = SourceRange::parse_loc("1:0-20").unwrap();
        assert!(dep.add_statement(Statement::new(module, range)));
        assert!(!dep.add_statement(Statement::new(module, range)));
        assert_eq!(dep.statements.len(), 1);
    }
}
