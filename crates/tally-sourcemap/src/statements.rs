//! Original coordinates for dependency statements.

use tally_graph::{ModuleGraph, ModuleId, Position, SourceRange};

use crate::Result;
use crate::map::{TokenIndex, parse_map};

/// Fill the original range of every statement located in `module`, using the
/// module's own map from transformed to original code.
///
/// Statements that already carry an original range are left alone. Returns
/// how many statements were mapped.
pub fn map_statement_positions(
    graph: &mut ModuleGraph,
    module: ModuleId,
    map_json: &str,
) -> Result<usize> {
    let map = parse_map(map_json)?;
    let index = TokenIndex::new(&map);
    let dependencies = graph
        .dependencies()
        .filter(|dep| dep.statements.iter().any(|s| s.module == module))
        .map(|dep| dep.id)
        .collect::<Vec<_>>();

    let mut mapped = 0;
    for id in dependencies {
        let Some(dependency) = graph.dependency_mut(id) else {
            continue;
        };
        for statement in &mut dependency.statements {
            if statement.module != module || statement.position.source.is_some() {
                continue;
            }
            let transformed = statement.position.transformed;
            let Some(start) = original_position(&index, transformed.start) else {
                continue;
            };
            let end = transformed
                .end
                .and_then(|end| original_position(&index, end));
            statement.position.source = Some(SourceRange { start, end });
            mapped += 1;
        }
    }
    tracing::debug!(?module, mapped, "statement positions mapped");
    Ok(mapped)
}

/// One-based positions in, one-based positions out.
fn original_position(index: &TokenIndex, position: Position) -> Option<Position> {
    let line = position.line.checked_sub(1)?;
    let (src_line, src_col) = index.lookup(line, position.column.unwrap_or(0))?;
    Some(Position {
        line: src_line + 1,
        column: position.column.map(|_| src_col),
    })
}
