//! Fallback for assets without a usable map: locate module factories in the
//! bundle by parsing it.
//!
//! Bundlers emit a module table keyed by render id, either as an object
//! (`{"./src/a.js": (module) => {...}, 42: function(m) {...}}`) or as an array
//! of factories indexed by id. Any object or array whose entries are all
//! functions and whose keys include a known render id is taken as a table.

use std::ops::Range;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpression, ArrayExpressionElement, Expression, ObjectExpression, ObjectPropertyKind,
    PropertyKey,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use rustc_hash::FxHashSet;

/// Byte ranges of module factories found in `code`, keyed by render id.
///
/// Only entries whose key is in `known_ids` are returned. Code that fails to
/// parse yields nothing.
pub fn scan_bundle(code: &str, known_ids: &FxHashSet<&str>) -> Vec<(String, Range<usize>)> {
    if known_ids.is_empty() || code.is_empty() {
        return Vec::new();
    }
    for source_type in [SourceType::mjs(), SourceType::cjs()] {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            continue;
        }
        let mut visitor = ModuleTableVisitor {
            known_ids,
            found: Vec::new(),
        };
        visitor.visit_program(&ret.program);
        return visitor.found;
    }
    tracing::debug!(len = code.len(), "bundle could not be parsed");
    Vec::new()
}

struct ModuleTableVisitor<'k> {
    known_ids: &'k FxHashSet<&'k str>,
    found: Vec<(String, Range<usize>)>,
}

impl ModuleTableVisitor<'_> {
    /// Accept a candidate table when one of its keys is a known module.
    fn accept(&mut self, entries: Vec<(String, Span)>) -> bool {
        if !entries
            .iter()
            .any(|(key, _)| self.known_ids.contains(key.as_str()))
        {
            return false;
        }
        self.found.extend(
            entries
                .into_iter()
                .filter(|(key, _)| self.known_ids.contains(key.as_str()))
                .map(|(key, span)| (key, span.start as usize..span.end as usize)),
        );
        true
    }
}

impl<'a> Visit<'a> for ModuleTableVisitor<'_> {
    fn visit_object_expression(&mut self, it: &ObjectExpression<'a>) {
        if let Some(entries) = object_table(it) {
            if self.accept(entries) {
                return;
            }
        }
        walk::walk_object_expression(self, it);
    }

    fn visit_array_expression(&mut self, it: &ArrayExpression<'a>) {
        if let Some(entries) = array_table(it) {
            if self.accept(entries) {
                return;
            }
        }
        walk::walk_array_expression(self, it);
    }
}

fn object_table(object: &ObjectExpression<'_>) -> Option<Vec<(String, Span)>> {
    if object.properties.is_empty() {
        return None;
    }
    let mut entries = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        let ObjectPropertyKind::ObjectProperty(property) = property else {
            return None;
        };
        let span = factory_span(&property.value)?;
        let key = match &property.key {
            PropertyKey::StringLiteral(literal) => literal.value.to_string(),
            PropertyKey::NumericLiteral(literal) => number_key(literal.value),
            PropertyKey::StaticIdentifier(identifier) => identifier.name.to_string(),
            _ => return None,
        };
        entries.push((key, span));
    }
    Some(entries)
}

fn array_table(array: &ArrayExpression<'_>) -> Option<Vec<(String, Span)>> {
    let mut entries = Vec::new();
    for (index, element) in array.elements.iter().enumerate() {
        match element {
            ArrayExpressionElement::Elision(_) => {}
            ArrayExpressionElement::FunctionExpression(function) => {
                entries.push((index.to_string(), function.span));
            }
            ArrayExpressionElement::ArrowFunctionExpression(function) => {
                entries.push((index.to_string(), function.span));
            }
            ArrayExpressionElement::ParenthesizedExpression(inner) => {
                entries.push((index.to_string(), factory_span(&inner.expression)?));
            }
            _ => return None,
        }
    }
    (!entries.is_empty()).then_some(entries)
}

/// Span of a function expression, looking through parentheses.
fn factory_span(expression: &Expression<'_>) -> Option<Span> {
    match expression {
        Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {
            Some(expression.span())
        }
        Expression::ParenthesizedExpression(inner) => factory_span(&inner.expression),
        _ => None,
    }
}

fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64 {
        format!("{}", value as u64)
    } else {
        value.to_string()
    }
}
