//! The stats transform.
//!
//! Passes run in a fixed order over one `&mut BuildGraph`:
//!
//! 1. chunks and their files
//! 2. modules (top-level, chunk-nested and concatenated members), deduplicated
//!    by external identifier
//! 3. dependency edges from `reasons`
//! 4. assets and entrypoints
//! 5. issuer paths
//! 6. tree-shaking overlay from `providedExports`/`usedExports`
//!
//! Every pass tolerates missing references by dropping them. Applying the same
//! document twice leaves the graph unchanged.

mod chunks;
mod dependencies;
mod issuers;
mod modules;
mod overlay;

use std::path::PathBuf;

use tally_graph::{BuildGraph, ChunkId};

use crate::options::TransformOptions;
use crate::stats::{StatsCompilation, StatsModule};

/// Counters describing one transform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub modules_added: usize,
    pub modules_merged: usize,
    /// Runtime modules and modules without an identifier.
    pub modules_skipped: usize,
    pub dependencies_added: usize,
    /// Reasons whose referencing module is unknown.
    pub reasons_dropped: usize,
    pub chunks: usize,
    pub assets: usize,
    pub assets_skipped: usize,
    pub bailouts_filtered: usize,
}

/// A module entry found anywhere in the document.
#[derive(Clone, Copy)]
pub(crate) struct ModuleEntry<'s> {
    pub stats: &'s StatsModule,
    /// Chunk the entry was listed under, for chunk-nested entries.
    pub chunk: Option<ChunkId>,
    /// Index of the containing concatenation entry.
    pub container: Option<usize>,
}

pub(crate) struct Transformer<'a> {
    graph: &'a mut BuildGraph,
    options: &'a TransformOptions,
    /// Directory relative module names are resolved against.
    root: PathBuf,
    report: TransformReport,
}

impl<'a> Transformer<'a> {
    pub(crate) fn new(
        graph: &'a mut BuildGraph,
        options: &'a TransformOptions,
        root: PathBuf,
    ) -> Self {
        Self {
            graph,
            options,
            root,
            report: TransformReport::default(),
        }
    }

    pub(crate) fn run(mut self, stats: &StatsCompilation) -> TransformReport {
        self.add_chunks(stats);
        let entries = self.collect_module_entries(stats);
        let ids = self.add_modules(&entries);
        self.add_dependencies(&entries, &ids);
        self.add_assets(stats);
        self.add_entrypoints(stats);
        self.resolve_issuers();
        self.apply_export_usage(&entries, &ids);
        self.report
    }

    /// Flatten top-level, chunk-nested and concatenated module entries.
    fn collect_module_entries<'s>(&self, stats: &'s StatsCompilation) -> Vec<ModuleEntry<'s>> {
        let mut entries = Vec::new();
        for module in &stats.modules {
            push_entry(&mut entries, module, None, None);
        }
        for chunk in &stats.chunks {
            let chunk_id = chunk.id.as_ref().and_then(|id| self.chunk_id(id));
            for module in &chunk.modules {
                push_entry(&mut entries, module, chunk_id, None);
            }
        }
        entries
    }

    /// External identifier of a module entry, or `None` when it must be skipped.
    fn identifier_of(&self, stats: &StatsModule) -> Option<String> {
        let identifier = stats
            .identifier
            .clone()
            .or_else(|| stats.id.as_ref().map(ToString::to_string))?;
        if identifier.is_empty()
            || self.options.is_runtime_identifier(&identifier)
            || stats.module_type.as_deref() == Some("runtime")
        {
            return None;
        }
        Some(identifier)
    }
}

fn push_entry<'s>(
    entries: &mut Vec<ModuleEntry<'s>>,
    stats: &'s StatsModule,
    chunk: Option<ChunkId>,
    container: Option<usize>,
) {
    let index = entries.len();
    entries.push(ModuleEntry {
        stats,
        chunk,
        container,
    });
    for member in &stats.modules {
        push_entry(entries, member, chunk, Some(index));
    }
}
