mod overlay_tests;
mod property_tests;

use crate::{BuildGraph, DependencyKind, Module, ModuleId, SourceRange, Statement};
use std::path::Path;

pub(crate) fn add_module(graph: &mut BuildGraph, identifier: &str, path: &str) -> ModuleId {
    let id = graph.module_graph.next_module_id();
    graph
        .module_graph
        .add_module(Module::builder(id, identifier, path).build())
}

/// A small build: an entry, a concatenation of two files, a lazily loaded
/// chunk and one third-party package shared by both chunks.
pub(crate) fn sample_graph() -> BuildGraph {
    let mut graph = BuildGraph::new("/app");

    let entry = add_module(&mut graph, "./src/index.js", "/app/src/index.js");
    let concat = add_module(
        &mut graph,
        "./src/util.js + 1 modules",
        "/app/src/util.js",
    );
    let util = add_module(&mut graph, "./src/util.js|inner", "/app/src/util.js");
    let helper = add_module(&mut graph, "./src/helper.js", "/app/src/helper.js");
    let lazy = add_module(&mut graph, "./src/lazy.js", "/app/src/lazy.js");
    let lib = add_module(
        &mut graph,
        "./node_modules/lib/index.js",
        "/app/node_modules/lib/index.js",
    );

    let mg = &mut graph.module_graph;
    mg.module_mut(entry).unwrap().is_entry = true;
    mg.add_concatenation_member(concat, util);
    mg.add_concatenation_member(concat, helper);

    let dep = mg
        .add_dependency(entry, util, "./util", DependencyKind::ImportStatement)
        .unwrap();
    mg.add_statement(
        dep,
        Statement::new(entry, SourceRange::parse_loc("1:0-30").unwrap()),
    );
    mg.add_dependency(entry, lazy, "./lazy", DependencyKind::DynamicImport);
    mg.add_dependency(entry, lib, "lib", DependencyKind::ImportStatement);
    mg.add_dependency(lazy, lib, "lib", DependencyKind::ImportStatement);

    let cg = &mut graph.chunk_graph;
    let main = cg.ensure_chunk("0", "main");
    let lazy_chunk = cg.ensure_chunk("1", "lazy");
    cg.chunk_mut(main).unwrap().initial = true;
    cg.chunk_mut(main).unwrap().entry = true;
    cg.link_chunks(main, lazy_chunk);
    let main_js = cg.ensure_asset("main.3f2a9c1b.js", 1000);
    let lazy_js = cg.ensure_asset("lazy.9e8d7c6b.js", 200);
    cg.asset_mut(main_js).unwrap().content = Some("console.log(1);".into());
    cg.link_asset(main, main_js);
    cg.link_asset(lazy_chunk, lazy_js);
    let ep = cg.ensure_entrypoint("main");
    cg.link_entrypoint_chunk(ep, main);

    for (module, chunk) in [
        (entry, main),
        (concat, main),
        (util, main),
        (helper, main),
        (lib, main),
        (lazy, lazy_chunk),
        (lib, lazy_chunk),
    ] {
        graph.chunk_graph.add_module_to_chunk(chunk, module);
        graph.module_graph.module_mut(module).unwrap().add_chunk(chunk);
    }

    let mg = &mut graph.module_graph;
    let exported = mg.add_export(lib, "default").unwrap();
    mg.add_export(lib, "unused").unwrap();
    let reexport = mg.add_export(util, "default").unwrap();
    mg.set_export_from(reexport, exported);
    let use_site = mg.add_side_effect(entry, "default").unwrap();
    mg.link_side_effect(use_site, reexport);
    mg.add_variable(lib, "main", Some(exported));

    let pg = &mut graph.package_graph;
    let app = pg.ensure_package("app", "1.0.0", Path::new("/app"));
    let lib_pkg = pg.ensure_package("lib", "2.0.0", Path::new("/app/node_modules/lib"));
    for module in [entry, util, helper, lazy] {
        pg.add_module(app, module);
    }
    pg.add_module(lib_pkg, lib);
    let dep = graph
        .module_graph
        .dependencies_of(entry)
        .into_iter()
        .find(|d| d.dependency == lib)
        .map(|d| d.id)
        .unwrap();
    graph.package_graph.add_dependency(app, lib_pkg, dep);

    graph
}
