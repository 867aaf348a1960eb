use super::{add_module, sample_graph};
use crate::BuildGraph;

#[test]
fn test_use_propagates_up_reexport_chain() {
    let graph = sample_graph();
    let mg = &graph.module_graph;
    let lib = mg.module_by_identifier("./node_modules/lib/index.js").unwrap();
    let util = mg.module_by_identifier("./src/util.js|inner").unwrap();

    let origin = mg.export_by_name(lib.id, "default").unwrap();
    let reexport = mg.export_by_name(util.id, "default").unwrap();
    assert!(reexport.is_reexport());
    assert_eq!(mg.recursive_export(reexport.id), Some(origin.id));
    assert!(mg.export_is_used(reexport.id));
    assert!(mg.export_is_used(origin.id));

    let unused: Vec<_> = mg.unused_exports(lib.id).iter().map(|e| e.name.clone()).collect();
    assert_eq!(unused, vec!["unused"]);
}

#[test]
fn test_variable_used_through_export() {
    let graph = sample_graph();
    let mg = &graph.module_graph;
    let variable = mg.variables().find(|v| v.name == "main").unwrap();
    assert!(mg.variable_is_used(variable.id));

    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js");
    let mg = &mut graph.module_graph;
    let export = mg.add_export(a, "x").unwrap();
    let local = mg.add_variable(a, "x", Some(export)).unwrap();
    let unexported = mg.add_variable(a, "y", None).unwrap();
    assert!(!mg.variable_is_used(local));
    assert!(!mg.variable_is_used(unexported));
}

#[test]
fn test_cyclic_reexport_chain_terminates() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js");
    let b = add_module(&mut graph, "b", "/app/b.js");
    let mg = &mut graph.module_graph;

    let ea = mg.add_export(a, "x").unwrap();
    let eb = mg.add_export(b, "x").unwrap();
    mg.set_export_from(ea, eb);
    mg.set_export_from(eb, ea);

    let chain = mg.reexport_chain(ea);
    assert_eq!(chain, vec![ea, eb]);

    let use_site = mg.add_side_effect(a, "x").unwrap();
    assert!(mg.link_side_effect(use_site, ea));
    assert!(mg.export_is_used(eb));
}

#[test]
fn test_long_chain_capped_by_depth() {
    let mut graph = BuildGraph::new("/app");
    let mut exports = Vec::new();
    for i in 0..10 {
        let m = add_module(&mut graph, &format!("m{i}"), &format!("/app/m{i}.js"));
        exports.push(graph.module_graph.add_export(m, "x").unwrap());
    }
    let mg = &mut graph.module_graph;
    for pair in exports.windows(2) {
        mg.set_export_from(pair[0], pair[1]);
    }

    assert_eq!(mg.recursive_export(exports[0]), Some(exports[9]));

    mg.set_max_reexport_depth(3);
    assert_eq!(mg.reexport_chain(exports[0]).len(), 4);
    assert_eq!(mg.recursive_export(exports[0]), Some(exports[3]));
}

#[test]
fn test_overlay_records_are_deduplicated() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js");
    let mg = &mut graph.module_graph;

    assert_eq!(mg.add_export(a, "x"), mg.add_export(a, "x"));
    assert_eq!(mg.add_side_effect(a, "x"), mg.add_side_effect(a, "x"));
    assert_eq!(mg.add_variable(a, "x", None), mg.add_variable(a, "x", None));
    assert_eq!(mg.exports().count(), 1);
    assert_eq!(mg.graph_module(a).unwrap().side_effects.len(), 1);
}

#[test]
fn test_overlay_requires_known_module() {
    let mut graph = BuildGraph::new("/app");
    let mg = &mut graph.module_graph;
    assert!(mg.add_export(crate::ModuleId::new(7), "x").is_none());
    assert!(mg.graph_module(crate::ModuleId::new(7)).is_none());
}
