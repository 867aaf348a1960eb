//! Mutation methods for ModuleGraph.

use super::ModuleGraph;
use crate::dependency::{Dependency, DependencyKind, Statement};
use crate::ids::{DependencyId, ModuleId};
use crate::module::{Module, ModuleKind, push_unique};

impl ModuleGraph {
    /// Allocate the id for a module about to be built.
    pub fn next_module_id(&mut self) -> ModuleId {
        self.module_ids.next_id()
    }

    /// Add a module into the graph.
    ///
    /// External identifiers are unique: if one is already present the
    /// existing id is returned and `module` is discarded.
    pub fn add_module(&mut self, module: Module) -> ModuleId {
        if let Some(existing) = self.by_identifier.get(&module.identifier) {
            tracing::debug!(identifier = %module.identifier, "module already present");
            return *existing;
        }
        self.module_ids.observe(module.id.raw());
        self.index_module(&module);
        let id = module.id;
        self.modules.insert(id, module);
        id
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    /// Set or replace a module's render id, keeping the lookup index in sync.
    pub fn set_render_id(&mut self, id: ModuleId, render_id: impl Into<String>) -> bool {
        let render_id = render_id.into();
        let Some(module) = self.modules.get_mut(&id) else {
            return false;
        };
        if module.render_id.as_deref() == Some(render_id.as_str()) {
            return false;
        }
        if let Some(old) = module.render_id.replace(render_id.clone()) {
            self.by_render_id.remove(&old);
        }
        self.by_render_id.insert(render_id, id);
        true
    }

    /// Attach `member` to the concatenation `root`.
    ///
    /// The root becomes a `Concatenation` module. A concatenation is never
    /// accepted as a member, and a member keeps the first root it was given;
    /// later containers are only recorded in `concatenation_modules`.
    pub fn add_concatenation_member(&mut self, root: ModuleId, member: ModuleId) -> bool {
        if root == member {
            return false;
        }
        let Some(root_module) = self.modules.get(&root) else {
            return false;
        };
        if root_module.root_module.is_some() {
            tracing::warn!(
                root = %root_module.identifier,
                "nested concatenation ignored: container is itself a member"
            );
            return false;
        }
        let Some(member_module) = self.modules.get_mut(&member) else {
            return false;
        };
        if member_module.is_concatenation() {
            tracing::warn!(
                member = %member_module.identifier,
                "concatenation module cannot be a member of another"
            );
            return false;
        }

        push_unique(&mut member_module.concatenation_modules, root);
        let owned = match member_module.root_module {
            None => {
                member_module.root_module = Some(root);
                true
            }
            Some(existing) => existing == root,
        };

        if let Some(root_module) = self.modules.get_mut(&root) {
            root_module.kind = ModuleKind::Concatenation;
            if owned {
                push_unique(&mut root_module.modules, member);
            }
        }
        owned
    }

    /// Add a dependency edge from `owner` to `target`.
    ///
    /// Returns `None` when either endpoint is unknown or when the edge would
    /// point back into the owner's own scope. An edge with the same request,
    /// kind and logical target is reused.
    pub fn add_dependency(
        &mut self,
        owner: ModuleId,
        target: ModuleId,
        request: &str,
        kind: DependencyKind,
    ) -> Option<DependencyId> {
        if !self.modules.contains_key(&owner) {
            return None;
        }
        let target_module = self.modules.get(&target)?;
        let logical = target_module.root_module.unwrap_or(target);
        let resolved_request = target_module.path.to_string_lossy().into_owned();

        let owner_root = self.root_of(owner);
        if owner == target || owner == logical || owner_root == logical {
            return None;
        }

        if let Some(existing) = self.find_dependency(owner, request, kind, logical) {
            return Some(existing);
        }

        let id: DependencyId = self.dependency_ids.next_id();
        self.dependencies.insert(
            id,
            Dependency {
                id,
                request: request.to_string(),
                resolved_request,
                kind,
                module: owner,
                dependency: logical,
                original_dependency: target,
                statements: Vec::new(),
            },
        );
        if let Some(module) = self.modules.get_mut(&owner) {
            module.dependencies.push(id);
        }
        for imported in [logical, target] {
            if let Some(module) = self.modules.get_mut(&imported) {
                push_unique(&mut module.imported, owner);
            }
        }
        Some(id)
    }

    /// Accumulate an import site on an existing edge.
    pub fn add_statement(&mut self, dependency: DependencyId, statement: Statement) -> bool {
        self.dependencies
            .get_mut(&dependency)
            .is_some_and(|dep| dep.add_statement(statement))
    }

    pub fn dependency_mut(&mut self, id: DependencyId) -> Option<&mut Dependency> {
        self.dependencies.get_mut(&id)
    }

    fn find_dependency(
        &self,
        owner: ModuleId,
        request: &str,
        kind: DependencyKind,
        logical: ModuleId,
    ) -> Option<DependencyId> {
        let module = self.modules.get(&owner)?;
        module.dependencies.iter().copied().find(|id| {
            self.dependencies.get(id).is_some_and(|dep| {
                dep.request == request && dep.kind == kind && dep.dependency == logical
            })
        })
    }
}
