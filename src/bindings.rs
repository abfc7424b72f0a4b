use swc_core::ecma::{
    ast::*,
    visit::{Visit, VisitWith},
};

use crate::rules::BindingSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    Default,
    /// Exported name as written in the source module
    Named(String),
    Namespace,
}

/// A local name bound to an export of `module_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub module_name: String,
    pub local: Id,
    pub kind: BindingKind,
}

/// Every binding one file holds on one module.
#[derive(Debug, Clone, Default)]
pub struct ResolvedImports {
    /// The module is imported at all, even if only for side effects or types.
    pub present: bool,
    pub bindings: Vec<ImportBinding>,
}

impl ResolvedImports {
    /// First local bound to the default export.
    pub fn default_local(&self) -> Option<&Id> {
        self.bindings
            .iter()
            .find(|b| b.kind == BindingKind::Default)
            .map(|b| &b.local)
    }

    /// First local bound to `exported`, which may be an alias.
    pub fn named_local(&self, exported: &str) -> Option<&Id> {
        self.bindings
            .iter()
            .find(|b| matches!(&b.kind, BindingKind::Named(name) if name == exported))
            .map(|b| &b.local)
    }

    /// All locals bound directly to what `selector` names.
    pub fn locals(&self, selector: &BindingSelector) -> Vec<&Id> {
        self.bindings
            .iter()
            .filter(|b| match (&b.kind, selector) {
                (BindingKind::Default, BindingSelector::Default) => true,
                (BindingKind::Named(name), BindingSelector::Named(wanted)) => name == wanted,
                _ => false,
            })
            .map(|b| &b.local)
            .collect()
    }

    pub fn namespace_locals(&self) -> impl Iterator<Item = &Id> {
        self.bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Namespace)
            .map(|b| &b.local)
    }
}

/// Resolve the local names `module` binds to `module_name`.
pub fn resolve(module: &Module, module_name: &str) -> ResolvedImports {
    let mut collector = ImportCollector {
        module_name,
        out: ResolvedImports::default(),
    };
    module.visit_with(&mut collector);
    collector.out
}

struct ImportCollector<'a> {
    module_name: &'a str,
    out: ResolvedImports,
}

impl<'a> Visit for ImportCollector<'a> {
    // Imports only live at the top level.
    fn visit_stmt(&mut self, _: &Stmt) {}

    fn visit_import_decl(&mut self, n: &ImportDecl) {
        if n.src.value.to_string() != self.module_name {
            return;
        }
        self.out.present = true;
        if n.type_only {
            return;
        }
        for s in &n.specifiers {
            let (local, kind) = match s {
                ImportSpecifier::Named(named) => {
                    if named.is_type_only {
                        continue;
                    }
                    let imported = named
                        .imported
                        .as_ref()
                        .map(|i| match i {
                            ModuleExportName::Ident(i) => i.sym.to_string(),
                            ModuleExportName::Str(s) => s.value.to_string(),
                        })
                        .unwrap_or_else(|| named.local.sym.to_string());
                    let kind = if imported == "default" {
                        BindingKind::Default
                    } else {
                        BindingKind::Named(imported)
                    };
                    (named.local.to_id(), kind)
                }
                ImportSpecifier::Default(def) => (def.local.to_id(), BindingKind::Default),
                ImportSpecifier::Namespace(ns) => (ns.local.to_id(), BindingKind::Namespace),
            };
            self.out.bindings.push(ImportBinding {
                module_name: self.module_name.to_string(),
                local,
                kind,
            });
        }
    }
}
