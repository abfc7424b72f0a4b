//! Find-all-then-mutate matching.
//!
//! Occurrences are collected by a read-only pass into a [`MatchSet`] before
//! anything is rewritten. A [`Location`] is the span of the original node:
//! spans are unique per node kind in a parsed file, and nodes the engine
//! synthesizes carry `DUMMY_SP`, so a location can never point at rewritten
//! output.

use std::collections::HashSet;

use swc_core::{
    common::{BytePos, Span, Spanned},
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::bindings::ResolvedImports;
use crate::rules::{BindingSelector, MatchPredicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Call,
    Element,
}

/// Identifies one original node by kind and source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub kind: NodeKind,
    pub lo: BytePos,
    pub hi: BytePos,
}

impl Location {
    pub fn of_call(n: &CallExpr) -> Self {
        Self::new(NodeKind::Call, n.span)
    }

    pub fn of_element(n: &JSXElement) -> Self {
        Self::new(NodeKind::Element, n.span)
    }

    fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            lo: span.lo(),
            hi: span.hi(),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.lo, self.hi)
    }
}

/// Ordered, frozen set of matched locations.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    locations: Vec<Location>,
    index: HashSet<Location>,
}

impl MatchSet {
    fn from_locations(locations: Vec<Location>) -> Self {
        let index = locations.iter().copied().collect();
        Self { locations, index }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.index.contains(location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }
}

/// Collect, in document order, the occurrences `predicate` selects among the
/// resolved bindings.
pub fn find_occurrences(
    module: &Module,
    imports: &ResolvedImports,
    predicate: &MatchPredicate,
) -> MatchSet {
    let mut locals: HashSet<Id> = HashSet::new();
    let mut members: HashSet<(Id, String)> = HashSet::new();
    for selector in predicate.bindings() {
        locals.extend(imports.locals(selector).into_iter().cloned());
        let export = match selector {
            BindingSelector::Default => "default",
            BindingSelector::Named(name) => name.as_str(),
        };
        for ns in imports.namespace_locals() {
            members.insert((ns.clone(), export.to_string()));
        }
    }

    let kind = match predicate {
        MatchPredicate::Call { .. } => NodeKind::Call,
        MatchPredicate::Element { .. } => NodeKind::Element,
    };
    let mut collector = OccurrenceCollector {
        kind,
        locals,
        members,
        out: vec![],
    };
    module.visit_with(&mut collector);
    MatchSet::from_locations(collector.out)
}

struct OccurrenceCollector {
    kind: NodeKind,
    locals: HashSet<Id>,
    /// `(namespace local, export)` for `ns.export` references
    members: HashSet<(Id, String)>,
    out: Vec<Location>,
}

impl OccurrenceCollector {
    fn is_target_expr(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(i) => self.locals.contains(&i.to_id()),
            Expr::Paren(p) => self.is_target_expr(&p.expr),
            Expr::Member(m) => match (&*m.obj, &m.prop) {
                (Expr::Ident(ns), MemberProp::Ident(prop)) => self
                    .members
                    .contains(&(ns.to_id(), prop.sym.to_string())),
                _ => false,
            },
            _ => false,
        }
    }

    fn is_target_name(&self, name: &JSXElementName) -> bool {
        match name {
            JSXElementName::Ident(i) => self.locals.contains(&i.to_id()),
            JSXElementName::JSXMemberExpr(m) => match &m.obj {
                JSXObject::Ident(ns) => self
                    .members
                    .contains(&(ns.to_id(), m.prop.sym.to_string())),
                JSXObject::JSXMemberExpr(_) => false,
            },
            JSXElementName::JSXNamespacedName(_) => false,
        }
    }
}

impl Visit for OccurrenceCollector {
    fn visit_call_expr(&mut self, n: &CallExpr) {
        if self.kind == NodeKind::Call && !n.span.is_dummy() {
            if let Callee::Expr(callee) = &n.callee {
                if self.is_target_expr(callee) {
                    self.out.push(Location::of_call(n));
                }
            }
        }
        n.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, n: &JSXElement) {
        if self.kind == NodeKind::Element
            && !n.span().is_dummy()
            && self.is_target_name(&n.opening.name)
        {
            self.out.push(Location::of_element(n));
        }
        n.visit_children_with(self);
    }
}
