use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{Visit, VisitMut, VisitMutWith, VisitWith},
    },
};
use tracing::{debug, trace, warn};

use crate::attrs;
use crate::bindings;
use crate::classify::classify_argument;
use crate::config::{Dialect, TransformOptions};
use crate::diagnostics;
use crate::error::{CodemodError, CodemodResult, MalformedMatch};
use crate::matcher::{self, Location, MatchSet};
use crate::rules::{RewriteRule, RewriteStrategy};
use crate::synth;
use crate::tree::Tree;

// -----------------------------------------------------------------------------
// Outcomes & report
// -----------------------------------------------------------------------------

/// Terminal state of one matched occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to migrate (e.g. no comparator argument, no such attribute)
    Untouched,
    Rewritten,
    /// Left as is; the message goes into a diagnostic comment
    Reported(String),
    /// An expected child was missing or malformed; left as is
    Skipped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    /// Occurrences rewritten
    pub rewritten: usize,
    /// Occurrences left in place with a diagnostic
    pub reported: usize,
    /// Diagnostic comments actually inserted, after deduplication
    pub diagnostics: Vec<String>,
    pub skipped: Vec<MalformedMatch>,
}

impl TransformReport {
    pub fn changed(&self) -> bool {
        self.rewritten > 0 || !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub report: TransformReport,
}

/// One file handed to [`Codemod::transform_batch`].
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub source: String,
}

// -----------------------------------------------------------------------------
// Codemod
// -----------------------------------------------------------------------------

/// A validated rule set plus options. Transforms are pure functions of the
/// input text, so one `Codemod` can serve many files and threads.
#[derive(Debug, Clone)]
pub struct Codemod {
    rules: Vec<RewriteRule>,
    options: TransformOptions,
}

impl Codemod {
    pub fn new(rules: Vec<RewriteRule>, options: TransformOptions) -> CodemodResult<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules, options })
    }

    /// Transform text parsed with the configured dialect.
    pub fn transform(&self, source: &str) -> CodemodResult<TransformOutput> {
        self.run("input", source, self.options.dialect.unwrap_or_default())
    }

    /// Transform one file. A configured dialect wins; otherwise it follows
    /// the file extension when that is recognised.
    pub fn transform_file(&self, file_name: &str, source: &str) -> CodemodResult<TransformOutput> {
        let dialect = self
            .options
            .dialect
            .or_else(|| Dialect::for_path(file_name))
            .unwrap_or_default();
        debug!(file = file_name, ?dialect, "selected dialect");
        self.run(file_name, source, dialect)
    }

    /// Transform independent files in parallel. Results keep input order.
    pub fn transform_batch(&self, files: &[FileInput]) -> Vec<CodemodResult<TransformOutput>> {
        files
            .par_iter()
            .map(|f| self.transform_file(&f.name, &f.source))
            .collect()
    }

    fn run(&self, file_name: &str, source: &str, dialect: Dialect) -> CodemodResult<TransformOutput> {
        let mut tree = Tree::parse(source, file_name, dialect)?;
        let mut report = TransformReport::default();
        let mut rewritten = HashSet::new();
        let mut any_present = false;

        for rule in &self.rules {
            let imports = bindings::resolve(&tree.module, &rule.target_module);
            if !imports.present {
                trace!(file = file_name, rule = %rule.name, "module not imported");
                continue;
            }
            any_present = true;
            self.apply_rule(file_name, rule, &imports, &mut tree, &mut report, &mut rewritten)?;
        }

        if !any_present {
            return Ok(TransformOutput {
                code: source.to_string(),
                report,
            });
        }

        let mut code = if rewritten.is_empty() {
            source.to_string()
        } else {
            self.splice(&tree, source, &rewritten)?
        };
        if !report.diagnostics.is_empty() {
            code = diagnostics::prepend_to_text(&code, &report.diagnostics);
        }
        Ok(TransformOutput { code, report })
    }

    fn apply_rule(
        &self,
        file_name: &str,
        rule: &RewriteRule,
        imports: &bindings::ResolvedImports,
        tree: &mut Tree,
        report: &mut TransformReport,
        rewritten: &mut HashSet<Location>,
    ) -> CodemodResult<()> {
        let matches = matcher::find_occurrences(&tree.module, imports, &rule.predicate);
        debug!(
            file = file_name,
            rule = %rule.name,
            occurrences = matches.len(),
            "matched occurrences"
        );
        if matches.is_empty() {
            return Ok(());
        }

        let mut pass = RulePass {
            rule,
            matches: &matches,
            unresolved: tree.unresolved_ctxt(),
            outcomes: vec![],
        };
        tree.module.visit_mut_with(&mut pass);

        for (location, outcome) in pass.outcomes {
            match outcome {
                Outcome::Untouched => {}
                Outcome::Rewritten => {
                    report.rewritten += 1;
                    rewritten.insert(location);
                }
                Outcome::Reported(message) => {
                    report.reported += 1;
                    if diagnostics::report(tree, &message) {
                        report.diagnostics.push(message);
                    }
                }
                Outcome::Skipped(reason) => {
                    let malformed = MalformedMatch {
                        rule: rule.name.clone(),
                        location: tree.span_file_lines(location.span()),
                        reason,
                    };
                    warn!(
                        rule = %malformed.rule,
                        location = %malformed.location,
                        reason = %malformed.reason,
                        "skipping malformed occurrence"
                    );
                    if self.options.strict {
                        return Err(CodemodError::Malformed(malformed));
                    }
                    report.skipped.push(malformed);
                }
            }
        }
        Ok(())
    }

    /// Replace the text of each outermost rewritten node with its printed
    /// form. Everything outside those nodes is kept byte for byte.
    fn splice(
        &self,
        tree: &Tree,
        source: &str,
        rewritten: &HashSet<Location>,
    ) -> CodemodResult<String> {
        let mut nodes = RewrittenNodes {
            locations: rewritten,
            out: vec![],
        };
        tree.module.visit_with(&mut nodes);

        let mut code = source.to_string();
        // Back to front, so earlier offsets stay valid.
        for (location, node) in nodes.out.iter().rev() {
            let (lo, hi) = (tree.offset(location.lo), tree.offset(location.hi));
            let printed = tree.print_expr(node, &self.options.print_options)?;
            let printed = if has_multiline_template(node) {
                printed
            } else {
                reindent(&printed, line_indent(source, lo))
            };
            trace!(lo, hi, "splicing rewritten node");
            code.replace_range(lo..hi, &printed);
        }
        Ok(code)
    }
}

// -----------------------------------------------------------------------------
// Splicing
// -----------------------------------------------------------------------------

/// Rewritten nodes in document order, outermost only: a rewritten node nested
/// in another is printed as part of its parent.
struct RewrittenNodes<'a> {
    locations: &'a HashSet<Location>,
    out: Vec<(Location, Expr)>,
}

impl Visit for RewrittenNodes<'_> {
    fn visit_call_expr(&mut self, n: &CallExpr) {
        let location = Location::of_call(n);
        if self.locations.contains(&location) {
            self.out.push((location, Expr::Call(n.clone())));
            return;
        }
        n.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, n: &JSXElement) {
        let location = Location::of_element(n);
        if self.locations.contains(&location) {
            self.out.push((location, Expr::JSXElement(Box::new(n.clone()))));
            return;
        }
        n.visit_children_with(self);
    }
}

struct MultilineTemplate(bool);

impl Visit for MultilineTemplate {
    fn visit_tpl_element(&mut self, n: &TplElement) {
        self.0 |= n.raw.contains('\n');
    }
}

/// Template literals with line breaks must not be re-indented.
fn has_multiline_template(node: &Expr) -> bool {
    let mut v = MultilineTemplate(false);
    node.visit_with(&mut v);
    v.0
}

/// Leading whitespace of the line containing byte `offset`.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..offset];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

/// Shift every line after the first by `indent`, so a node printed at column
/// zero lines up with the code around it.
fn reindent(printed: &str, indent: &str) -> String {
    if indent.is_empty() {
        return printed.to_string();
    }
    let mut out = String::with_capacity(printed.len());
    for (i, line) in printed.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

// -----------------------------------------------------------------------------
// Rule pass
// -----------------------------------------------------------------------------

/// Applies one rule to the occurrences in a frozen match set. Children are
/// visited before their parent, and each location is handled at most once.
struct RulePass<'a> {
    rule: &'a RewriteRule,
    matches: &'a MatchSet,
    /// Context of identifiers with no binding in the file
    unresolved: SyntaxContext,
    outcomes: Vec<(Location, Outcome)>,
}

impl VisitMut for RulePass<'_> {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        n.visit_mut_children_with(self);
        let location = Location::of_call(n);
        if !self.matches.contains(&location) {
            return;
        }
        let outcome = match &self.rule.strategy {
            RewriteStrategy::BatchEqualityFn { argument } => {
                migrate_equality_fn(n, *argument, self.rule.subject(), self.unresolved)
            }
            RewriteStrategy::RenameAttribute { .. } | RewriteStrategy::RenderAsChildren { .. } => {
                Outcome::Untouched
            }
        };
        self.outcomes.push((location, outcome));
    }

    fn visit_mut_jsx_element(&mut self, n: &mut JSXElement) {
        n.visit_mut_children_with(self);
        let location = Location::of_element(n);
        if !self.matches.contains(&location) {
            return;
        }
        let outcome = match &self.rule.strategy {
            RewriteStrategy::RenameAttribute { from, to } => rename_attribute(n, from, to),
            RewriteStrategy::RenderAsChildren { attribute } => {
                wrap_children(n, attribute, self.rule.subject())
            }
            RewriteStrategy::BatchEqualityFn { .. } => Outcome::Untouched,
        };
        self.outcomes.push((location, outcome));
    }
}

// -----------------------------------------------------------------------------
// Strategies
// -----------------------------------------------------------------------------

fn migrate_equality_fn(
    call: &mut CallExpr,
    index: usize,
    subject: &str,
    unresolved: SyntaxContext,
) -> Outcome {
    // Without a comparator the old default already compared per argument.
    let Some(arg) = call.args.get(index) else {
        return Outcome::Untouched;
    };
    // An explicit `undefined` also selects the default comparator.
    if arg.spread.is_none() && is_undefined(&arg.expr, unresolved) {
        return Outcome::Untouched;
    }
    let shape = classify_argument(arg);
    trace!(shape = shape.label(), "classified equality argument");
    if !shape.is_supported() {
        return Outcome::Reported(format!(
            "Unable to migrate {subject}.\nExpected a function or an identifier"
        ));
    }

    let arg = &mut call.args[index];
    let original = std::mem::replace(
        &mut arg.expr,
        Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
    );
    arg.expr = Box::new(synth::batch_equality_fn(original));
    Outcome::Rewritten
}

/// The global `undefined` or `void <literal>`.
fn is_undefined(expr: &Expr, unresolved: SyntaxContext) -> bool {
    match expr {
        Expr::Ident(i) => &*i.sym == "undefined" && i.ctxt == unresolved,
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Void,
            arg,
            ..
        }) => matches!(&**arg, Expr::Lit(_)),
        Expr::Paren(p) => is_undefined(&p.expr, unresolved),
        _ => false,
    }
}

fn rename_attribute(element: &mut JSXElement, from: &str, to: &str) -> Outcome {
    let renamed = attrs::find(element, from)
        .into_iter()
        .filter(|&slot| attrs::rename(element, slot, to))
        .count();
    if renamed == 0 {
        Outcome::Untouched
    } else {
        Outcome::Rewritten
    }
}

/// JSX treats a tag starting with a lowercase letter as an intrinsic element.
fn renders_as_component(ident: &Ident) -> bool {
    !ident.sym.starts_with(|c: char| c.is_ascii_lowercase())
}

fn has_meaningful_children(element: &JSXElement) -> bool {
    element.children.iter().any(|child| match child {
        JSXElementChild::JSXText(text) => !text.value.trim().is_empty(),
        _ => true,
    })
}

fn wrap_children(element: &mut JSXElement, attribute: &str, subject: &str) -> Outcome {
    let slot = match attrs::find(element, attribute).as_slice() {
        [] => return Outcome::Untouched,
        [slot] => *slot,
        _ => return Outcome::Skipped(format!("`{attribute}` is given more than once")),
    };
    let Some(component) = attrs::value_ident(element, slot).cloned() else {
        return Outcome::Skipped(format!(
            "expected `{attribute}` to hold an identifier expression"
        ));
    };
    if !renders_as_component(&component) {
        return Outcome::Reported(format!(
            "Unable to migrate {subject}.\nExpected `{attribute}` to reference a capitalised component, found `{}`",
            component.sym
        ));
    }
    if has_meaningful_children(element) {
        return Outcome::Reported(format!(
            "Unable to migrate {subject}.\nExisting children would be replaced by the render function"
        ));
    }

    attrs::remove(element, slot);
    synth::render_as_children(element, component);
    Outcome::Rewritten
}
