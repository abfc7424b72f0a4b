//! Declarative rewrite rules.
//!
//! A rule names the module it migrates, which bindings of that module it
//! matches, and the strategy to run on each occurrence. Rules are plain data:
//! adding a migration means adding a rule, not touching the engine.

use serde::{Deserialize, Serialize};

use crate::error::{CodemodError, CodemodResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRule {
    pub name: String,
    pub target_module: String,
    /// Human readable thing being migrated, used in diagnostics
    /// ("Unable to migrate <subject>."). Falls back to `name`.
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(rename = "match")]
    pub predicate: MatchPredicate,
    pub strategy: RewriteStrategy,
}

/// Which export of the target module an occurrence must be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingSelector {
    Default,
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchPredicate {
    /// Call expressions whose callee is one of the bindings
    Call { bindings: Vec<BindingSelector> },
    /// JSX elements whose tag is one of the bindings
    Element { bindings: Vec<BindingSelector> },
}

impl MatchPredicate {
    pub fn bindings(&self) -> &[BindingSelector] {
        match self {
            MatchPredicate::Call { bindings } | MatchPredicate::Element { bindings } => bindings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RewriteStrategy {
    /// `<X from={v} />` becomes `<X to={v} />`
    #[serde(rename_all = "camelCase")]
    RenameAttribute { from: String, to: String },
    /// Per-pair comparator argument becomes a whole-sequence comparator
    #[serde(rename_all = "camelCase")]
    BatchEqualityFn {
        #[serde(default = "default_equality_argument")]
        argument: usize,
    },
    /// Component-reference attribute becomes a render function child
    #[serde(rename_all = "camelCase")]
    RenderAsChildren {
        #[serde(default = "default_component_attribute")]
        attribute: String,
    },
}

fn default_equality_argument() -> usize {
    1
}

fn default_component_attribute() -> String {
    "component".to_string()
}

impl RewriteRule {
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(&self.name)
    }

    /// Reject rules whose strategy cannot apply to what the predicate matches.
    pub fn validate(&self) -> CodemodResult<()> {
        if self.target_module.is_empty() {
            return Err(CodemodError::invalid_rule(&self.name, "empty target module"));
        }
        if self.predicate.bindings().is_empty() {
            return Err(CodemodError::invalid_rule(&self.name, "no bindings to match"));
        }
        match (&self.predicate, &self.strategy) {
            (MatchPredicate::Call { .. }, RewriteStrategy::BatchEqualityFn { .. }) => Ok(()),
            (
                MatchPredicate::Element { .. },
                RewriteStrategy::RenameAttribute { .. } | RewriteStrategy::RenderAsChildren { .. },
            ) => Ok(()),
            (MatchPredicate::Call { .. }, _) => Err(CodemodError::invalid_rule(
                &self.name,
                "call predicates only support batchEqualityFn",
            )),
            (MatchPredicate::Element { .. }, _) => Err(CodemodError::invalid_rule(
                &self.name,
                "element predicates only support renameAttribute and renderAsChildren",
            )),
        }
    }
}
