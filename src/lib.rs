//! Structural codemod kernel for JavaScript and TypeScript.
//!
//! A migration is a list of declarative [`RewriteRule`]s. For every file the
//! engine parses the source, resolves which local names are bound to each
//! rule's target module, collects the matching call sites or JSX elements up
//! front, then rewrites each occurrence or, when it cannot do so safely,
//! leaves it alone and prepends a `TODO: (@hypermod)` comment.
//!
//! ```no_run
//! use hypermod_kernel::{catalog, Codemod, TransformOptions};
//!
//! let rules = catalog::builtin("memoize-one@5.0.0")?;
//! let codemod = Codemod::new(rules, TransformOptions::default())?;
//! let out = codemod.transform_file("src/app.tsx", "import memoize from 'memoize-one';")?;
//! println!("{}", out.code);
//! # Ok::<(), hypermod_kernel::CodemodError>(())
//! ```

pub mod attrs;
pub mod bindings;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod rules;
pub mod synth;
pub mod tree;

pub use config::{Dialect, PrintOptions, QuoteStyle, TrailingComma, TransformOptions};
pub use engine::{Codemod, FileInput, Outcome, TransformOutput, TransformReport};
pub use error::{CodemodError, CodemodResult, MalformedMatch, SourceLocation};
pub use rules::{BindingSelector, MatchPredicate, RewriteRule, RewriteStrategy};

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// One-shot transform of a single file.
///
/// `config` is the host's JSON option object (`parser`, `printOptions`,
/// `strict`); an empty string selects the defaults.
pub fn transform_source(
    file_name: &str,
    source: &str,
    rules: Vec<RewriteRule>,
    config: &str,
) -> CodemodResult<TransformOutput> {
    let options = if config.trim().is_empty() {
        TransformOptions::default()
    } else {
        let map = serde_json::from_str(config)?;
        TransformOptions::from_config(map)?
    };
    Codemod::new(rules, options)?.transform_file(file_name, source)
}
