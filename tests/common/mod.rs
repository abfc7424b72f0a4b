#![allow(dead_code)]

use hypermod_kernel::{catalog, tree::Tree, Codemod, Dialect, PrintOptions, TransformOptions, TransformOutput};

/// Parse and re-print `src` so expected outputs are compared in the same
/// printed form the engine produces.
pub fn normalize(src: &str) -> String {
    Tree::parse(src, "expected.tsx", Dialect::Tsx)
        .expect("expected source should parse")
        .into_source(&PrintOptions::default())
        .expect("expected source should print")
}

pub fn codemod(builtin: &str) -> Codemod {
    Codemod::new(
        catalog::builtin(builtin).expect("builtin rule set"),
        TransformOptions::default(),
    )
    .expect("valid rules")
}

pub fn run(builtin: &str, src: &str) -> TransformOutput {
    codemod(builtin)
        .transform_file("test.tsx", src)
        .expect("transform should succeed")
}
