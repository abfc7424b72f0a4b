//! Parser and printer glue.
//!
//! SWC is the external parser/printer. Everything the engine needs from it
//! goes through [`Tree::parse`] and [`Tree::into_source`]; the rest of the
//! crate only sees the resolved [`Module`] and its comment store.

use std::io;

use swc_core::{
    common::{
        comments::{Comments, SingleThreadedComments},
        sync::Lrc,
        BytePos, FileName, FilePathMapping, Globals, Mark, SourceMap, Span, Spanned,
        SyntaxContext, GLOBALS,
    },
    ecma::{
        ast::*,
        codegen::{text_writer::JsWriter, Emitter, Node},
        parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax},
        transforms::base::resolver,
        visit::VisitMutWith,
    },
};
use tracing::debug;

use crate::config::{Dialect, PrintOptions};
use crate::error::{CodemodError, CodemodResult};

/// One parsed file. Built from text, mutated in a single pass, then printed
/// either node by node ([`Tree::print_expr`]) or whole ([`Tree::into_source`]).
pub struct Tree {
    pub module: Module,
    pub comments: SingleThreadedComments,
    source_map: Lrc<SourceMap>,
    /// Position of the first byte of the source text
    file_start: BytePos,
    /// Position leading diagnostics attach to
    start: BytePos,
    unresolved: SyntaxContext,
}

impl Tree {
    /// Parse `source` and run the scope resolver over it so every identifier
    /// carries the syntax context of the binding it refers to.
    pub fn parse(source: &str, file_name: &str, dialect: Dialect) -> CodemodResult<Self> {
        let source_map = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let fm = source_map.new_source_file(
            Lrc::new(FileName::Real(file_name.into())),
            source.to_string(),
        );
        let comments = SingleThreadedComments::default();

        let syntax = match dialect {
            Dialect::Babel => Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            }),
            Dialect::Ts | Dialect::Tsx => Syntax::Typescript(TsSyntax {
                tsx: dialect == Dialect::Tsx,
                decorators: true,
                ..Default::default()
            }),
        };

        let (module, unresolved) = GLOBALS.set(&Globals::new(), || -> CodemodResult<_> {
            let lexer = Lexer::new(
                syntax,
                Default::default(),
                StringInput::from(&*fm),
                Some(&comments),
            );
            let mut parser = Parser::new_from(lexer);
            let parsed = parser.parse_module();
            // Recoverable errors still mean the tree is not what the author wrote.
            let first_error = match parsed {
                Ok(module) => match parser.take_errors().into_iter().next() {
                    None => Ok(module),
                    Some(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            let mut module = first_error.map_err(|e| {
                let loc = source_map.lookup_char_pos(e.span().lo);
                CodemodError::parse_at(e.kind().msg(), loc.line, loc.col_display)
            })?;

            let unresolved_mark = Mark::new();
            let top_level_mark = Mark::new();
            module.visit_mut_with(&mut resolver(
                unresolved_mark,
                top_level_mark,
                dialect.is_typescript(),
            ));
            Ok((module, SyntaxContext::empty().apply_mark(unresolved_mark)))
        })?;

        let start = module
            .body
            .first()
            .map(|item| item.span().lo)
            .unwrap_or(module.span.lo);

        Ok(Self {
            module,
            comments,
            source_map,
            file_start: fm.start_pos,
            start,
            unresolved,
        })
    }

    /// Position that leading comments must be attached to in order to be
    /// printed at the very top of the file.
    pub fn start_pos(&self) -> BytePos {
        self.start
    }

    /// Syntax context the resolver gives identifiers with no binding in the
    /// file, such as `undefined` or browser globals.
    pub fn unresolved_ctxt(&self) -> SyntaxContext {
        self.unresolved
    }

    /// Byte offset of `pos` into the source text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.file_start.0) as usize
    }

    /// `file:startLine-endLine` for a span, or `unknown:0-0` for synthesized
    /// nodes.
    pub fn span_file_lines(&self, s: Span) -> String {
        if s.is_dummy() {
            return "unknown:0-0".to_string();
        }
        let lo = self.source_map.lookup_char_pos(s.lo());
        let hi = self.source_map.lookup_char_pos(s.hi());
        format!("{}:{}-{}", lo.file.name, lo.line, hi.line)
    }

    /// Print one expression on its own, for splicing over its original span.
    ///
    /// Comments inside the expression are kept. Comments attached before its
    /// start or after its end stay in the surrounding text and are dropped
    /// from the store so they are not printed twice.
    pub fn print_expr(&self, expr: &Expr, options: &PrintOptions) -> CodemodResult<String> {
        let span = expr.span();
        if !span.is_dummy() {
            self.comments.take_leading(span.lo);
            self.comments.take_trailing(span.hi);
        }
        self.emit(expr, options)
    }

    /// Render the whole (possibly mutated) module back to text.
    pub fn into_source(self, options: &PrintOptions) -> CodemodResult<String> {
        self.emit(&self.module, options)
    }

    fn emit<N: Node>(&self, node: &N, options: &PrintOptions) -> CodemodResult<String> {
        // Width, trailing commas and quotes have no emitter counterpart.
        debug!(
            tab_width = options.tab_width,
            print_width = options.print_width,
            trailing_comma = ?options.trailing_comma,
            quote = ?options.quote,
            "emitting"
        );

        let mut buf = vec![];
        {
            let mut wr = JsWriter::new(self.source_map.clone(), "\n", &mut buf, None);
            wr.set_indent_str(indent_str(options.tab_width));
            let mut emitter = Emitter {
                cfg: Default::default(),
                cm: self.source_map.clone(),
                comments: Some(&self.comments),
                wr,
            };
            node.emit_with(&mut emitter)?;
        }

        String::from_utf8(buf)
            .map_err(|e| CodemodError::Print(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

const SPACES: &str = "        ";

/// One indent level of `tab_width` spaces, clamped to 1..=8.
fn indent_str(tab_width: u8) -> &'static str {
    &SPACES[..tab_width.clamp(1, 8) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_failure_carries_location() {
        let err = Tree::parse("const = ;", "broken.ts", Dialect::Ts)
            .err()
            .expect("should fail");
        match err {
            CodemodError::Parse { location, .. } => {
                assert_eq!(location.map(|l| l.line), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn jsx_requires_a_jsx_dialect() {
        assert!(Tree::parse("const a = <div />;", "a.ts", Dialect::Ts).is_err());
        assert!(Tree::parse("const a = <div />;", "a.tsx", Dialect::Tsx).is_ok());
        assert!(Tree::parse("const a = <div />;", "a.js", Dialect::Babel).is_ok());
    }

    #[test]
    fn comments_survive_printing() {
        let tree = Tree::parse("// keep me\nconst a = 1;\n", "a.ts", Dialect::Ts).unwrap();
        let out = tree.into_source(&PrintOptions::default()).unwrap();
        assert!(out.contains("// keep me"));
        assert!(out.contains("const a = 1;"));
    }

    fn first_init(tree: &Tree) -> &Expr {
        let Some(ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))) = tree.module.body.last() else {
            panic!("expected var decl");
        };
        var.decls[0].init.as_deref().unwrap()
    }

    #[test]
    fn indent_follows_tab_width() {
        let src = "function f() {\nif (a) {\nreturn b;\n}\n}\n";
        let two = Tree::parse(src, "a.ts", Dialect::Ts)
            .unwrap()
            .into_source(&PrintOptions::default())
            .unwrap();
        assert!(two.contains("\n  if (a) {\n    return b;\n  }\n"), "{two}");

        let four = Tree::parse(src, "a.ts", Dialect::Ts)
            .unwrap()
            .into_source(&PrintOptions {
                tab_width: 4,
                ..Default::default()
            })
            .unwrap();
        assert!(four.contains("\n    if (a) {\n        return b;\n    }\n"), "{four}");
    }

    #[test]
    fn indent_width_is_clamped() {
        assert_eq!(indent_str(0), " ");
        assert_eq!(indent_str(2), "  ");
        assert_eq!(indent_str(40), "        ");
    }

    #[test]
    fn print_expr_keeps_inner_comments_only() {
        let tree = Tree::parse(
            "// before\nconst x = call(a, /* inner */ b);\n",
            "a.ts",
            Dialect::Ts,
        )
        .unwrap();
        let out = tree.print_expr(first_init(&tree), &PrintOptions::default()).unwrap();
        assert!(out.starts_with("call(a, "), "{out}");
        assert!(out.contains("/* inner */"));
        assert!(!out.contains("before"));
    }

    #[test]
    fn offsets_index_the_source_text() {
        let src = "const x = call(a);\n";
        let tree = Tree::parse(src, "a.ts", Dialect::Ts).unwrap();
        let span = first_init(&tree).span();
        assert_eq!(&src[tree.offset(span.lo)..tree.offset(span.hi)], "call(a)");
    }

    #[test]
    fn globals_carry_the_unresolved_context() {
        let tree = Tree::parse("let y = 1;\nconst x = [undefined, y];\n", "a.ts", Dialect::Ts).unwrap();
        let Expr::Array(arr) = first_init(&tree) else {
            panic!("expected array");
        };
        let ctxt = |i: usize| match &*arr.elems[i].as_ref().unwrap().expr {
            Expr::Ident(id) => id.ctxt,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(ctxt(0), tree.unresolved_ctxt());
        assert_ne!(ctxt(1), tree.unresolved_ctxt());
    }

    #[test]
    fn start_pos_is_first_item() {
        let tree = Tree::parse("/* header */\nimport a from 'a';\n", "a.ts", Dialect::Ts).unwrap();
        assert_eq!(tree.start_pos(), tree.module.body[0].span().lo);
    }
}
