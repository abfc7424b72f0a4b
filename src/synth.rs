//! Builders for replacement fragments.
//!
//! Everything built here carries `DUMMY_SP`, except subtrees moved in from
//! the original code, which keep their own spans and comments.

use std::collections::HashSet;

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        utils::ExprFactory,
        visit::{Visit, VisitWith},
    },
};

// -----------------------------------------------------------------------------
// Small node helpers
// -----------------------------------------------------------------------------

fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

fn ident_expr(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(ident(name)))
}

fn binding(name: &str) -> Pat {
    Pat::Ident(BindingIdent {
        id: ident(name),
        type_ann: None,
    })
}

fn member(obj: &str, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: ident_expr(obj),
        prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
    })
}

fn block(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt {
        span: DUMMY_SP,
        stmts,
        ctxt: SyntaxContext::empty(),
    }
}

fn arrow(params: Vec<Pat>, body: BlockStmtOrExpr) -> Expr {
    Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        params,
        body: Box::new(body),
        is_async: false,
        is_generator: false,
        type_params: None,
        return_type: None,
        ctxt: SyntaxContext::empty(),
    })
}

// -----------------------------------------------------------------------------
// Fresh names
// -----------------------------------------------------------------------------

struct ReferencedNames(HashSet<String>);

impl Visit for ReferencedNames {
    fn visit_ident(&mut self, i: &Ident) {
        self.0.insert(i.sym.to_string());
    }
}

fn referenced_names(expr: &Expr) -> HashSet<String> {
    let mut names = ReferencedNames(HashSet::new());
    expr.visit_with(&mut names);
    names.0
}

/// `base`, or `base1`, `base2`, … when `base` is already spoken for.
fn fresh_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

// -----------------------------------------------------------------------------
// Batch equality function
// -----------------------------------------------------------------------------

/// Wrap a per-pair comparator into a comparator over whole argument lists:
///
/// ```js
/// (newArgs, lastArgs) => {
///   if (newArgs.length !== lastArgs.length) {
///     return false;
///   }
///   const __equalityFn = <original>;
///   return newArgs.every((newArg, index) => __equalityFn(newArg, lastArgs[index]));
/// }
/// ```
///
/// `original` is moved into the single `const` binding, so it is evaluated
/// once per comparison and appears exactly once in the output. Names the
/// original already refers to are never shadowed.
pub fn batch_equality_fn(original: Box<Expr>) -> Expr {
    let taken = referenced_names(&original);
    let new_args = fresh_name("newArgs", &taken);
    let last_args = fresh_name("lastArgs", &taken);
    let equality_fn = fresh_name("__equalityFn", &taken);

    // if (newArgs.length !== lastArgs.length) { return false; }
    let arity_guard = Stmt::If(IfStmt {
        span: DUMMY_SP,
        test: Box::new(Expr::Bin(BinExpr {
            span: DUMMY_SP,
            op: BinaryOp::NotEqEq,
            left: Box::new(member(&new_args, "length")),
            right: Box::new(member(&last_args, "length")),
        })),
        cons: Box::new(Stmt::Block(block(vec![Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(Box::new(Expr::Lit(Lit::Bool(Bool {
                span: DUMMY_SP,
                value: false,
            })))),
        })]))),
        alt: None,
    });

    // const __equalityFn = <original>;
    let alias = Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: binding(&equality_fn),
            init: Some(original),
            definite: false,
        }],
        ctxt: SyntaxContext::empty(),
    })));

    // __equalityFn(newArg, lastArgs[index])
    let pairwise = Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Expr::Ident(ident(&equality_fn)).as_callee(),
        args: vec![
            Expr::Ident(ident("newArg")).as_arg(),
            Expr::Member(MemberExpr {
                span: DUMMY_SP,
                obj: ident_expr(&last_args),
                prop: MemberProp::Computed(ComputedPropName {
                    span: DUMMY_SP,
                    expr: ident_expr("index"),
                }),
            })
            .as_arg(),
        ],
        type_args: None,
        ctxt: SyntaxContext::empty(),
    });

    // return newArgs.every((newArg, index) => ...);
    let all_equal = Stmt::Return(ReturnStmt {
        span: DUMMY_SP,
        arg: Some(Box::new(Expr::Call(CallExpr {
            span: DUMMY_SP,
            callee: member(&new_args, "every").as_callee(),
            args: vec![arrow(
                vec![binding("newArg"), binding("index")],
                BlockStmtOrExpr::Expr(Box::new(pairwise)),
            )
            .as_arg()],
            type_args: None,
            ctxt: SyntaxContext::empty(),
        }))),
    });

    arrow(
        vec![binding(&new_args), binding(&last_args)],
        BlockStmtOrExpr::BlockStmt(block(vec![arity_guard, alias, all_equal])),
    )
}

// -----------------------------------------------------------------------------
// Render-as-children
// -----------------------------------------------------------------------------

/// Turn `element` into
/// `<Tag …>{({ ref: _, ...props }) => <Component {...props} />}</Tag>`.
///
/// The element's tag and remaining attributes are kept; its children are
/// replaced by the single render function.
pub fn render_as_children(element: &mut JSXElement, component: Ident) {
    // <Component {...props} />
    let rendered = JSXElement {
        span: DUMMY_SP,
        opening: JSXOpeningElement {
            name: JSXElementName::Ident(component),
            attrs: vec![JSXAttrOrSpread::SpreadElement(SpreadElement {
                dot3_token: DUMMY_SP,
                expr: ident_expr("props"),
            })],
            self_closing: true,
            type_args: None,
            span: DUMMY_SP,
        },
        children: vec![],
        closing: None,
    };

    // { ref: _, ...props }
    let props_param = Pat::Object(ObjectPat {
        span: DUMMY_SP,
        props: vec![
            ObjectPatProp::KeyValue(KeyValuePatProp {
                key: PropName::Ident(IdentName::new("ref".into(), DUMMY_SP)),
                value: Box::new(binding("_")),
            }),
            ObjectPatProp::Rest(RestPat {
                span: DUMMY_SP,
                dot3_token: DUMMY_SP,
                arg: Box::new(binding("props")),
                type_ann: None,
            }),
        ],
        optional: false,
        type_ann: None,
    });

    let render = arrow(
        vec![props_param],
        BlockStmtOrExpr::Expr(Box::new(Expr::JSXElement(Box::new(rendered)))),
    );

    element.children = vec![JSXElementChild::JSXExprContainer(JSXExprContainer {
        span: DUMMY_SP,
        expr: JSXExpr::Expr(Box::new(render)),
    })];
    element.opening.self_closing = false;
    element.closing = Some(JSXClosingElement {
        span: DUMMY_SP,
        name: element.opening.name.clone(),
    });
}
