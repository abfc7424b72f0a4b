use swc_core::ecma::ast::*;

/// A function written inline at the argument position.
#[derive(Debug, Clone, Copy)]
pub enum FunctionLiteral<'a> {
    Arrow(&'a ArrowExpr),
    Function(&'a FnExpr),
}

impl<'a> FunctionLiteral<'a> {
    pub fn param_count(&self) -> usize {
        match self {
            FunctionLiteral::Arrow(a) => a.params.len(),
            FunctionLiteral::Function(f) => f.function.params.len(),
        }
    }
}

/// Shape of a candidate argument. Classification is total; anything that is
/// not recognisably a function value is `Unsupported`.
#[derive(Debug, Clone, Copy)]
pub enum ArgumentShape<'a> {
    FunctionLiteral(FunctionLiteral<'a>),
    Identifier(&'a Ident),
    Unsupported(&'a Expr),
}

impl<'a> ArgumentShape<'a> {
    pub fn is_supported(&self) -> bool {
        !matches!(self, ArgumentShape::Unsupported(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArgumentShape::FunctionLiteral(FunctionLiteral::Arrow(_)) => "arrow",
            ArgumentShape::FunctionLiteral(FunctionLiteral::Function(_)) => "function",
            ArgumentShape::Identifier(_) => "identifier",
            ArgumentShape::Unsupported(_) => "unsupported",
        }
    }
}

/// Classify a call argument. Spread arguments stand for an unknown number of
/// values and are never given a known shape.
pub fn classify_argument(arg: &ExprOrSpread) -> ArgumentShape<'_> {
    if arg.spread.is_some() {
        return ArgumentShape::Unsupported(&arg.expr);
    }
    classify(&arg.expr)
}

pub fn classify(expr: &Expr) -> ArgumentShape<'_> {
    match expr {
        Expr::Arrow(a) => ArgumentShape::FunctionLiteral(FunctionLiteral::Arrow(a)),
        Expr::Fn(f) => ArgumentShape::FunctionLiteral(FunctionLiteral::Function(f)),
        Expr::Ident(i) => ArgumentShape::Identifier(i),
        Expr::Paren(p) => match classify(&p.expr) {
            ArgumentShape::Unsupported(_) => ArgumentShape::Unsupported(expr),
            shape => shape,
        },
        _ => ArgumentShape::Unsupported(expr),
    }
}
