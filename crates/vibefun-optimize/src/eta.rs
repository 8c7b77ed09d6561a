//! Eta reduction (§4.7): `Lambda(Var x, App(f, [Var x]))` → `f`, when `x`
//! is not free in `f` and the application has exactly one argument which
//! is itself the lambda's own parameter.

use crate::pass::{Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::{free_vars, Expr, Pattern};

pub struct EtaReduction;

impl Pass for EtaReduction {
    fn name(&self) -> &'static str {
        "eta-reduction"
    }

    fn can_apply(&self, _expr: &Expr) -> bool {
        true
    }

    fn apply(&self, expr: &Expr, ctx: &mut PassContext) -> Expr {
        sweep(expr, ctx)
    }
}

fn sweep(expr: &Expr, ctx: &mut PassContext) -> Expr {
    let expr = map_children(expr, |child| sweep(child, ctx));
    try_reduce(&expr)
}

fn try_reduce(expr: &Expr) -> Expr {
    if let Expr::Lambda { param, body, .. } = expr {
        if let Pattern::Var { name, .. } = param.as_ref() {
            if let Expr::App { func, args, .. } = body.as_ref() {
                if args.len() == 1 {
                    if let Expr::Var { name: arg_name, .. } = &args[0] {
                        if arg_name == name && !free_vars(func).contains(name) {
                            return (**func).clone();
                        }
                    }
                }
            }
        }
    }
    expr.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{core_eq, ExprId};
    use vibefun_util::{Span, Symbol};

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn reduces_eta_expandable_lambda() {
        let f = Expr::Var { name: Symbol::intern("f"), id: id(0), span: Span::DUMMY };
        let app = Expr::App {
            func: Box::new(f.clone()),
            args: vec![Expr::Var { name: Symbol::intern("x"), id: id(1), span: Span::DUMMY }],
            id: id(2),
            span: Span::DUMMY,
        };
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(app),
            id: id(3),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&lambda, &mut ctx);
        assert!(core_eq(&result, &f));
    }

    #[test]
    fn does_not_reduce_when_parameter_escapes_into_func_position() {
        let x = Expr::Var { name: Symbol::intern("x"), id: id(0), span: Span::DUMMY };
        let app = Expr::App { func: Box::new(x.clone()), args: vec![x], id: id(1), span: Span::DUMMY };
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(app),
            id: id(2),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&lambda, &mut ctx);
        assert!(matches!(result, Expr::Lambda { .. }));
    }
}
