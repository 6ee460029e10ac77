// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Expression ASTs: `Expr0` straight from the parser, and `Expr` after
//! every call has been resolved against the math whitelist.

use std::result::Result as StdResult;

use crate::builtins::{Loc, MathFn, UntypedCall, is_0_arity_math_fn, math_fn_name};
use crate::common::{EvalResult, ExprError, Ident};
use crate::expr_err;

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum UnaryOp {
    Positive,
    Negative,
}

/// Expr0 represents a parsed expression, before any calls have been
/// checked against the whitelist.
#[derive(PartialEq, Clone, Debug)]
pub enum Expr0 {
    Const(String, f64, Loc),
    Var(Ident, Loc),
    App(UntypedCall<Expr0>, Loc),
    Seq(Vec<Expr0>, Loc),
    Op1(UnaryOp, Box<Expr0>, Loc),
    Op2(BinaryOp, Box<Expr0>, Box<Expr0>, Loc),
}

impl Expr0 {
    /// new returns a new expression AST if one can be constructed, or a
    /// list of expression errors if one couldn't be.  Empty input is not
    /// an error, it is `None`.
    pub fn new(input: &str) -> StdResult<Option<Expr0>, Vec<ExprError>> {
        Ok(crate::parser::parse(input)?.map(|ast| ast.reify_0_arity_constants()))
    }

    /// reify turns variable references to the whitelisted 0-arity constants
    /// like `pi` or `math.tau` into App()s of those names, normalized to
    /// their bare spelling.
    pub(crate) fn reify_0_arity_constants(self) -> Self {
        match self {
            Expr0::Var(ref id, loc) => match math_fn_name(id) {
                Some(name) if is_0_arity_math_fn(name) => {
                    Expr0::App(UntypedCall(name.to_string(), vec![]), loc)
                }
                _ => self,
            },
            Expr0::Const(_, _, _) => self,
            Expr0::App(UntypedCall(func, args), loc) => {
                let args = args
                    .into_iter()
                    .map(|arg| arg.reify_0_arity_constants())
                    .collect::<Vec<_>>();
                Expr0::App(UntypedCall(func, args), loc)
            }
            Expr0::Seq(elements, loc) => {
                let elements = elements
                    .into_iter()
                    .map(|element| element.reify_0_arity_constants())
                    .collect::<Vec<_>>();
                Expr0::Seq(elements, loc)
            }
            Expr0::Op1(op, mut r, loc) => {
                *r = r.reify_0_arity_constants();
                Expr0::Op1(op, r, loc)
            }
            Expr0::Op2(op, mut l, mut r, loc) => {
                *l = l.reify_0_arity_constants();
                *r = r.reify_0_arity_constants();
                Expr0::Op2(op, l, r, loc)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn strip_loc(self) -> Self {
        let loc = Loc::default();
        match self {
            Expr0::Const(s, n, _loc) => Expr0::Const(s, n, loc),
            Expr0::Var(v, _loc) => Expr0::Var(v, loc),
            Expr0::App(UntypedCall(func, args), _loc) => Expr0::App(
                UntypedCall(func, args.into_iter().map(|arg| arg.strip_loc()).collect()),
                loc,
            ),
            Expr0::Seq(elements, _loc) => Expr0::Seq(
                elements
                    .into_iter()
                    .map(|element| element.strip_loc())
                    .collect(),
                loc,
            ),
            Expr0::Op1(op, r, _loc) => Expr0::Op1(op, Box::new(r.strip_loc()), loc),
            Expr0::Op2(op, l, r, _loc) => {
                Expr0::Op2(op, Box::new(l.strip_loc()), Box::new(r.strip_loc()), loc)
            }
        }
    }

    pub(crate) fn get_loc(&self) -> Loc {
        match self {
            Expr0::Const(_, _, loc) => *loc,
            Expr0::Var(_, loc) => *loc,
            Expr0::App(_, loc) => *loc,
            Expr0::Seq(_, loc) => *loc,
            Expr0::Op1(_, _, loc) => *loc,
            Expr0::Op2(_, _, _, loc) => *loc,
        }
    }
}

impl Default for Expr0 {
    fn default() -> Self {
        Expr0::Const("0.0".to_string(), 0.0, Loc::default())
    }
}

/// Expr represents an expression whose calls have all been resolved
/// against the whitelist; anything that survives to this stage may be
/// evaluated.
#[derive(PartialEq, Clone, Debug)]
pub enum Expr {
    Const(f64, Loc),
    App(MathFn<Expr>, Loc),
    Op1(UnaryOp, Box<Expr>, Loc),
    Op2(BinaryOp, Box<Expr>, Box<Expr>, Loc),
}

impl Expr {
    pub(crate) fn from(expr: Expr0) -> EvalResult<Self> {
        let expr = match expr {
            Expr0::Const(_, n, loc) => Expr::Const(n, loc),
            Expr0::Var(id, loc) => {
                // 0-arity constants were reified into App()s before
                // resolution, so a surviving Var is either a function or
                // module used as a value, or a name off the whitelist.
                return if math_fn_name(&id).is_some() || id == "math" {
                    expr_err!(NotAScalar, loc.start, loc.end)
                } else {
                    expr_err!(ForbiddenName, loc.start, loc.end)
                };
            }
            Expr0::Seq(_, loc) => {
                // sequences are argument syntax for fsum, not scalars
                return expr_err!(NotAScalar, loc.start, loc.end);
            }
            Expr0::App(UntypedCall(id, orig_args), loc) => {
                let Some(name) = math_fn_name(&id) else {
                    return expr_err!(UnknownFunction, loc.start, loc.end);
                };

                if name == "fsum" {
                    // fsum consumes its sequence argument whole
                    let mut orig_args = orig_args;
                    if orig_args.len() != 1 {
                        return expr_err!(BadFunctionArgs, loc.start, loc.end);
                    }
                    let elements = match orig_args.remove(0) {
                        Expr0::Seq(elements, _) => elements,
                        _ => return expr_err!(BadFunctionArgs, loc.start, loc.end),
                    };
                    let elements: EvalResult<Vec<Expr>> =
                        elements.into_iter().map(Expr::from).collect();
                    return Ok(Expr::App(MathFn::Fsum(elements?), loc));
                }

                let args: EvalResult<Vec<Expr>> = orig_args.into_iter().map(Expr::from).collect();
                let mut args = args?;

                macro_rules! check_arity {
                    ($math_fn:tt, 0) => {{
                        if !args.is_empty() {
                            return expr_err!(BadFunctionArgs, loc.start, loc.end);
                        }

                        MathFn::$math_fn
                    }};
                    ($math_fn:tt, 1) => {{
                        if args.len() != 1 {
                            return expr_err!(BadFunctionArgs, loc.start, loc.end);
                        }

                        let a = args.remove(0);
                        MathFn::$math_fn(Box::new(a))
                    }};
                    ($math_fn:tt, 2) => {{
                        if args.len() != 2 {
                            return expr_err!(BadFunctionArgs, loc.start, loc.end);
                        }

                        let b = args.remove(1);
                        let a = args.remove(0);
                        MathFn::$math_fn(Box::new(a), Box::new(b))
                    }};
                    ($math_fn:tt, 1, 2) => {{
                        if args.len() == 1 {
                            let a = args.remove(0);
                            MathFn::$math_fn(Box::new(a), None)
                        } else if args.len() == 2 {
                            let b = args.remove(1);
                            let a = args.remove(0);
                            MathFn::$math_fn(Box::new(a), Some(Box::new(b)))
                        } else {
                            return expr_err!(BadFunctionArgs, loc.start, loc.end);
                        }
                    }};
                }

                let func = match name {
                    "sqrt" => check_arity!(Sqrt, 1),
                    "sin" => check_arity!(Sin, 1),
                    "cos" => check_arity!(Cos, 1),
                    "tan" => check_arity!(Tan, 1),
                    "asin" => check_arity!(Asin, 1),
                    "acos" => check_arity!(Acos, 1),
                    "atan" => check_arity!(Atan, 1),
                    "atan2" => check_arity!(Atan2, 2),
                    "sinh" => check_arity!(Sinh, 1),
                    "cosh" => check_arity!(Cosh, 1),
                    "tanh" => check_arity!(Tanh, 1),
                    "exp" => check_arity!(Exp, 1),
                    "log" => check_arity!(Log, 1, 2),
                    "log2" => check_arity!(Log2, 1),
                    "log10" => check_arity!(Log10, 1),
                    "pow" => check_arity!(Pow, 2),
                    "floor" => check_arity!(Floor, 1),
                    "ceil" => check_arity!(Ceil, 1),
                    "fabs" => check_arity!(Fabs, 1),
                    "trunc" => check_arity!(Trunc, 1),
                    "fmod" => check_arity!(Fmod, 2),
                    "hypot" => check_arity!(Hypot, 2),
                    "degrees" => check_arity!(Degrees, 1),
                    "radians" => check_arity!(Radians, 1),
                    "pi" => check_arity!(Pi, 0),
                    "e" => check_arity!(E, 0),
                    "tau" => check_arity!(Tau, 0),
                    "inf" => check_arity!(Inf, 0),
                    "nan" => check_arity!(Nan, 0),
                    _ => unreachable!(),
                };
                Expr::App(func, loc)
            }
            Expr0::Op1(op, l, loc) => Expr::Op1(op, Box::new(Expr::from(*l)?), loc),
            Expr0::Op2(op, l, r, loc) => Expr::Op2(
                op,
                Box::new(Expr::from(*l)?),
                Box::new(Expr::from(*r)?),
                loc,
            ),
        };
        Ok(expr)
    }

    pub(crate) fn get_loc(&self) -> Loc {
        match self {
            Expr::Const(_, loc) => *loc,
            Expr::App(_, loc) => *loc,
            Expr::Op1(_, _, loc) => *loc,
            Expr::Op2(_, _, _, loc) => *loc,
        }
    }
}
