// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Tree-walk evaluation of resolved expressions.  Rust floats never trap,
//! so the domain checks a trapping host performs are made explicit here.

use crate::ast::{BinaryOp, Expr, Expr0, UnaryOp};
use crate::builtins::{Loc, MathFn};
use crate::common::{Error, ErrorCode, ErrorKind, EvalResult, Result};
use crate::expr_err;

/// evaluate runs a single expression through the lexer, parser, whitelist
/// resolution, and the tree-walk evaluator.
pub fn evaluate(input: &str) -> Result<f64> {
    let ast = match Expr0::new(input) {
        Ok(Some(ast)) => ast,
        Ok(None) => {
            return Err(Error::new(
                ErrorKind::Expression,
                ErrorCode::EmptyExpression,
                None,
            ));
        }
        // the parser stops at the first hard error; report that one
        Err(mut errors) => return Err(errors.remove(0).into()),
    };

    let expr = Expr::from(ast)?;
    Ok(eval(&expr)?)
}

/// A NaN result from non-NaN operands is a domain error; an infinite
/// result from finite operands is overflow.  NaN and infinity that were
/// already present in the operands keep flowing, as IEEE floats do.
fn checked(result: f64, operands: &[f64], loc: Loc) -> EvalResult<f64> {
    if result.is_nan() && !operands.iter().any(|n| n.is_nan()) {
        return expr_err!(DomainError, loc.start, loc.end);
    }
    if result.is_infinite() && operands.iter().all(|n| n.is_finite()) {
        return expr_err!(ResultOutOfRange, loc.start, loc.end);
    }
    Ok(result)
}

fn eval(expr: &Expr) -> EvalResult<f64> {
    match expr {
        Expr::Const(n, _) => Ok(*n),
        Expr::Op1(op, l, _) => {
            let l = eval(l)?;
            Ok(match op {
                UnaryOp::Positive => l,
                UnaryOp::Negative => -l,
            })
        }
        Expr::Op2(op, l, r, loc) => {
            let l = eval(l)?;
            let r = eval(r)?;
            let result = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => {
                    if r == 0.0 {
                        return expr_err!(DivisionByZero, loc.start, loc.end);
                    }
                    l / r
                }
                BinaryOp::FloorDiv => {
                    if r == 0.0 {
                        return expr_err!(DivisionByZero, loc.start, loc.end);
                    }
                    (l / r).floor()
                }
                BinaryOp::Mod => {
                    if r == 0.0 {
                        return expr_err!(DivisionByZero, loc.start, loc.end);
                    }
                    // remainder takes the divisor's sign: 7 % -3 is -2
                    l - r * (l / r).floor()
                }
                BinaryOp::Pow => {
                    if l == 0.0 && r < 0.0 {
                        return expr_err!(DivisionByZero, loc.start, loc.end);
                    }
                    l.powf(r)
                }
            };
            checked(result, &[l, r], *loc)
        }
        Expr::App(func, loc) => eval_fn(func, *loc),
    }
}

fn eval_fn(func: &MathFn<Expr>, loc: Loc) -> EvalResult<f64> {
    use MathFn::*;

    macro_rules! apply {
        ($a:expr, $op:expr) => {{
            let a = eval($a)?;
            checked($op(a), &[a], loc)
        }};
        ($a:expr, $b:expr, $op:expr) => {{
            let a = eval($a)?;
            let b = eval($b)?;
            checked($op(a, b), &[a, b], loc)
        }};
    }

    match func {
        // the 0-arity names are constants, not computations: inf and nan
        // pass the domain guards untouched
        Pi => Ok(std::f64::consts::PI),
        E => Ok(std::f64::consts::E),
        Tau => Ok(std::f64::consts::TAU),
        Inf => Ok(f64::INFINITY),
        Nan => Ok(f64::NAN),

        Sqrt(a) => apply!(a, f64::sqrt),
        Sin(a) => apply!(a, f64::sin),
        Cos(a) => apply!(a, f64::cos),
        Tan(a) => apply!(a, f64::tan),
        Asin(a) => apply!(a, f64::asin),
        Acos(a) => apply!(a, f64::acos),
        Atan(a) => apply!(a, f64::atan),
        Atan2(a, b) => apply!(a, b, f64::atan2),
        Sinh(a) => apply!(a, f64::sinh),
        Cosh(a) => apply!(a, f64::cosh),
        Tanh(a) => apply!(a, f64::tanh),
        Exp(a) => apply!(a, f64::exp),
        Log(a, None) => apply!(a, f64::ln),
        Log(a, Some(base)) => apply!(a, base, f64::log),
        Log2(a) => apply!(a, f64::log2),
        Log10(a) => apply!(a, f64::log10),
        Pow(a, b) => {
            let a = eval(a)?;
            let b = eval(b)?;
            // unlike the ** operator, the pow function treats a negative
            // power of zero as a domain error
            if a == 0.0 && b < 0.0 {
                return expr_err!(DomainError, loc.start, loc.end);
            }
            checked(a.powf(b), &[a, b], loc)
        }
        Floor(a) => apply!(a, f64::floor),
        Ceil(a) => apply!(a, f64::ceil),
        Fabs(a) => apply!(a, f64::abs),
        Trunc(a) => apply!(a, f64::trunc),
        Fmod(a, b) => apply!(a, b, |x: f64, y: f64| x % y),
        Hypot(a, b) => apply!(a, b, f64::hypot),
        Degrees(a) => apply!(a, f64::to_degrees),
        Radians(a) => apply!(a, f64::to_radians),
        Fsum(elements) => {
            let elements: EvalResult<Vec<f64>> = elements.iter().map(eval).collect();
            let elements = elements?;
            checked(elements.iter().sum(), &elements, loc)
        }
    }
}
