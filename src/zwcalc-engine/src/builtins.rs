// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

/// Loc describes a location in an expression by the starting point and ending
/// point. Expression text is short enough that u16 offsets always fit.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub struct Loc {
    pub start: u16,
    pub end: u16,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Loc {
            start: start as u16,
            end: end as u16,
        }
    }

    /// union takes a second Loc and returns the inclusive range from the
    /// start of the earlier token to the end of the later token.
    pub fn union(&self, rhs: &Self) -> Self {
        Loc {
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

#[test]
fn test_loc_basics() {
    let a = Loc { start: 3, end: 7 };
    assert_eq!(a, Loc::new(3, 7));

    let b = Loc { start: 4, end: 11 };
    assert_eq!(Loc::new(3, 11), a.union(&b));

    let c = Loc { start: 1, end: 5 };
    assert_eq!(Loc::new(1, 7), a.union(&c));
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct UntypedCall<Expr>(pub String, pub Vec<Expr>);

/// The closed function whitelist. Everything an expression is permitted to
/// call is a variant here; resolution maps untyped calls into these and
/// rejects anything else, so the sandbox never depends on what the host
/// math library happens to export.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum MathFn<Expr> {
    Sqrt(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Asin(Box<Expr>),
    Acos(Box<Expr>),
    Atan(Box<Expr>),
    Atan2(Box<Expr>, Box<Expr>),
    Sinh(Box<Expr>),
    Cosh(Box<Expr>),
    Tanh(Box<Expr>),
    Exp(Box<Expr>),
    // natural log, or log in an explicit base
    Log(Box<Expr>, Option<Box<Expr>>),
    Log2(Box<Expr>),
    Log10(Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Floor(Box<Expr>),
    Ceil(Box<Expr>),
    Fabs(Box<Expr>),
    Trunc(Box<Expr>),
    Fmod(Box<Expr>, Box<Expr>),
    Hypot(Box<Expr>, Box<Expr>),
    Degrees(Box<Expr>),
    Radians(Box<Expr>),
    // the one sequence-taking function: fsum([...])
    Fsum(Vec<Expr>),
    Pi,
    E,
    Tau,
    Inf,
    Nan,
}

impl<Expr> MathFn<Expr> {
    pub fn name(&self) -> &'static str {
        use MathFn::*;
        match self {
            Sqrt(_) => "sqrt",
            Sin(_) => "sin",
            Cos(_) => "cos",
            Tan(_) => "tan",
            Asin(_) => "asin",
            Acos(_) => "acos",
            Atan(_) => "atan",
            Atan2(_, _) => "atan2",
            Sinh(_) => "sinh",
            Cosh(_) => "cosh",
            Tanh(_) => "tanh",
            Exp(_) => "exp",
            Log(_, _) => "log",
            Log2(_) => "log2",
            Log10(_) => "log10",
            Pow(_, _) => "pow",
            Floor(_) => "floor",
            Ceil(_) => "ceil",
            Fabs(_) => "fabs",
            Trunc(_) => "trunc",
            Fmod(_, _) => "fmod",
            Hypot(_, _) => "hypot",
            Degrees(_) => "degrees",
            Radians(_) => "radians",
            Fsum(_) => "fsum",
            Pi => "pi",
            E => "e",
            Tau => "tau",
            Inf => "inf",
            Nan => "nan",
        }
    }
}

pub fn is_0_arity_math_fn(name: &str) -> bool {
    matches!(name, "pi" | "e" | "tau" | "inf" | "nan")
}

pub fn is_math_fn(name: &str) -> bool {
    is_0_arity_math_fn(name)
        || matches!(
            name,
            "sqrt"
                | "sin"
                | "cos"
                | "tan"
                | "asin"
                | "acos"
                | "atan"
                | "atan2"
                | "sinh"
                | "cosh"
                | "tanh"
                | "exp"
                | "log"
                | "log2"
                | "log10"
                | "pow"
                | "floor"
                | "ceil"
                | "fabs"
                | "trunc"
                | "fmod"
                | "hypot"
                | "degrees"
                | "radians"
                | "fsum"
        )
}

/// Maps a raw identifier, bare or dotted with the literal `math.` namespace,
/// to its whitelist name. `None` for everything outside the whitelist,
/// including dotted names in any other namespace.
pub fn math_fn_name(raw: &str) -> Option<&str> {
    let name = raw.strip_prefix("math.").unwrap_or(raw);
    if name.contains('.') {
        return None;
    }
    if is_math_fn(name) { Some(name) } else { None }
}

#[test]
fn test_is_math_fn() {
    assert!(is_math_fn("sqrt"));
    assert!(is_math_fn("log10"));
    assert!(is_math_fn("fsum"));
    assert!(is_math_fn("pi"));
    assert!(!is_math_fn("sqrtz"));
    assert!(!is_math_fn("eval"));
    assert!(!is_math_fn("__import__"));
}

#[test]
fn test_is_0_arity_math_fn() {
    assert!(is_0_arity_math_fn("pi"));
    assert!(is_0_arity_math_fn("nan"));
    assert!(!is_0_arity_math_fn("sqrt"));
}

#[test]
fn test_math_fn_name() {
    assert_eq!(Some("sqrt"), math_fn_name("sqrt"));
    assert_eq!(Some("sqrt"), math_fn_name("math.sqrt"));
    assert_eq!(Some("pi"), math_fn_name("math.pi"));
    assert_eq!(None, math_fn_name("math"));
    assert_eq!(None, math_fn_name("math.frobnicate"));
    assert_eq!(None, math_fn_name("math.sqrt.x"));
    assert_eq!(None, math_fn_name("os.system"));
}

#[test]
fn test_name() {
    enum TestExpr {}

    assert_eq!("pi", MathFn::<TestExpr>::Pi.name());
    assert_eq!("inf", MathFn::<TestExpr>::Inf.name());
}
