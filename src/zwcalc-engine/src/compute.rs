// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Rule-driven dispatch from a parsed record to one computed value.

use serde::Serialize;

use crate::block::{ParsedRecord, Scalar};
use crate::calc_err;
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::interpreter::evaluate;

/// One computed result: the label is a canonical operation name, `"expr"`
/// for evaluated expressions, or `"sum*"` for the fallback aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub label: String,
    pub value: f64,
}

impl Calculation {
    fn new(label: &str, value: f64) -> Self {
        Calculation {
            label: label.to_owned(),
            value,
        }
    }
}

fn arith_err(code: ErrorCode) -> Error {
    Error::new(ErrorKind::Arithmetic, code, None)
}

fn to_number(scalar: &Scalar) -> Result<f64> {
    match scalar {
        Scalar::Number(n) => Ok(*n),
        Scalar::Text(s) => match s.parse() {
            Ok(n) => Ok(n),
            Err(_) => calc_err!(NotANumber, format!("not a number: {s:?}")),
        },
    }
}

/// Applies the dispatch rules to a parsed record, first match wins:
/// expression, binary operation, square root, list reduction, and finally
/// the fallback list sum.  A matched rule that cannot complete fails
/// rather than falling through to the next one.
pub fn compute(record: &ParsedRecord) -> Result<Calculation> {
    if let Some(expr) = &record.expr {
        return Ok(Calculation::new("expr", evaluate(expr)?));
    }

    let op = record.op.as_deref().unwrap_or("");

    if let (Some(a), Some(b)) = (&record.a, &record.b) {
        if matches!(op, "add" | "sub" | "mul" | "div" | "pow") {
            let a = to_number(a)?;
            let b = to_number(b)?;
            let value = match op {
                "add" => a + b,
                "sub" => a - b,
                "mul" => a * b,
                "div" => {
                    if b == 0.0 {
                        return Err(arith_err(ErrorCode::DivisionByZero));
                    }
                    a / b
                }
                "pow" => {
                    if a == 0.0 && b < 0.0 {
                        return Err(arith_err(ErrorCode::DivisionByZero));
                    }
                    let value = a.powf(b);
                    if value.is_nan() && !a.is_nan() && !b.is_nan() {
                        return Err(arith_err(ErrorCode::DomainError));
                    }
                    if value.is_infinite() && a.is_finite() && b.is_finite() {
                        return Err(arith_err(ErrorCode::ResultOutOfRange));
                    }
                    value
                }
                _ => unreachable!(),
            };
            return Ok(Calculation::new(op, value));
        }
    }

    if op == "sqrt" {
        if let Some(a) = &record.a {
            let a = to_number(a)?;
            if a < 0.0 {
                return Err(arith_err(ErrorCode::DomainError));
            }
            return Ok(Calculation::new("sqrt", a.sqrt()));
        }
    }

    if let Some(list) = record.list.as_deref() {
        if !list.is_empty() {
            if matches!(op, "mean" | "min" | "max" | "sum") {
                let value = match op {
                    "mean" => list.iter().sum::<f64>() / list.len() as f64,
                    // f64 is only PartialOrd, so no std::cmp::min here
                    "min" => list
                        .iter()
                        .copied()
                        .fold(f64::INFINITY, |acc, n| if n < acc { n } else { acc }),
                    "max" => list
                        .iter()
                        .copied()
                        .fold(f64::NEG_INFINITY, |acc, n| if n > acc { n } else { acc }),
                    "sum" => list.iter().sum(),
                    _ => unreachable!(),
                };
                return Ok(Calculation::new(op, value));
            }
            return Ok(Calculation::new("sum*", list.iter().sum()));
        }
    }

    calc_err!(InsufficientData, "insufficient data to compute".to_owned())
}
