// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

pub type Ident = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    EmptyExpression,
    InvalidToken,
    UnrecognizedEof,
    UnrecognizedToken,
    ExtraToken,
    ExpectedNumber,
    UnknownFunction,
    ForbiddenName,
    BadFunctionArgs,
    NotAScalar,
    DivisionByZero,
    DomainError,
    ResultOutOfRange,
    NotANumber,
    InsufficientData,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            EmptyExpression => "empty_expression",
            InvalidToken => "invalid_token",
            UnrecognizedEof => "unrecognized_eof",
            UnrecognizedToken => "unrecognized_token",
            ExtraToken => "extra_token",
            ExpectedNumber => "expected_number",
            UnknownFunction => "unknown_function",
            ForbiddenName => "forbidden_name",
            BadFunctionArgs => "bad_function_args",
            NotAScalar => "not_a_scalar",
            DivisionByZero => "division_by_zero",
            DomainError => "domain_error",
            ResultOutOfRange => "result_out_of_range",
            NotANumber => "not_a_number",
            InsufficientData => "insufficient_data",
        };

        write!(f, "{name}")
    }
}

/// An error anchored to a byte range of the expression text it was
/// detected in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExprError {
    pub start: u16,
    pub end: u16,
    pub code: ErrorCode,
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.code)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Expression,
    Arithmetic,
    Compute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<ExprError> for Error {
    fn from(err: ExprError) -> Self {
        let kind = match err.code {
            ErrorCode::DivisionByZero | ErrorCode::DomainError | ErrorCode::ResultOutOfRange => {
                ErrorKind::Arithmetic
            }
            _ => ErrorKind::Expression,
        };
        Error {
            kind,
            code: err.code,
            details: Some(format!("at {}:{}", err.start, err.end)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Expression => "ExpressionError",
            ErrorKind::Arithmetic => "ArithmeticError",
            ErrorKind::Compute => "ComputeError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;
pub type EvalResult<T> = result::Result<T, ExprError>;

#[macro_export]
macro_rules! expr_err(
    ($code:tt, $start:expr, $end:expr) => {{
        use $crate::common::{ErrorCode, ExprError};
        Err(ExprError{ start: $start, end: $end, code: ErrorCode::$code})
    }}
);

#[macro_export]
macro_rules! calc_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Compute,
            ErrorCode::$code,
            Some($str),
        ))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Compute, ErrorCode::$code, None))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Compute,
        ErrorCode::InsufficientData,
        Some("insufficient data to compute".to_owned()),
    );
    assert_eq!(
        "ComputeError{insufficient_data: insufficient data to compute}",
        format!("{err}")
    );

    let err = Error::new(ErrorKind::Arithmetic, ErrorCode::DivisionByZero, None);
    assert_eq!("ArithmeticError{division_by_zero}", format!("{err}"));
}

#[test]
fn test_expr_error_classification() {
    let err: Error = ExprError {
        start: 2,
        end: 3,
        code: ErrorCode::DomainError,
    }
    .into();
    assert_eq!(ErrorKind::Arithmetic, err.kind);

    let err: Error = ExprError {
        start: 0,
        end: 4,
        code: ErrorCode::ForbiddenName,
    }
    .into();
    assert_eq!(ErrorKind::Expression, err.kind);
    assert_eq!(Some("at 0:4".to_owned()), err.get_details());
}
