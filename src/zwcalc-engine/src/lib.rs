// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

mod ast;
mod block;
mod builtins;
pub mod common;
mod compute;
mod interpreter;
mod parser;
mod token;
mod vocab;

pub use self::block::{ParsedRecord, Scalar, Value, parse_block};
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::compute::{Calculation, compute};
pub use self::interpreter::evaluate;
pub use self::vocab::{CustomVocabulary, detect_op, normalize_key};
