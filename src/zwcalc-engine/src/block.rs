// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Tolerant line-oriented parsing of one text block.
//!
//! Parsing never fails: every line is absorbed into some field of the
//! record, and a block that yields nothing usable surfaces later as an
//! insufficient-data compute error rather than a parse fault.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vocab::{CustomVocabulary, detect_op, extract_numbers, normalize_key};

// Helper functions for serde skip_serializing_if

fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

fn is_empty_map(val: &BTreeMap<String, Value>) -> bool {
    val.is_empty()
}

/// An `a`/`b` operand: numeric when anything numeric could be pulled out
/// of the line, otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

/// An extras entry: one number, several, or free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

/// Everything one block parse produced.  Field names match the canonical
/// keys, so the diagnostic JSON reads like a cleaned-up copy of the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "is_empty_map")]
    pub extras: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub notes: Vec<String>,
}

/// Direct float parse first, then the first number out of a blob scan,
/// then the raw text.
fn parse_scalar(value: &str) -> Scalar {
    if let Ok(n) = value.parse::<f64>() {
        return Scalar::Number(n);
    }
    match extract_numbers(value).first() {
        Some(&n) => Scalar::Number(n),
        None => Scalar::Text(value.to_owned()),
    }
}

/// Parses one block of text into a record.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.  A line
/// with a colon is a keyed field (the key normalized through the block's
/// vocabulary); a keyless line is classified by shape: operator characters
/// make it an expression, numbers extend the list, anything else is a note.
pub fn parse_block(text: &str) -> ParsedRecord {
    let mut vocab = CustomVocabulary::new();
    let mut record = ParsedRecord::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            if line.contains(['+', '-', '*', '/', '(', ')', '^']) {
                record.expr = Some(line.replace('^', "**"));
            } else {
                let nums = extract_numbers(line);
                if nums.is_empty() {
                    record.notes.push(line.to_owned());
                } else {
                    record.list.get_or_insert_with(Vec::new).extend(nums);
                }
            }
            continue;
        };

        let key = normalize_key(key, &vocab);
        let value = value.trim();

        match key.as_str() {
            // redefine-class lines only feed the vocabulary.  The four
            // extra names matter when a vocabulary destination is itself
            // one of them; destinations are never re-normalized.
            "redefine" | "alias" | "meaning" | "vocab" | "schema" => {
                vocab.extend_from_directive(value);
            }
            "expr" => record.expr = Some(value.replace('^', "**")),
            "list" => record.list = Some(extract_numbers(value)),
            "op" => {
                record.op = Some(match detect_op(value) {
                    Some(op) => op.to_owned(),
                    None => value.to_lowercase(),
                });
            }
            "a" => record.a = Some(parse_scalar(value)),
            "b" => record.b = Some(parse_scalar(value)),
            _ => {
                let nums = extract_numbers(value);
                let entry = match nums.len() {
                    0 => Value::Text(value.to_owned()),
                    1 => Value::Number(nums[0]),
                    _ => Value::Numbers(nums),
                };
                record.extras.insert(key, entry);
            }
        }
    }

    record
}
