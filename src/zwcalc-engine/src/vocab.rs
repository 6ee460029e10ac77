// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Alias tables and key/operation normalization.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Structural fields a block line can normalize to, each with the surface
/// spellings it accepts.
pub const KEY_ALIASES: &[(&str, &[&str])] = &[
    (
        "op",
        &[
            "op",
            "operation",
            "do",
            "verb",
            "calc",
            "function",
            "ziegelwagga",
            "zw",
            "intent",
            "combine",
        ],
    ),
    (
        "a",
        &["a", "x", "left", "lhs", "input1", "arg1", "first", "alpha"],
    ),
    (
        "b",
        &["b", "y", "right", "rhs", "input2", "arg2", "second", "beta"],
    ),
    (
        "list",
        &[
            "list", "values", "items", "nums", "numbers", "set", "array", "vector", "bag",
        ],
    ),
    (
        "expr",
        &[
            "expr",
            "expression",
            "formula",
            "compute",
            "math",
            "equation",
            "line",
        ],
    ),
    (
        "redefine",
        &["define", "map", "alias", "vocab", "meaning", "bind", "schema"],
    ),
];

/// Operation names in priority order. `detect_op` scans this table top to
/// bottom with substring matching, so the order is part of the contract:
/// "sum" resolves to `add` because it is one of add's spellings and add's
/// entry comes first.
pub const OP_ALIASES: &[(&str, &[&str])] = &[
    ("add", &["add", "plus", "sum", "aggregate"]),
    ("sub", &["sub", "minus", "diff", "difference", "subtract"]),
    ("mul", &["mul", "times", "product", "multiply"]),
    ("div", &["div", "divide", "quotient"]),
    ("pow", &["pow", "power", "exp", "exponent"]),
    ("sqrt", &["sqrt", "root"]),
    ("mean", &["mean", "avg", "average"]),
    ("min", &["min", "minimum", "lowest"]),
    ("max", &["max", "maximum", "highest"]),
    ("sum", &["sum", "summation", "sigma"]),
];

/// Per-block vocabulary overrides built from redefine directives.
///
/// Lookups win over the static table and destinations are used verbatim,
/// so a block can locally rebind any spelling, including ones the static
/// table already claims.
#[derive(Clone, Debug, Default)]
pub struct CustomVocabulary {
    mappings: HashMap<String, String>,
}

impl CustomVocabulary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Merges every `source -> destination` pair found in `directive`.
    /// Tokens are word characters and hyphens; anything else between
    /// pairs (commas, prose) is ignored.
    pub fn extend_from_directive(&mut self, directive: &str) {
        lazy_static! {
            static ref PAIR_RE: Regex = Regex::new(r"([\w\-]+)\s*->\s*([\w\-]+)").unwrap();
        }

        let directive = directive.to_lowercase();
        for caps in PAIR_RE.captures_iter(&directive) {
            self.mappings.insert(caps[1].to_owned(), caps[2].to_owned());
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.mappings.get(token).map(|s| s.as_str())
    }
}

/// Maps a raw key to its canonical field name: block vocabulary first,
/// then the static table, then the lowercased token itself (unknown keys
/// pass through and land in `extras`).
pub fn normalize_key(raw: &str, vocab: &CustomVocabulary) -> String {
    let token = raw.trim().to_lowercase();
    if let Some(dst) = vocab.get(&token) {
        return dst.to_owned();
    }
    for (canon, aliases) in KEY_ALIASES {
        if aliases.contains(&token.as_str()) {
            return (*canon).to_owned();
        }
    }
    token
}

/// Resolves free text to a canonical operation name: the first table entry
/// with any spelling occurring as a substring of the value wins. `None`
/// when nothing matches; the caller decides the fallback.
pub fn detect_op(raw: &str) -> Option<&'static str> {
    let value = raw.trim().to_lowercase();
    for (canon, aliases) in OP_ALIASES {
        if aliases.iter().any(|alias| value.contains(alias)) {
            return Some(canon);
        }
    }
    None
}

/// Pulls every signed numeric substring out of free text, in order.
/// Deliberately narrow: an optional minus, digits, an optional decimal
/// fraction. No exponents, no thousands separators.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    lazy_static! {
        static ref BLOB_RE: Regex = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
    }

    BLOB_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
