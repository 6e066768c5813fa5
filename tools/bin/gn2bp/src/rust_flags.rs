// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Normalization of `rustflags` lists into a deduplicated flag table.
//!
//! GN hands us flags in several spellings (`--cfg=x`, `--cfg x`, `-Cfoo=bar`,
//! `-Afoo`, `@file`). Before they can be written to a Soong module they are
//! folded into a [`RustFlags`] table keyed by the flag name, so that repeated
//! flags collapse into a single entry with a set of values.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use thiserror::Error;

/// Errors returned by [`normalize_rust_flags`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NormalizeError {
    /// A `--key=value` flag whose value itself holds more than one `=`.
    #[error("Could not normalize flag {0} as it has multiple equal signs.")]
    MultipleEqualSigns(String),

    /// A token that is neither a flag nor the value of a preceding flag.
    #[error("Field {0} does not relate to any key")]
    UnrelatedField(String),
}

impl NormalizeError {
    /// The literal token that could not be normalized.
    pub fn token(&self) -> &str {
        match self {
            NormalizeError::MultipleEqualSigns(token) => token,
            NormalizeError::UnrelatedField(token) => token,
        }
    }
}

/// Values seen for a flag. `None` means the flag never carried a value.
pub type FlagValues = Option<BTreeSet<String>>;

/// Normalized flags, keyed by flag name (e.g. `--cfg`, `-Cforce-unwind-tables`).
///
/// A key maps to `None` only if none of its occurrences carried a value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RustFlags(BTreeMap<String, FlagValues>);

impl RustFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: &str, value: Option<&str>) {
        match value {
            // A valueless occurrence never downgrades an existing value set.
            None => {
                self.0.entry(key.to_owned()).or_insert(None);
            }
            Some(value) => {
                self.0
                    .entry(key.to_owned())
                    .or_insert(None)
                    .get_or_insert_with(BTreeSet::new)
                    .insert(value.to_owned());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlagValues> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the values recorded for `key`. Valueless and unknown keys yield
    /// nothing.
    pub fn values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .get(key)
            .and_then(|values| values.as_ref())
            .into_iter()
            .flatten()
            .map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValues)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, FlagValues> {
        self.0
    }

    /// Serializes the table back into a flat, deduplicated flag list.
    ///
    /// Valueless keys are emitted as-is and every value as `key=value`,
    /// ordered by key and then by value.
    pub fn to_flag_list(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(key, values)| match values {
                None => vec![key.clone()],
                Some(values) => values
                    .iter()
                    .map(|value| format!("{key}={value}"))
                    .collect_vec(),
            })
            .collect()
    }
}

impl From<BTreeMap<String, FlagValues>> for RustFlags {
    fn from(map: BTreeMap<String, FlagValues>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a RustFlags {
    type Item = (&'a String, &'a FlagValues);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FlagValues>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Splits a `--key=value` flag, rejecting values that hold another `=` pair.
///
/// `--cfg=feature=X` is a single `--cfg` with the value `feature=X`, but a
/// third `=` as in `--cfg=feature=A=B` is ambiguous.
fn split_long_flag(flag: &str) -> Result<(&str, &str), NormalizeError> {
    let (key, value) = flag.split_once('=').unwrap_or((flag, ""));
    if value.matches('=').count() > 1 {
        return Err(NormalizeError::MultipleEqualSigns(flag.to_owned()));
    }
    Ok((key, value))
}

/// Normalizes a list of rust flags into a [`RustFlags`] table.
///
/// Recognized forms are `--key=value`, `--key value` (the next token is taken
/// as the value unless it starts with `-`), `--key`, `-Xkey[=value]` and
/// `@file`. Any other token is an error, as is a long flag with more than one
/// `=` in its value.
pub fn normalize_rust_flags<S: AsRef<str>>(flags: &[S]) -> Result<RustFlags, NormalizeError> {
    let mut normalized = RustFlags::new();
    let mut tokens = flags.iter().map(|s| s.as_ref()).peekable();

    while let Some(token) = tokens.next() {
        if token.starts_with('@') {
            // Response files are passed through untouched.
            normalized.insert(token, None);
        } else if token.starts_with("--") {
            if token.contains('=') {
                let (key, value) = split_long_flag(token)?;
                normalized.insert(key, Some(value));
            } else {
                let value = tokens.next_if(|next| !next.starts_with('-'));
                normalized.insert(token, value);
            }
        } else if token.starts_with('-') {
            match token.split_once('=') {
                Some((key, value)) => normalized.insert(key, Some(value)),
                None => normalized.insert(token, None),
            }
        } else {
            return Err(NormalizeError::UnrelatedField(token.to_owned()));
        }
    }

    Ok(normalized)
}
