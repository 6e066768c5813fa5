// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use thiserror::Error;

/// The value of a README metadata field. Most fields hold a single string,
/// but some (e.g. `License`) may be repeated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Single(value) => write!(f, "{value}"),
            FieldValue::List(values) => write!(f, "[{}]", values.iter().join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

/// A metadata record such as the fields of a README.chromium.
pub type Metadata = BTreeMap<String, FieldValue>;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MapperError {
    #[error("Expected absence of key `{key}` but found {found}")]
    UnexpectedKey { key: String, found: FieldValue },

    #[error("Expected presence of key {key} but was not found.")]
    MissingKey { key: String },

    #[error("Expected \"{expected}\" but found {found} in the README.chromium")]
    ValueMismatch {
        key: String,
        expected: FieldValue,
        found: FieldValue,
    },
}

/// Overwrites one metadata field after checking that it holds the value we
/// expect to replace.
///
/// An `expected` value of `None` means the field must not exist yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mapper {
    key: String,
    expected: Option<FieldValue>,
    write_value: FieldValue,
}

impl Mapper {
    pub fn new(
        key: impl Into<String>,
        expected: Option<FieldValue>,
        write_value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            key: key.into(),
            expected,
            write_value: write_value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Checks the expectation against `metadata` without modifying it.
    pub fn check(&self, metadata: &Metadata) -> Result<(), MapperError> {
        match (&self.expected, metadata.get(&self.key)) {
            (None, Some(found)) => Err(MapperError::UnexpectedKey {
                key: self.key.clone(),
                found: found.clone(),
            }),
            (Some(_), None) => Err(MapperError::MissingKey {
                key: self.key.clone(),
            }),
            (Some(expected), Some(found)) if expected != found => {
                Err(MapperError::ValueMismatch {
                    key: self.key.clone(),
                    expected: expected.clone(),
                    found: found.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Writes the new value into `metadata` once the expectation holds.
    pub fn write(&self, metadata: &mut Metadata) -> Result<(), MapperError> {
        self.check(metadata)?;
        tracing::debug!("Setting {} to {}", self.key, self.write_value);
        metadata.insert(self.key.clone(), self.write_value.clone());
        Ok(())
    }
}

/// Applies `mappers` in order. On failure `metadata` is left unmodified.
pub fn apply_mappers(mappers: &[Mapper], metadata: &mut Metadata) -> Result<(), MapperError> {
    let mut updated = metadata.clone();
    for mapper in mappers {
        mapper.write(&mut updated)?;
    }
    *metadata = updated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn metadata(entries: &[(&str, &str)]) -> Metadata {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), FieldValue::from(*value)))
            .collect()
    }

    #[test]
    fn test_write_expected_value() -> Result<(), MapperError> {
        let mut record = metadata(&[("License", "BSD"), ("Name", "zlib")]);
        Mapper::new("License", Some("BSD".into()), "BSD-3-Clause").write(&mut record)?;
        assert_eq!(
            record,
            metadata(&[("License", "BSD-3-Clause"), ("Name", "zlib")])
        );
        Ok(())
    }

    #[test]
    fn test_write_expected_absence() -> Result<(), MapperError> {
        let mut record = metadata(&[("Name", "zlib")]);
        Mapper::new(
            "License File",
            None,
            vec!["LICENSE".to_owned(), "NOTICE".to_owned()],
        )
        .write(&mut record)?;
        assert_eq!(
            record.get("License File"),
            Some(&FieldValue::List(vec![
                "LICENSE".to_owned(),
                "NOTICE".to_owned()
            ]))
        );
        Ok(())
    }

    #[test]
    fn test_unexpected_key() {
        let mut record = metadata(&[("License", "MIT")]);
        let err = Mapper::new("License", None, "Apache-2.0")
            .write(&mut record)
            .unwrap_err();
        assert_eq!(
            err,
            MapperError::UnexpectedKey {
                key: "License".into(),
                found: "MIT".into(),
            }
        );
        assert_eq!(err.to_string(), "Expected absence of key `License` but found MIT");
        assert_eq!(record, metadata(&[("License", "MIT")]));
    }

    #[test]
    fn test_missing_key() {
        let mut record = metadata(&[]);
        let err = Mapper::new("License", Some("MIT".into()), "Apache-2.0")
            .write(&mut record)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected presence of key License but was not found."
        );
        assert!(record.is_empty());
    }

    #[test]
    fn test_value_mismatch() {
        let mut record = metadata(&[("License", "MIT")]);
        let err = Mapper::new("License", Some("BSD".into()), "Apache-2.0")
            .write(&mut record)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected \"BSD\" but found MIT in the README.chromium"
        );
    }

    #[test]
    fn test_list_values_are_compared_whole() {
        let mut record = Metadata::new();
        record.insert(
            "License".into(),
            vec!["MIT".to_owned(), "BSD".to_owned()].into(),
        );
        let err = Mapper::new("License", Some("MIT".into()), "MIT")
            .write(&mut record)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected \"MIT\" but found [MIT, BSD] in the README.chromium"
        );
    }

    #[test]
    fn test_apply_mappers_is_all_or_nothing() {
        let original = metadata(&[("License", "MIT"), ("Name", "zlib")]);
        let mut record = original.clone();
        let mappers = [
            Mapper::new("Name", Some("zlib".into()), "zlib-ng"),
            Mapper::new("Version", Some("1.0".into()), "2.0"),
        ];
        let err = apply_mappers(&mappers, &mut record).unwrap_err();
        assert_eq!(
            err,
            MapperError::MissingKey {
                key: "Version".into()
            }
        );
        assert_eq!(record, original);
    }

    #[test]
    fn test_apply_mappers() -> Result<(), MapperError> {
        let mut record = metadata(&[("License", "MIT")]);
        apply_mappers(
            &[
                Mapper::new("License", Some("MIT".into()), "Apache-2.0"),
                Mapper::new("Shipped", None, "yes"),
            ],
            &mut record,
        )?;
        assert_eq!(
            record,
            metadata(&[("License", "Apache-2.0"), ("Shipped", "yes")])
        );
        Ok(())
    }
}
