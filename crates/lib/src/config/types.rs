//! Value types embedded in a [`ProjectConfig`](super::ProjectConfig).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A dependency specifier could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dependency specifier '{0}': expected a package name optionally followed by a version constraint")]
pub struct InvalidDependency(pub String);

/// A package to install: a name plus an optional version constraint.
///
/// Parsed from strings like `requests`, `requests>=2.31` or `numpy == 1.26.*`.
/// The name is the leading run of `[A-Za-z0-9._-]`; everything after it (trimmed)
/// is kept as the constraint. The trimmed specifier is what the installer receives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencySpec {
  pub name: String,
  pub constraint: Option<String>,
  spec: String,
}

impl DependencySpec {
  /// A specifier with no version constraint.
  pub fn new(name: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      spec: name.clone(),
      name,
      constraint: None,
    }
  }
}

impl FromStr for DependencySpec {
  type Err = InvalidDependency;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let spec = s.trim();
    let name_end = spec
      .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
      .unwrap_or(spec.len());

    let name = &spec[..name_end];
    if name.is_empty() {
      return Err(InvalidDependency(s.to_string()));
    }

    let rest = spec[name_end..].trim();
    Ok(Self {
      name: name.to_string(),
      constraint: (!rest.is_empty()).then(|| rest.to_string()),
      spec: spec.to_string(),
    })
  }
}

impl TryFrom<String> for DependencySpec {
  type Error = InvalidDependency;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<DependencySpec> for String {
  fn from(spec: DependencySpec) -> Self {
    spec.to_string()
  }
}

impl fmt::Display for DependencySpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.spec)
  }
}

/// Version resource metadata stamped into Windows executables.
///
/// Every field is optional; only the ones that are set become compiler flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsMetadata {
  pub product_name: Option<String>,
  pub file_description: Option<String>,
  pub product_version: Option<String>,
  pub file_version: Option<String>,
  pub copyright: Option<String>,
  pub company_name: Option<String>,
}

impl WindowsMetadata {
  /// Set fields as `(flag name, value)` pairs, in a fixed order.
  pub fn entries(&self) -> Vec<(&'static str, &str)> {
    [
      ("product-name", &self.product_name),
      ("file-description", &self.file_description),
      ("product-version", &self.product_version),
      ("file-version", &self.file_version),
      ("copyright", &self.copyright),
      ("company-name", &self.company_name),
    ]
    .into_iter()
    .filter_map(|(flag, value)| value.as_deref().map(|v| (flag, v)))
    .collect()
  }
}
