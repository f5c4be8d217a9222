//! Loading extra type descriptors from a TOML registry file.
//!
//! ```toml
//! [[types]]
//! name = "point"
//! ir = "%point"
//! convention = "by-address"
//! layout = "{ i64, i64 }"
//!
//! [types.methods.__str__]
//! symbol = "point.__str__"
//! returns = "str"
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::{TypeDescriptor, TypeStore};

#[derive(Debug, Error)]
pub enum TypeError {
  #[error("unknown type `{0}`")]
  UnknownType(String),

  #[error("invalid type registry: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
  #[serde(default)]
  types: Vec<TypeDescriptor>,
}

impl TypeStore {
  /// Builtins extended (or overridden) by the descriptors in `src`.
  pub fn from_toml(src: &str) -> Result<Self, TypeError> {
    let mut store = Self::new();
    store.extend_from_toml(src)?;
    Ok(store)
  }

  /// Define every descriptor in `src`, then validate the whole registry.
  /// Returns how many descriptors were read.
  pub fn extend_from_toml(
    &mut self,
    src: &str,
  ) -> Result<usize, TypeError> {
    let file: RegistryFile = toml::from_str(src)?;
    let count = file.types.len();

    for desc in file.types {
      self.define(desc);
    }

    self.validate()?;
    Ok(count)
  }
}
