use std::io;

use runa_lir::CodegenError;
use runa_type::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
  #[error("failed to read `{path}`: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to write `{path}`: {source}")]
  Write {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("invalid module tree in `{path}`: {source}")]
  Json {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("types file `{path}`: {source}")]
  Types {
    path: String,
    #[source]
    source: TypeError,
  },

  #[error(transparent)]
  Codegen(#[from] CodegenError),

  #[error("{0}")]
  Toolchain(String),

  #[error("no build configuration given")]
  MissingBuildConfig,
}

impl DriverError {
  pub(crate) fn read(
    path: impl Into<String>,
    source: io::Error,
  ) -> Self {
    DriverError::Read {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn write(
    path: impl Into<String>,
    source: io::Error,
  ) -> Self {
    DriverError::Write {
      path: path.into(),
      source,
    }
  }
}
