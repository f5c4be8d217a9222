#![allow(dead_code)]

use std::path::{Path, PathBuf};

use runa_ast::{Expression, Function, Module, Statement};
use runa_config::{DEFAULT_ENTRY, RunaBuildConfig, RunaConfig};
use tempfile::TempDir;

/// A scratch directory holding the inputs of one build.
pub struct Project {
  pub dir: TempDir,
}

impl Project {
  pub fn new() -> Self {
    Self {
      dir: tempfile::tempdir().expect("failed to create temp dir"),
    }
  }

  pub fn path(
    &self,
    name: &str,
  ) -> PathBuf {
    self.dir.path().join(name)
  }

  pub fn write(
    &self,
    name: &str,
    content: &str,
  ) -> String {
    let path = self.path(name);
    std::fs::write(&path, content).expect("failed to write input");
    path.to_string_lossy().into_owned()
  }

  pub fn write_module(
    &self,
    name: &str,
    module: &Module,
  ) -> String {
    self.write(name, &module.to_json().expect("failed to serialize module"))
  }

  /// Build configuration for `file` writing into `<dir>/build`.
  pub fn build_config(
    &self,
    file: &str,
  ) -> RunaBuildConfig {
    let mut build = RunaBuildConfig::new(file);
    build.output_dir = self.path("build").to_string_lossy().into_owned();
    build.platform = Some("linux".to_string());
    build
  }
}

pub fn quiet(build: RunaBuildConfig) -> RunaConfig {
  let mut config = RunaConfig::new_basic(false, vec![], true, 0);
  config.build_config = Some(build);
  config
}

pub fn read(path: &Path) -> String {
  std::fs::read_to_string(path).expect("failed to read output")
}

/// `print(str(1 + 2))` as the whole program.
pub fn hello() -> Module {
  let sum = Expression::binary(runa_ast::BinaryOperator::Add, Expression::int(1), Expression::int(2));
  let body = vec![Statement::expr(Expression::call(
    "print",
    vec![Expression::call("str", vec![sum])],
  ))];

  Module::new(vec![Function::new(DEFAULT_ENTRY, vec![], "void", body)])
}
