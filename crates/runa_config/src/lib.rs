use serde::{Deserialize, Serialize};

/// Name of the function lowered as the process entry point.
pub const DEFAULT_ENTRY: &str = "__main__";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DumpKind {
  Types,
  Signatures,
  Ir,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugTrace {
  Types,
  Codegen,
  Verify,
  Link,
  Driver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunaProjectBuildConfig {
  /// Annotated module tree (JSON) to compile.
  pub main_file: String,
  #[serde(default = "default_output_dir")]
  pub output_dir: String,
  /// Extra type descriptors merged over the builtins.
  #[serde(default)]
  pub types_file: Option<String>,
  /// Preamble inserted verbatim instead of the derived declarations.
  #[serde(default)]
  pub include_file: Option<String>,
  #[serde(default)]
  pub entry: Option<String>,
  #[serde(default)]
  pub platform: Option<String>,
  #[serde(default)]
  pub cc: Option<String>,
  /// Runtime objects passed to the linker.
  #[serde(default)]
  pub runtime: Vec<String>,
}

/// Contents of `runa.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunaProjectConfig {
  pub name: String,
  #[serde(default = "default_version")]
  pub version: String,
  pub build: RunaProjectBuildConfig,
}

impl RunaProjectConfig {
  pub fn from_toml(src: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(src)
  }
}

fn default_output_dir() -> String {
  "build".to_string()
}

fn default_version() -> String {
  "0.1.0".to_string()
}

#[derive(Debug, Clone)]
pub struct RunaBuildConfig {
  pub file: String,
  pub types_file: Option<String>,
  pub include_file: Option<String>,
  pub entry: String,
  /// Target platform identifier; the host OS when unset.
  pub platform: Option<String>,
  pub output_dir: String,
  pub dump: Vec<DumpKind>,
  /// Path of the emitted `.ll`; derived from `file` when unset.
  pub emit_ll: Option<String>,
  /// Path of the linked executable; no linking when unset.
  pub emit_bin: Option<String>,
  pub cc: String,
  pub runtime_objects: Vec<String>,
}

impl RunaBuildConfig {
  pub fn new(file: impl Into<String>) -> Self {
    Self {
      file: file.into(),
      types_file: None,
      include_file: None,
      entry: DEFAULT_ENTRY.to_string(),
      platform: None,
      output_dir: default_output_dir(),
      dump: Vec::new(),
      emit_ll: None,
      emit_bin: None,
      cc: "clang".to_string(),
      runtime_objects: Vec::new(),
    }
  }

  /// Fill unset fields from a project file. Explicit values win.
  pub fn merge_project(
    &mut self,
    project: &RunaProjectBuildConfig,
  ) {
    if self.types_file.is_none() {
      self.types_file.clone_from(&project.types_file);
    }

    if self.include_file.is_none() {
      self.include_file.clone_from(&project.include_file);
    }

    if self.platform.is_none() {
      self.platform.clone_from(&project.platform);
    }

    if let Some(entry) = &project.entry {
      if self.entry == DEFAULT_ENTRY {
        self.entry = entry.clone();
      }
    }

    if let Some(cc) = &project.cc {
      if self.cc == "clang" {
        self.cc = cc.clone();
      }
    }

    if self.runtime_objects.is_empty() {
      self.runtime_objects = project.runtime.clone();
    }

    if self.output_dir == default_output_dir() {
      self.output_dir = project.output_dir.clone();
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct RunaConfig {
  pub project_config: Option<RunaProjectConfig>,
  pub build_config: Option<RunaBuildConfig>,
  pub debug: bool,
  pub debug_trace: Vec<DebugTrace>,
  pub quiet: bool,
  pub verbose: u8,
}

impl RunaConfig {
  pub fn new_basic(
    debug: bool,
    debug_trace: Vec<DebugTrace>,
    quiet: bool,
    verbose: u8,
  ) -> Self {
    Self {
      debug,
      debug_trace,
      quiet,
      verbose,
      ..Self::default()
    }
  }

  pub fn dump_requested(
    &self,
    kind: DumpKind,
  ) -> bool {
    self
      .build_config
      .as_ref()
      .map(|bc| bc.dump.contains(&kind))
      .unwrap_or(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_project_file() {
    let project = RunaProjectConfig::from_toml(
      r#"
name = "hello"

[build]
main_file = "hello.json"
"#,
    )
    .unwrap();

    assert_eq!(project.name, "hello");
    assert_eq!(project.version, "0.1.0");
    assert_eq!(project.build.output_dir, "build");
    assert!(project.build.runtime.is_empty());
  }

  #[test]
  fn project_fills_only_unset_fields() {
    let project = RunaProjectConfig::from_toml(
      r#"
name = "hello"

[build]
main_file = "hello.json"
output_dir = "out"
platform = "darwin"
entry = "start"
types_file = "types.toml"
runtime = ["rt.o"]
"#,
    )
    .unwrap();

    let mut build = RunaBuildConfig::new("hello.json");
    build.types_file = Some("mine.toml".to_string());
    build.merge_project(&project.build);

    assert_eq!(build.types_file.as_deref(), Some("mine.toml"));
    assert_eq!(build.platform.as_deref(), Some("darwin"));
    assert_eq!(build.entry, "start");
    assert_eq!(build.output_dir, "out");
    assert_eq!(build.runtime_objects, vec!["rt.o".to_string()]);
  }

  #[test]
  fn dump_requires_build_config() {
    let mut config = RunaConfig::new_basic(false, vec![], false, 0);
    assert!(!config.dump_requested(DumpKind::Ir));

    let mut build = RunaBuildConfig::new("a.json");
    build.dump.push(DumpKind::Ir);
    config.build_config = Some(build);
    assert!(config.dump_requested(DumpKind::Ir));
    assert!(!config.dump_requested(DumpKind::Types));
  }
}
