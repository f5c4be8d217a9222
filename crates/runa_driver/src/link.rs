use std::path::{Path, PathBuf};
use std::process::Command;

use colored::*;
use runa_config::{DebugTrace, RunaBuildConfig, RunaConfig};
use runa_log::{phase_log, trace_dbg};

/// What the system compiler needs to turn an `.ll` file into an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlan {
  /// Compiler driver invoked on the IR (`clang` by default).
  pub cc: String,
  /// Runtime objects providing `print`, `argv` and the type methods.
  pub objects: Vec<PathBuf>,
}

impl LinkPlan {
  pub fn from_build_config(build: &RunaBuildConfig) -> Self {
    let mut objects: Vec<PathBuf> = Vec::with_capacity(build.runtime_objects.len());
    for obj in &build.runtime_objects {
      let path = PathBuf::from(obj);
      if !objects.contains(&path) {
        objects.push(path);
      }
    }

    Self {
      cc: build.cc.clone(),
      objects,
    }
  }

  /// Command line for linking `ll_path` into `bin_path`.
  pub fn command(
    &self,
    ll_path: &Path,
    bin_path: &Path,
  ) -> Command {
    let mut cmd = Command::new(&self.cc);
    cmd.arg(ll_path);

    for obj in &self.objects {
      cmd.arg(obj);
    }

    cmd.arg("-o").arg(bin_path);
    cmd
  }
}

pub fn format_tool_error(
  tool: &str,
  action: &str,
  stderr: &str,
) -> String {
  format!(
    "{} {} {} failed:\n{}",
    "Error:".red().bold(),
    tool.yellow(),
    action,
    stderr.trim()
  )
}

/// Compile and link the emitted IR with the runtime objects.
pub fn link_executable(
  config: &RunaConfig,
  ll_path: &Path,
  bin_path: &Path,
  plan: &LinkPlan,
) -> Result<(), String> {
  let mut cmd = plan.command(ll_path, bin_path);

  phase_log!(config, "Linking {} -> {}", ll_path.display(), bin_path.display());
  trace_dbg!(config, DebugTrace::Link, "{:?}", cmd);

  let output = cmd
    .output()
    .map_err(|e| format!("Failed to run {}: {}", plan.cc, e))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(format_tool_error(&plan.cc, "linking", &stderr));
  }

  Ok(())
}
