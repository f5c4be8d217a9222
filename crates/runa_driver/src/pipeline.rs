use std::path::{Path, PathBuf};

use runa_ast::Module;
use runa_config::{DebugTrace, DumpKind, RunaBuildConfig, RunaConfig};
use runa_lir::{CodegenOptions, emit_llvm, lowering::SignatureTable};
use runa_log::{log_dbg, phase_log, phase_ok, trace_dbg};
use runa_type::TypeStore;

use crate::error::DriverError;
use crate::link::{LinkPlan, link_executable};
use crate::tables::{signatures_table, types_table};

/// Files produced by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
  pub ll_path: PathBuf,
  pub bin_path: Option<PathBuf>,
}

fn read_file(path: &str) -> Result<String, DriverError> {
  std::fs::read_to_string(path).map_err(|e| DriverError::read(path, e))
}

/// Builtin registry extended with the descriptors of `types_file`, if any.
pub fn load_types(
  config: &RunaConfig,
  types_file: Option<&str>,
) -> Result<TypeStore, DriverError> {
  let mut types = TypeStore::new();

  if let Some(path) = types_file {
    let src = read_file(path)?;
    let count = types.extend_from_toml(&src).map_err(|source| DriverError::Types {
      path: path.to_string(),
      source,
    })?;
    trace_dbg!(config, DebugTrace::Types, "{} descriptor(s) from {}", count, path);
  }

  trace_dbg!(config, DebugTrace::Types, "registry holds {} type(s)", types.len());
  Ok(types)
}

/// Print the resolved type registry.
pub fn print_types(
  config: &RunaConfig,
  types_file: Option<&str>,
) -> Result<(), DriverError> {
  let types = load_types(config, types_file)?;
  println!("{}", types_table(&types));
  Ok(())
}

/// `.ll` destination: the explicit path, or `<output_dir>/<stem>.ll`.
fn ll_destination(build: &RunaBuildConfig) -> PathBuf {
  if let Some(path) = &build.emit_ll {
    return PathBuf::from(path);
  }

  let stem = Path::new(&build.file)
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "out".to_string());

  Path::new(&build.output_dir).join(format!("{}.ll", stem))
}

fn write_output(
  path: &Path,
  content: &str,
) -> Result<(), DriverError> {
  let display = path.display().to_string();

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).map_err(|e| DriverError::write(&display, e))?;
  }

  std::fs::write(path, content).map_err(|e| DriverError::write(display, e))
}

/// Load the module tree named by the build configuration, lower it to LLVM
/// IR and write the result. Links an executable when `emit_bin` is set.
pub fn compile_file(config: &RunaConfig) -> Result<BuildOutput, DriverError> {
  let build = config.build_config.as_ref().ok_or(DriverError::MissingBuildConfig)?;

  phase_log!(config, "Loading... {}", build.file);
  let src = read_file(&build.file)?;
  let module = Module::from_json(&src).map_err(|source| DriverError::Json {
    path: build.file.clone(),
    source,
  })?;
  log_dbg!(config, "{} function(s) in {}", module.functions.len(), build.file);

  let types = load_types(config, build.types_file.as_deref())?;

  let mut options = CodegenOptions::from_config(config);
  if let Some(path) = &build.include_file {
    options.include = Some(read_file(path)?);
    trace_dbg!(config, DebugTrace::Driver, "preamble from {}", path);
  }

  if config.dump_requested(DumpKind::Types) {
    println!("{}", types_table(&types));
  }

  if config.dump_requested(DumpKind::Signatures) {
    let signatures = SignatureTable::collect(&module, &types, &options.entry)?;
    println!("{}", signatures_table(&types, &signatures));
  }

  phase_log!(config, "Lowering... {} for {}", build.file, options.platform);
  let ir = emit_llvm(&module, &types, &options, Some(config))?;

  if config.dump_requested(DumpKind::Ir) {
    print!("{}", ir);
  }

  let ll_path = ll_destination(build);
  write_output(&ll_path, &ir)?;
  trace_dbg!(config, DebugTrace::Driver, "wrote {} byte(s) to {}", ir.len(), ll_path.display());

  let bin_path = match &build.emit_bin {
    Some(bin) => {
      let bin_path = PathBuf::from(bin);
      let plan = LinkPlan::from_build_config(build);
      link_executable(config, &ll_path, &bin_path, &plan).map_err(DriverError::Toolchain)?;
      Some(bin_path)
    },
    None => None,
  };

  match &bin_path {
    Some(bin) => phase_ok!(config, "Built {}", bin.display()),
    None => phase_ok!(config, "Emitted {}", ll_path.display()),
  }

  Ok(BuildOutput { ll_path, bin_path })
}
