mod cli;

use std::path::Path;

use clap::Parser as ClapParser;
use colored::*;
use runa_config::{RunaBuildConfig, RunaConfig, RunaProjectConfig};
use runa_driver::{DriverError, compile_file, print_types};

use cli::{BuildCommand, Cli, EmitKind, SubCommand};

const PROJECT_FILE: &str = "runa.toml";

fn load_project_config(dir: &Path) -> Result<Option<RunaProjectConfig>, String> {
  let file_path = dir.join(PROJECT_FILE);

  if !file_path.exists() {
    return Ok(None);
  }

  let content = std::fs::read_to_string(&file_path)
    .map_err(|e| format!("Failed to read '{}': {}", file_path.display(), e))?;

  toml::from_str::<RunaProjectConfig>(&content)
    .map(Some)
    .map_err(|e| format!("Invalid '{}': {}", file_path.display(), e))
}

fn build_config(
  build: &BuildCommand,
  cli: &Cli,
  project: Option<&RunaProjectConfig>,
) -> Result<RunaBuildConfig, String> {
  let file = match (&build.file_path, project) {
    (Some(file), _) => file.clone(),
    (None, Some(project)) => project.build.main_file.clone(),
    (None, None) => {
      return Err(format!(
        "No file path provided. Please provide a module tree or run inside a directory with a `{}`.",
        PROJECT_FILE
      ));
    },
  };

  let mut config = RunaBuildConfig::new(file);
  config.types_file.clone_from(&build.types);
  config.include_file.clone_from(&build.include);
  config.platform.clone_from(&build.platform);
  config.emit_ll.clone_from(&build.emit_ll);
  config.runtime_objects.clone_from(&build.runtime);
  config.dump = cli.dump.iter().copied().map(Into::into).collect();

  if let Some(entry) = &build.entry {
    config.entry.clone_from(entry);
  }

  if let Some(output_dir) = &build.output_dir {
    config.output_dir.clone_from(output_dir);
  }

  if let Some(cc) = &build.cc {
    config.cc.clone_from(cc);
  }

  if let Some(project) = project {
    config.merge_project(&project.build);
  }

  if build.emit.contains(&EmitKind::Bin) {
    let name = match (&build.file_path, project) {
      (None, Some(project)) => project.name.clone(),
      _ => Path::new(&config.file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("out")
        .to_string(),
    };
    config.emit_bin = Some(format!("{}/{}", config.output_dir, name));
  }

  Ok(config)
}

fn parse_cli_to_config(
  cli: &Cli,
  project: Option<RunaProjectConfig>,
) -> Result<RunaConfig, String> {
  let mut config = RunaConfig::new_basic(
    cli.debug,
    cli.debug_trace.iter().copied().map(Into::into).collect(),
    cli.quiet,
    cli.verbose,
  );

  if let SubCommand::Build(build) = &cli.subcommand {
    config.build_config = Some(build_config(build, cli, project.as_ref())?);
  }

  config.project_config = project;
  Ok(config)
}

fn report(err: &DriverError) {
  match err {
    DriverError::Toolchain(message) => eprintln!("{}", message),
    _ => eprintln!("{} {}", "Error:".red().bold(), err),
  }
}

fn main() {
  let cli = Cli::parse();

  let config = load_project_config(Path::new(".")).and_then(|project| parse_cli_to_config(&cli, project));
  let config = match config {
    Ok(config) => config,
    Err(message) => {
      eprintln!("{} {}", "Error:".red().bold(), message);
      std::process::exit(1);
    },
  };

  let result = match &cli.subcommand {
    SubCommand::Build(_) => compile_file(&config).map(|_| ()),
    SubCommand::Types(types) => {
      let types_file = types.types.as_deref().or_else(|| {
        config
          .project_config
          .as_ref()
          .and_then(|p| p.build.types_file.as_deref())
      });
      print_types(&config, types_file)
    },
  };

  if let Err(err) = result {
    report(&err);
    std::process::exit(1);
  }
}
