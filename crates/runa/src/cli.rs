use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use runa_config::{DebugTrace, DumpKind};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum DumpKindCli {
  /// Dump the resolved type registry
  Types,
  /// Dump the collected function signatures
  Signatures,
  /// Dump the emitted LLVM IR to stdout
  Ir,
}

impl From<DumpKindCli> for DumpKind {
  fn from(value: DumpKindCli) -> DumpKind {
    match value {
      DumpKindCli::Types => DumpKind::Types,
      DumpKindCli::Signatures => DumpKind::Signatures,
      DumpKindCli::Ir => DumpKind::Ir,
    }
  }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum DebugTraceCli {
  Types,
  Codegen,
  Verify,
  Link,
  Driver,
}

impl From<DebugTraceCli> for DebugTrace {
  fn from(value: DebugTraceCli) -> DebugTrace {
    match value {
      DebugTraceCli::Types => DebugTrace::Types,
      DebugTraceCli::Codegen => DebugTrace::Codegen,
      DebugTraceCli::Verify => DebugTrace::Verify,
      DebugTraceCli::Link => DebugTrace::Link,
      DebugTraceCli::Driver => DebugTrace::Driver,
    }
  }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum EmitKind {
  /// Textual LLVM IR (always written)
  Ll,
  /// Executable linked with the system compiler
  Bin,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct BuildCommand {
  /// Module tree (JSON) to compile, or nothing for project mode
  pub file_path: Option<String>,

  /// Extra type descriptors (TOML) merged over the builtins
  #[arg(long)]
  pub types: Option<String>,

  /// Preamble inserted verbatim instead of the derived declarations
  #[arg(long)]
  pub include: Option<String>,

  /// Target platform (linux, darwin); defaults to the host
  #[arg(long)]
  pub platform: Option<String>,

  /// Function lowered as the process entry point
  #[arg(long)]
  pub entry: Option<String>,

  /// Output directory
  #[arg(short = 'o', long)]
  pub output_dir: Option<String>,

  /// Path of the emitted `.ll` file
  #[arg(long)]
  pub emit_ll: Option<String>,

  /// Artifacts to produce (ll, bin)
  #[arg(long, value_enum, value_delimiter = ',')]
  pub emit: Vec<EmitKind>,

  /// Compiler used to link the IR
  #[arg(long)]
  pub cc: Option<String>,

  /// Runtime object to link (can be repeated)
  #[arg(long = "runtime", action = clap::ArgAction::Append)]
  pub runtime: Vec<String>,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TypesCommand {
  /// Extra type descriptors (TOML) merged over the builtins
  #[arg(long)]
  pub types: Option<String>,
}

#[derive(Subcommand, Clone, PartialEq)]
pub enum SubCommand {
  /// Lower a module tree to LLVM IR
  Build(BuildCommand),
  /// Print the resolved type registry
  Types(TypesCommand),
}

#[derive(Parser)]
#[command(author, version, about = "The Runa LLVM backend", long_about = None)]
#[command(propagate_version = true)]
#[command(color = ColorChoice::Always)]
pub struct Cli {
  #[command(subcommand)]
  pub subcommand: SubCommand,

  /// Dump internal backend state
  #[arg(long, value_enum, action = clap::ArgAction::Append, global = true)]
  pub dump: Vec<DumpKindCli>,

  /// Enable internal debug mode
  #[arg(long, default_value = "false", global = true)]
  pub debug: bool,

  /// Enable debug tracing for subsystems
  #[arg(long, value_enum, action = clap::ArgAction::Append, global = true)]
  pub debug_trace: Vec<DebugTraceCli>,

  /// Don't print any output
  #[arg(long, short = 'q', default_value = "false", global = true)]
  pub quiet: bool,

  /// Use verbose output
  #[arg(long, short, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,
}
