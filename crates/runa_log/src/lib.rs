//! Logging utilities for the Runa backend.
//!
//! Provides macros for:
//! - Phase logging (`phase_log!`, `phase_ok!`, `phase_warn!`)
//! - Debug traces by category (`trace_dbg!`)
//! - Verbose logging (`log_dbg!`, `log_trc!`)
//!
//! All output goes to stderr so it never mixes with IR written to stdout.

use runa_config::{DebugTrace, RunaConfig};

pub fn effective_verbose(config: &RunaConfig) -> u8 {
  if config.quiet {
    return 0;
  }

  if config.debug && config.verbose < 2 {
    return 2;
  }

  config.verbose
}

pub fn log_phase(config: &RunaConfig) -> bool {
  !config.quiet
}

pub fn log_info(config: &RunaConfig) -> bool {
  effective_verbose(config) >= 1
}

pub fn log_debug(config: &RunaConfig) -> bool {
  effective_verbose(config) >= 2
}

pub fn log_trace(config: &RunaConfig) -> bool {
  effective_verbose(config) >= 3
}

pub fn debug_trace_enabled(
  config: &RunaConfig,
  trace: DebugTrace,
) -> bool {
  !config.quiet && (config.debug || config.debug_trace.contains(&trace))
}

pub fn trace_name(trace: DebugTrace) -> &'static str {
  match trace {
    DebugTrace::Types => "types",
    DebugTrace::Codegen => "codegen",
    DebugTrace::Verify => "verify",
    DebugTrace::Link => "link",
    DebugTrace::Driver => "driver",
  }
}

/// Log a phase message with an arrow prefix.
///
/// ```ignore
/// phase_log!(&config, "Lowering... {}", file_path);
/// phase_log!(&config, indent = 8, "function {}", name);
/// ```
#[macro_export]
macro_rules! phase_log {
  ($config:expr, indent = $indent:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_phase($config) {
      use colored::Colorize;
      eprintln!(
        "{:indent$}{} {}",
        "",
        "-->".bright_green().bold(),
        format!($fmt $(, $arg)*),
        indent = $indent
      );
    }
  }};

  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    $crate::phase_log!($config, indent = 4, $fmt $(, $arg)*);
  }};
}

/// Log a successful phase completion (green arrow, no indent).
#[macro_export]
macro_rules! phase_ok {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_phase($config) {
      use colored::Colorize;
      eprintln!("{} {}", "-->".bright_green().bold(), format!($fmt $(, $arg)*));
    }
  }};
}

/// Log a warning during a phase (yellow arrow, no indent).
#[macro_export]
macro_rules! phase_warn {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_phase($config) {
      use colored::Colorize;
      eprintln!("{} {}", "-->".bright_yellow().bold(), format!($fmt $(, $arg)*));
    }
  }};
}

/// Log a debug trace for one backend component.
///
/// ```ignore
/// trace_dbg!(&config, DebugTrace::Codegen, "lowered {} blocks", count);
/// // Output: debug[codegen]: lowered 4 blocks
/// ```
#[macro_export]
macro_rules! trace_dbg {
  ($config:expr, $trace:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::debug_trace_enabled($config, $trace) {
      eprintln!(
        "debug[{}]: {}",
        $crate::trace_name($trace),
        format!($fmt $(, $arg)*)
      );
    }
  }};
}

/// Log a verbose debug message (verbosity >= 2).
#[macro_export]
macro_rules! log_dbg {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_debug($config) {
      eprintln!("debug: {}", format!($fmt $(, $arg)*));
    }
  }};
}

/// Log a trace message (verbosity >= 3).
#[macro_export]
macro_rules! log_trc {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_trace($config) {
      eprintln!("trace: {}", format!($fmt $(, $arg)*));
    }
  }};
}
