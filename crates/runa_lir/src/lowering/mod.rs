mod builder;
mod call;
mod cleanup;
mod constants;
mod expr;
mod frame;
mod function;
mod preamble;
mod signature;
mod stmt;
mod value;

use std::collections::HashSet;

use runa_ast::Module;
use runa_config::{DEFAULT_ENTRY, DebugTrace, RunaConfig};
use runa_log::trace_dbg;
use runa_type::{TypeId, TypeStore};

use crate::{
  BlockId, CodegenError, FunctionLir, Instr, IrType, ModuleLir, Operand, Preamble, Terminator,
  display::print_lir,
  target::{host_platform, triple_for},
  verify::{VerifyResult, verify_lir},
};

pub use builder::FunctionBuilder;
pub use constants::ConstantPool;
pub use frame::{Frame, FrameId, FrameKind, FrameTree};
pub use signature::{ARGV_SYMBOL, Callee, LIBRARY, PROTOCOL, ResolvedCall, Signature, SignatureTable};
pub use value::{Binding, Storage, Value};

/// Name of the implicit output parameter of value-returning functions.
pub const RESULT_SLOT: &str = "lang.res";

/// Knobs that change the emitted module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
  /// Platform identifier selecting the target triple.
  pub platform: String,
  /// Function lowered as the process entry point.
  pub entry: String,
  /// Preamble text used in place of the derived declarations.
  pub include: Option<String>,
}

impl Default for CodegenOptions {
  fn default() -> Self {
    Self {
      platform: host_platform().to_string(),
      entry: DEFAULT_ENTRY.to_string(),
      include: None,
    }
  }
}

impl CodegenOptions {
  /// Options from the build configuration. The include file is read by the
  /// caller, so `include` is always `None` here.
  pub fn from_config(config: &RunaConfig) -> Self {
    let mut options = Self::default();

    if let Some(build) = &config.build_config {
      if let Some(platform) = &build.platform {
        options.platform = platform.clone();
      }
      options.entry.clone_from(&build.entry);
    }

    options
  }
}

/// Per-function lowering state. The type registry and signature table are
/// shared read-only; the constant pool is shared by every function of the
/// module.
pub(crate) struct LoweringContext<'a> {
  types: &'a TypeStore,
  signatures: &'a SignatureTable,
  constants: &'a mut ConstantPool,
  config: Option<&'a RunaConfig>,

  builder: FunctionBuilder,
  frames: FrameTree,
  /// Named slots created by assignment or loop variables.
  slots: HashSet<Operand>,

  return_type: TypeId,
  is_entry: bool,
}

impl<'a> LoweringContext<'a> {
  #[allow(clippy::too_many_arguments)]
  fn new(
    types: &'a TypeStore,
    signatures: &'a SignatureTable,
    constants: &'a mut ConstantPool,
    config: Option<&'a RunaConfig>,
    builder: FunctionBuilder,
    frames: FrameTree,
    return_type: TypeId,
    is_entry: bool,
  ) -> Self {
    Self {
      types,
      signatures,
      constants,
      config,
      builder,
      frames,
      slots: HashSet::new(),
      return_type,
      is_entry,
    }
  }

  fn finish(self) -> FunctionLir {
    self.builder.finish()
  }

  pub(crate) fn function_name(&self) -> &str {
    self.builder.name()
  }

  pub(crate) fn ir(
    &self,
    ty: TypeId,
  ) -> IrType {
    IrType::new(self.types.ir(ty))
  }

  pub(crate) fn type_name(
    &self,
    ty: TypeId,
  ) -> String {
    self.types.name(ty).to_string()
  }

  pub(crate) fn resolve_type(
    &self,
    name: &str,
  ) -> Result<TypeId, CodegenError> {
    signature::resolve(self.types, name)
  }

  pub(crate) fn temp(&mut self) -> Operand {
    Operand::Temp(self.frames.next_temp())
  }

  pub(crate) fn new_block(
    &mut self,
    hint: impl Into<String>,
  ) -> BlockId {
    let label = self.frames.next_label();
    self.builder.create_block(label, hint)
  }

  pub(crate) fn switch_to(
    &mut self,
    block: BlockId,
  ) {
    self.builder.switch_to_block(block);
  }

  pub(crate) fn current_block(&self) -> BlockId {
    self.builder.current_block()
  }

  pub(crate) fn emit(
    &mut self,
    instr: Instr,
  ) -> Result<(), CodegenError> {
    self.builder.emit(instr)
  }

  pub(crate) fn terminate(
    &mut self,
    term: Terminator,
  ) -> Result<(), CodegenError> {
    self.builder.terminate(term)
  }

  pub(crate) fn is_terminated(&self) -> bool {
    self.builder.is_terminated()
  }

  /// Jump to `target` unless the current block already left.
  pub(crate) fn branch_if_open(
    &mut self,
    target: BlockId,
  ) -> Result<(), CodegenError> {
    if self.is_terminated() {
      return Ok(());
    }
    self.terminate(Terminator::Br(target))
  }
}

/// Parameter type of `ty` under its calling convention.
pub(crate) fn param_ir(
  types: &TypeStore,
  ty: TypeId,
) -> IrType {
  let ir = IrType::new(types.ir(ty));
  if types.get(&ty).is_by_value() { ir } else { ir.ptr() }
}

/// Lower `module` into IR.
///
/// Signatures of every function are collected first, then each function is
/// lowered in source order. The target platform is checked before anything
/// is emitted.
pub fn generate(
  module: &Module,
  types: &TypeStore,
  options: &CodegenOptions,
  config: Option<&RunaConfig>,
) -> Result<ModuleLir, CodegenError> {
  let triple = triple_for(&options.platform)?;
  let signatures = SignatureTable::collect(module, types, &options.entry)?;
  let mut constants = ConstantPool::new();

  if let Some(config) = config {
    trace_dbg!(
      config,
      DebugTrace::Codegen,
      "target `{}`, {} callable signature(s)",
      triple,
      signatures.len()
    );
  }

  let mut functions = Vec::with_capacity(module.functions.len());
  let mut defined = HashSet::new();

  for func in &module.functions {
    let lowered = if func.name == options.entry {
      function::lower_entry(types, &signatures, &mut constants, config, func)?
    } else {
      function::lower_function(types, &signatures, &mut constants, config, func)?
    };

    if let Some(config) = config {
      trace_dbg!(
        config,
        DebugTrace::Codegen,
        "lowered `{}` as @{}: {} block(s), {} instruction(s)",
        func.name,
        lowered.name,
        lowered.layout.len(),
        lowered.instruction_count()
      );
    }

    defined.insert(lowered.name.clone());
    functions.push(lowered);
  }

  let preamble = match &options.include {
    Some(text) => Preamble::Include(text.clone()),
    None => preamble::derive(types, &signatures, &defined)?,
  };

  Ok(ModuleLir {
    triple: triple.to_string(),
    preamble,
    globals: constants.finish(),
    functions,
  })
}

/// Lower and run the structural verifier over the result.
pub fn lower_and_verify(
  module: &Module,
  types: &TypeStore,
  options: &CodegenOptions,
  config: Option<&RunaConfig>,
) -> Result<(ModuleLir, VerifyResult), CodegenError> {
  let lir = generate(module, types, options, config)?;
  let verify_result = verify_lir(&lir);

  if let Some(config) = config {
    trace_dbg!(
      config,
      DebugTrace::Verify,
      "{} function(s) checked, {} error(s)",
      lir.functions.len(),
      verify_result.as_ref().err().map_or(0, Vec::len)
    );
  }

  Ok((lir, verify_result))
}

/// Lower, verify and print. Verification failures are fatal.
pub fn emit_llvm(
  module: &Module,
  types: &TypeStore,
  options: &CodegenOptions,
  config: Option<&RunaConfig>,
) -> Result<String, CodegenError> {
  let (lir, verify_result) = lower_and_verify(module, types, options, config)?;
  verify_result.map_err(CodegenError::Verify)?;
  Ok(print_lir(&lir))
}
