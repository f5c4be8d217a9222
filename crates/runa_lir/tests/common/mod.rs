#![allow(dead_code)]

use runa_ast::{Function, Module, Param, Statement};
use runa_config::DEFAULT_ENTRY;
use runa_lir::{
  CodegenError, CodegenOptions, FunctionLir, Instr, ModuleLir, Operand, VerifyError, display::print_lir, generate,
  lower_and_verify,
};
use runa_type::TypeStore;

pub struct LirResult {
  pub module: ModuleLir,
  pub verify_errors: Vec<VerifyError>,
  pub types: TypeStore,
}

pub fn options() -> CodegenOptions {
  CodegenOptions {
    platform: "linux".to_string(),
    entry: DEFAULT_ENTRY.to_string(),
    include: None,
  }
}

/// Lower with the builtin registry and run the verifier.
pub fn lower(module: &Module) -> LirResult {
  let types = TypeStore::new();
  let (module, verify_result) = lower_and_verify(module, &types, &options(), None).expect("lowering failed");

  LirResult {
    module,
    verify_errors: verify_result.err().unwrap_or_default(),
    types,
  }
}

pub fn lower_err(module: &Module) -> CodegenError {
  generate(module, &TypeStore::new(), &options(), None).expect_err("expected lowering to fail")
}

pub fn assert_verifies(result: &LirResult) {
  assert!(result.verify_errors.is_empty(), "Verify errors: {:?}", result.verify_errors);
}

/// A module holding one function.
pub fn single(
  name: &str,
  params: Vec<Param>,
  returns: &str,
  body: Vec<Statement>,
) -> Module {
  Module::new(vec![Function::new(name, params, returns, body)])
}

/// A module holding only the entry function.
pub fn entry(body: Vec<Statement>) -> Module {
  single(DEFAULT_ENTRY, vec![], "void", body)
}

pub fn function<'a>(
  result: &'a LirResult,
  name: &str,
) -> &'a FunctionLir {
  result
    .module
    .function(name)
    .unwrap_or_else(|| panic!("no function `{}` in output", name))
}

pub fn format_function(
  result: &LirResult,
  name: &str,
) -> String {
  function(result, name).to_string()
}

pub fn format_module(result: &LirResult) -> String {
  print_lir(&result.module)
}

pub fn instructions(func: &FunctionLir) -> Vec<&Instr> {
  func.ordered_blocks().flat_map(|(_, b)| b.instructions.iter()).collect()
}

pub fn calls_to(
  func: &FunctionLir,
  symbol: &str,
) -> usize {
  instructions(func)
    .into_iter()
    .filter(|i| matches!(i, Instr::Call { callee, .. } if callee == symbol))
    .count()
}

pub fn loads_from(
  func: &FunctionLir,
  source: &Operand,
) -> usize {
  instructions(func)
    .into_iter()
    .filter(|i| matches!(i, Instr::Load { source: s, .. } if s == source))
    .count()
}

/// Role hints of the labeled blocks, in layout order.
pub fn hints(func: &FunctionLir) -> Vec<String> {
  func.ordered_blocks().filter_map(|(_, b)| b.hint.clone()).collect()
}
