use runa_ast::Function;
use runa_config::RunaConfig;
use runa_type::TypeStore;

use super::{
  LoweringContext, RESULT_SLOT, param_ir,
  builder::FunctionBuilder,
  constants::ConstantPool,
  frame::{FrameKind, FrameTree},
  signature::{ARGV_SYMBOL, SignatureTable, resolve},
  value::{Binding, Storage, Value},
};
use crate::{CodegenError, ConstValue, FunctionLir, Instr, IrType, Operand, Param, Terminator, TypedOperand};

/// Symbol of the process entry point.
pub const ENTRY_SYMBOL: &str = "main";
pub const ENTRY_ATTRS: &[&str] = &["nounwind", "ssp"];

/// Type of the `args` binding in the entry function.
pub const ARGS_TYPE: &str = "array[str]";

/// `define void @name(<params>[, <ret>* %lang.res])`
pub(crate) fn lower_function(
  types: &TypeStore,
  signatures: &SignatureTable,
  constants: &mut ConstantPool,
  config: Option<&RunaConfig>,
  func: &Function,
) -> Result<FunctionLir, CodegenError> {
  let returns = resolve(types, &func.returns)?;
  let mut frames = FrameTree::new();
  let mut params = Vec::with_capacity(func.params.len() + 1);

  for param in &func.params {
    let ty = resolve(types, &param.ty)?;
    if types.is_void(ty) {
      return Err(CodegenError::VoidValue {
        function: func.name.clone(),
      });
    }

    let operand = Operand::local(&param.name);
    let storage = if types.get(&ty).is_by_value() {
      Storage::Direct(operand)
    } else {
      Storage::Addressed(operand)
    };

    frames.reserve(&param.name);
    frames.define(
      &param.name,
      Value {
        ty,
        storage,
        binding: Binding::Stable,
      },
    );
    params.push(Param::new(param_ir(types, ty), &param.name));
  }

  if !types.is_void(returns) {
    frames.reserve(RESULT_SLOT);
    params.push(Param::new(IrType::new(types.ir(returns)).ptr(), RESULT_SLOT));
  }

  frames.push(FrameKind::Body);

  let builder = FunctionBuilder::new(&func.name, IrType::void(), params, vec![]);
  let mut ctx = LoweringContext::new(types, signatures, constants, config, builder, frames, returns, false);

  ctx.lower_suite(&func.body)?;
  if !ctx.is_terminated() {
    ctx.terminate(Terminator::Ret(None))?;
  }

  Ok(ctx.finish())
}

/// `define i32 @main(i32 %argc, i8** %argv)`, with `name` and `args`
/// bound from the decoded process arguments.
pub(crate) fn lower_entry(
  types: &TypeStore,
  signatures: &SignatureTable,
  constants: &mut ConstantPool,
  config: Option<&RunaConfig>,
  func: &Function,
) -> Result<FunctionLir, CodegenError> {
  let string = types.string();
  let array = resolve(types, ARGS_TYPE)?;

  let mut frames = FrameTree::new();
  for reserved in ["argc", "argv", "args$", "a0.p", "a1.p", "name", "args"] {
    frames.reserve(reserved);
  }

  let params = vec![
    Param::new(IrType::i32(), "argc"),
    Param::new(IrType::new("i8*").ptr(), "argv"),
  ];
  let attrs = ENTRY_ATTRS.iter().map(|a| a.to_string()).collect();
  let builder = FunctionBuilder::new(ENTRY_SYMBOL, IrType::i32(), params, attrs);
  let mut ctx = LoweringContext::new(types, signatures, constants, config, builder, frames, types.void(), true);

  let str_ir = ctx.ir(string);
  let array_ir = ctx.ir(array);
  let decoded = Operand::local("args$");
  let first = Operand::local("a0.p");
  let rest = Operand::local("a1.p");

  ctx.emit(Instr::Alloca {
    dest: decoded.clone(),
    ty: array_ir.clone(),
  })?;
  ctx.emit(Instr::Call {
    dest: None,
    ret: IrType::void(),
    callee: ARGV_SYMBOL.to_string(),
    args: vec![
      TypedOperand::new(IrType::i32(), Operand::local("argc")),
      TypedOperand::new(IrType::new("i8*").ptr(), Operand::local("argv")),
      TypedOperand::new(array_ir.ptr(), decoded.clone()),
    ],
  })?;
  ctx.emit(Instr::Load {
    dest: first.clone(),
    ty: array_ir.clone(),
    source: decoded,
  })?;
  ctx.emit(Instr::GetElementPtr {
    dest: Operand::local("name"),
    ty: str_ir.clone(),
    base: first.clone(),
    indices: vec![TypedOperand::new(IrType::i64(), Operand::Const(ConstValue::Int(0)))],
  })?;
  ctx.emit(Instr::GetElementPtr {
    dest: rest.clone(),
    ty: str_ir,
    base: first,
    indices: vec![TypedOperand::new(IrType::i64(), Operand::Const(ConstValue::Int(1)))],
  })?;
  ctx.emit(Instr::Alloca {
    dest: Operand::local("args"),
    ty: array_ir.clone(),
  })?;
  ctx.emit(Instr::Store {
    value: TypedOperand::new(array_ir, rest),
    dest: Operand::local("args"),
  })?;

  ctx.frames.define("name", Value::stable(string, Operand::local("name")));
  ctx.frames.define("args", Value::stable(array, Operand::local("args")));
  ctx.frames.push(FrameKind::Body);

  ctx.lower_suite(&func.body)?;
  if !ctx.is_terminated() {
    let status = TypedOperand::new(IrType::i32(), Operand::Const(ConstValue::Int(0)));
    ctx.terminate(Terminator::Ret(Some(status)))?;
  }

  Ok(ctx.finish())
}
