use runa_ast::{Expression, GuardedBlock, Statement};
use runa_config::DebugTrace;
use runa_log::trace_dbg;
use runa_type::TypeId;

use super::{LoweringContext, RESULT_SLOT, value::Value};
use crate::{CodegenError, ConstValue, Instr, IrType, Operand, Terminator, TypedOperand};

pub(crate) const ITERATOR_NEXT: &str = "__next__";

impl<'a> LoweringContext<'a> {
  /// Lower statements in order. Anything after a `return` is unreachable
  /// and skipped.
  pub(crate) fn lower_suite(
    &mut self,
    body: &[Statement],
  ) -> Result<(), CodegenError> {
    for stmt in body {
      if self.is_terminated() {
        break;
      }
      self.lower_stmt(stmt)?;
    }
    Ok(())
  }

  fn lower_stmt(
    &mut self,
    stmt: &Statement,
  ) -> Result<(), CodegenError> {
    match stmt {
      Statement::Assign { target, value } => self.lower_assign(target, value),
      Statement::If { branches } => self.lower_if(branches),
      Statement::While { condition, body } => self.lower_while(condition, body),
      Statement::For { var, source, body } => self.lower_for(var, source, body),
      Statement::Return { value } => self.lower_return(value.as_ref()),
      Statement::Expr { expr } => self.lower_effect(expr),
    }
  }

  /// Storage for variable `name` of type `ty`. A slot bound to the same name
  /// in the current frame is reused when the type matches; otherwise a new
  /// uniquely named slot is placed at the top of the function.
  fn variable_slot(
    &mut self,
    name: &str,
    ty: TypeId,
  ) -> Result<Operand, CodegenError> {
    if let Some(address) = self
      .frames
      .lookup_local(name)
      .filter(|existing| existing.ty == ty)
      .and_then(|existing| existing.address())
      .filter(|address| self.slots.contains(*address))
    {
      return Ok(address.clone());
    }

    let ir = self.value_ir(ty)?;
    let slot = Operand::Local(self.frames.unique_name(name));
    self.builder.hoist(Instr::Alloca {
      dest: slot.clone(),
      ty: ir,
    });
    self.slots.insert(slot.clone());

    if let Some(config) = self.config {
      trace_dbg!(
        config,
        DebugTrace::Codegen,
        "`{}`: slot {} for `{}: {}`",
        self.function_name(),
        slot,
        name,
        self.types.name(ty)
      );
    }

    Ok(slot)
  }

  fn lower_assign(
    &mut self,
    target: &str,
    value: &Expression,
  ) -> Result<(), CodegenError> {
    let mut value = self.lower_expr(value)?;
    let operand = self.obtain_value(&mut value)?;
    let slot = self.variable_slot(target, value.ty)?;

    self.emit(Instr::Store {
      value: operand,
      dest: slot.clone(),
    })?;
    self.frames.define(target, Value::stable(value.ty, slot));

    Ok(())
  }

  fn lower_if(
    &mut self,
    branches: &[GuardedBlock],
  ) -> Result<(), CodegenError> {
    let fin = self.new_block("if-fin");

    for (i, branch) in branches.iter().enumerate() {
      let Some(condition) = &branch.condition else {
        // Trailing `else`: the current block is already its suite.
        self.lower_suite(&branch.body)?;
        self.branch_if_open(fin)?;
        self.switch_to(fin);
        return Ok(());
      };

      let flag = self.lower_condition(condition)?;
      let suite = self.new_block(format!("if-suite-{}", i));
      let next = match branches.get(i + 1) {
        None => fin,
        Some(GuardedBlock { condition: Some(_), .. }) => self.new_block(format!("if-cond-{}", i + 1)),
        Some(GuardedBlock { condition: None, .. }) => self.new_block(format!("if-suite-{}", i + 1)),
      };

      self.terminate(Terminator::CondBr {
        condition: flag,
        then_block: suite,
        else_block: next,
      })?;

      self.switch_to(suite);
      self.lower_suite(&branch.body)?;
      self.branch_if_open(fin)?;

      self.switch_to(next);
    }

    if branches.is_empty() {
      self.terminate(Terminator::Br(fin))?;
      self.switch_to(fin);
    }

    Ok(())
  }

  fn lower_while(
    &mut self,
    condition: &Expression,
    body: &[Statement],
  ) -> Result<(), CodegenError> {
    let head = self.new_block("while-head");
    let body_block = self.new_block("while-body");
    let end = self.new_block("while-end");

    self.terminate(Terminator::Br(head))?;

    self.switch_to(head);
    let flag = self.lower_condition(condition)?;
    self.terminate(Terminator::CondBr {
      condition: flag,
      then_block: body_block,
      else_block: end,
    })?;

    self.switch_to(body_block);
    self.lower_suite(body)?;
    self.branch_if_open(head)?;

    self.switch_to(end);
    Ok(())
  }

  /// `for var in source`: the source's `__next__` writes the next element
  /// into the loop variable and returns `false` once exhausted.
  fn lower_for(
    &mut self,
    var: &str,
    source: &Expression,
    body: &[Statement],
  ) -> Result<(), CodegenError> {
    let types = self.types;
    let mut source = self.lower_expr(source)?;

    let next = types
      .method(source.ty, ITERATOR_NEXT)
      .ok_or_else(|| CodegenError::MissingMethod {
        ty: self.type_name(source.ty),
        method: ITERATOR_NEXT.to_string(),
      })?;
    let element = self.resolve_type(&next.returns)?;

    let iterator = self.obtain_address(&mut source)?;
    let slot = self.variable_slot(var, element)?;
    let element_ptr = self.value_ir(element)?.ptr();
    self.frames.define(var, Value::stable(element, slot.clone()));

    let head = self.new_block("for-head");
    let body_block = self.new_block("for-body");
    let end = self.new_block("for-end");

    self.terminate(Terminator::Br(head))?;

    self.switch_to(head);
    let more = self.temp();
    self.emit(Instr::Call {
      dest: Some(more.clone()),
      ret: IrType::i1(),
      callee: next.symbol.clone(),
      args: vec![iterator, TypedOperand::new(element_ptr, slot)],
    })?;
    self.terminate(Terminator::CondBr {
      condition: more,
      then_block: body_block,
      else_block: end,
    })?;

    self.switch_to(body_block);
    self.lower_suite(body)?;
    self.branch_if_open(head)?;

    self.switch_to(end);
    self.release(&source)
  }

  fn lower_return(
    &mut self,
    value: Option<&Expression>,
  ) -> Result<(), CodegenError> {
    if self.is_entry {
      if let Some(expr) = value {
        self.lower_effect(expr)?;
      }
      let status = TypedOperand::new(IrType::i32(), Operand::Const(ConstValue::Int(0)));
      return self.terminate(Terminator::Ret(Some(status)));
    }

    let expected = self.return_type;

    match value {
      None if self.types.is_void(expected) => {},
      None => {
        return Err(CodegenError::ReturnMismatch {
          function: self.function_name().to_string(),
          expected: self.type_name(expected),
          found: self.type_name(self.types.void()),
        });
      },
      Some(expr) if self.types.is_void(expected) => self.lower_effect(expr)?,
      Some(expr) => {
        let mut value = self.lower_expr(expr)?;
        if value.ty != expected {
          return Err(CodegenError::ReturnMismatch {
            function: self.function_name().to_string(),
            expected: self.type_name(expected),
            found: self.type_name(value.ty),
          });
        }

        let operand = self.obtain_value(&mut value)?;
        self.emit(Instr::Store {
          value: operand,
          dest: Operand::local(RESULT_SLOT),
        })?;
      },
    }

    self.terminate(Terminator::Ret(None))
  }
}
