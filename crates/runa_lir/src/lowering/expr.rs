use runa_ast::{BinaryOperator, Expression};

use super::{
  LoweringContext,
  signature::Callee,
  value::{Storage, Value},
};
use crate::{CodegenError, ConstValue, Instr, IrType, Operand, Terminator, TypedOperand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShortCircuit {
  And,
  Or,
}

impl ShortCircuit {
  /// Role hints for the evaluate-right, skip and join blocks.
  fn hints(self) -> (&'static str, &'static str, &'static str) {
    match self {
      ShortCircuit::And => ("and-true", "and-false", "and-fin"),
      ShortCircuit::Or => ("or-false", "or-true", "or-fin"),
    }
  }
}

impl<'a> LoweringContext<'a> {
  /// Lower an expression whose value is used.
  pub(crate) fn lower_expr(
    &mut self,
    expr: &Expression,
  ) -> Result<Value, CodegenError> {
    self.lower_operand(expr)?.ok_or_else(|| CodegenError::VoidValue {
      function: self.function_name().to_string(),
    })
  }

  /// Lower an expression for its side effects only. Void calls are fine here.
  pub(crate) fn lower_effect(
    &mut self,
    expr: &Expression,
  ) -> Result<(), CodegenError> {
    self.lower_operand(expr).map(|_| ())
  }

  /// Lower `expr` and reduce it to an `i1` operand.
  pub(crate) fn lower_condition(
    &mut self,
    expr: &Expression,
  ) -> Result<Operand, CodegenError> {
    let value = self.lower_expr(expr)?;
    let mut flag = self.coerce_to_boolean(value)?;
    Ok(self.obtain_value(&mut flag)?.operand)
  }

  /// `None` only for calls to void functions.
  fn lower_operand(
    &mut self,
    expr: &Expression,
  ) -> Result<Option<Value>, CodegenError> {
    let value = match expr {
      Expression::Bool { value } => self.constants.boolean(self.types, *value),
      Expression::Int { value } => self.constants.int(self.types, *value),
      Expression::Float { value } => self.constants.float(self.types, *value),
      Expression::String { value } => self.constants.string(self.types, value),
      Expression::Name { name } => self.lower_name(name)?,
      Expression::Binary { op, left, right } => self.lower_binary(*op, left, right)?,
      Expression::Not { operand } => {
        let value = self.lower_expr(operand)?;
        let flag = self.coerce_to_boolean(value)?;
        self.negate(flag)?
      },
      Expression::And { left, right } => self.lower_short_circuit(ShortCircuit::And, left, right)?,
      Expression::Or { left, right } => self.lower_short_circuit(ShortCircuit::Or, left, right)?,
      Expression::Ternary {
        condition,
        then,
        otherwise,
      } => self.lower_ternary(condition, then, otherwise)?,
      Expression::Index { container, index } => self.lower_index(container, index)?,
      Expression::Call { callee, args } => return self.lower_call(callee, args),
    };

    Ok(Some(value))
  }

  fn lower_name(
    &mut self,
    name: &str,
  ) -> Result<Value, CodegenError> {
    self
      .frames
      .lookup(name)
      .cloned()
      .ok_or_else(|| CodegenError::UnresolvedName {
        name: name.to_string(),
        function: self.function_name().to_string(),
      })
  }

  fn lower_binary(
    &mut self,
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
  ) -> Result<Value, CodegenError> {
    let left = self.lower_expr(left)?;
    let right = self.lower_expr(right)?;
    let method = op.method();

    let entry = self
      .types
      .method(left.ty, method)
      .ok_or_else(|| CodegenError::MissingMethod {
        ty: self.type_name(left.ty),
        method: method.to_string(),
      })?;

    if let Some(argument) = &entry.argument {
      let expected = self.resolve_type(argument)?;
      if expected != right.ty {
        return Err(CodegenError::OperandMismatch {
          callee: entry.symbol.clone(),
          expected: self.type_name(expected),
          found: self.type_name(right.ty),
        });
      }
    }

    let result = self.dispatch_value(&Callee::method(left.ty, method), vec![left, right])?;

    if op == BinaryOperator::NotEq {
      self.negate(result)
    } else {
      Ok(result)
    }
  }

  /// Invert an `i1` with `select`.
  fn negate(
    &mut self,
    mut flag: Value,
  ) -> Result<Value, CodegenError> {
    let condition = self.obtain_value(&mut flag)?.operand;
    let dest = self.temp();

    self.emit(Instr::Select {
      dest: dest.clone(),
      condition,
      if_true: TypedOperand::new(IrType::i1(), Operand::Const(ConstValue::Bool(false))),
      if_false: TypedOperand::new(IrType::i1(), Operand::Const(ConstValue::Bool(true))),
    })?;

    Ok(Value::direct(self.types.boolean(), dest))
  }

  /// `and`/`or`. Operands of one type merge over their addresses and the
  /// result keeps that type; operands of different types are both coerced
  /// to `bool` and the merge is over the two flags.
  ///
  /// The left operand is torn down once it can no longer be the result: in
  /// the evaluate-right block when the types match, after the merge when
  /// only its flag is.
  fn lower_short_circuit(
    &mut self,
    kind: ShortCircuit,
    left: &Expression,
    right: &Expression,
  ) -> Result<Value, CodegenError> {
    let mut left = self.lower_expr(left)?;
    let mut left_flag = self.coerce_to_boolean(left.borrowed())?;
    let left_bool = self.obtain_value(&mut left_flag)?.operand;

    let (rhs_hint, skip_hint, join_hint) = kind.hints();
    let rhs = self.new_block(rhs_hint);
    let skip = self.new_block(skip_hint);
    let join = self.new_block(join_hint);

    let (then_block, else_block) = match kind {
      ShortCircuit::And => (rhs, skip),
      ShortCircuit::Or => (skip, rhs),
    };
    self.terminate(Terminator::CondBr {
      condition: left_bool.clone(),
      then_block,
      else_block,
    })?;

    self.switch_to(rhs);
    let mut right = self.lower_expr(right)?;
    let same_type = right.ty == left.ty;
    let right_binding = right.binding;
    let right_incoming = if same_type {
      self.obtain_address(&mut right)?.operand
    } else {
      let mut flag = self.coerce_to_boolean(right)?;
      self.obtain_value(&mut flag)?.operand
    };
    if same_type {
      self.release(&left)?;
    }
    let right_end = self.current_block();
    self.terminate(Terminator::Br(join))?;

    self.switch_to(skip);
    let left_incoming = if same_type {
      self.obtain_address(&mut left)?.operand
    } else {
      left_bool
    };
    self.terminate(Terminator::Br(join))?;

    self.switch_to(join);
    let dest = self.temp();

    if same_type {
      let ty = self.value_ir(left.ty)?.ptr();
      self.emit(Instr::Phi {
        dest: dest.clone(),
        ty,
        incoming: vec![(left_incoming, skip), (right_incoming, right_end)],
      })?;

      let binding = self.merge_binding(left.ty, [(left.binding, skip), (right_binding, right_end)])?;
      Ok(Value {
        ty: left.ty,
        storage: Storage::Addressed(dest),
        binding,
      })
    } else {
      self.emit(Instr::Phi {
        dest: dest.clone(),
        ty: IrType::i1(),
        incoming: vec![(left_incoming, skip), (right_incoming, right_end)],
      })?;
      self.release(&left)?;

      Ok(Value::direct(self.types.boolean(), dest))
    }
  }

  fn lower_ternary(
    &mut self,
    condition: &Expression,
    then: &Expression,
    otherwise: &Expression,
  ) -> Result<Value, CodegenError> {
    let flag = self.lower_condition(condition)?;

    let then_block = self.new_block("ternary-if");
    let else_block = self.new_block("ternary-else");
    let fin = self.new_block("ternary-fin");

    self.terminate(Terminator::CondBr {
      condition: flag,
      then_block,
      else_block,
    })?;

    self.switch_to(then_block);
    let mut then_value = self.lower_expr(then)?;
    let then_address = self.obtain_address(&mut then_value)?;
    let then_end = self.current_block();
    self.terminate(Terminator::Br(fin))?;

    self.switch_to(else_block);
    let mut else_value = self.lower_expr(otherwise)?;
    if else_value.ty != then_value.ty {
      return Err(CodegenError::BranchTypeMismatch {
        then_ty: self.type_name(then_value.ty),
        else_ty: self.type_name(else_value.ty),
      });
    }
    let else_address = self.obtain_address(&mut else_value)?;
    let else_end = self.current_block();
    self.terminate(Terminator::Br(fin))?;

    self.switch_to(fin);
    let dest = self.temp();
    self.emit(Instr::Phi {
      dest: dest.clone(),
      ty: then_address.ty,
      incoming: vec![(then_address.operand, then_end), (else_address.operand, else_end)],
    })?;

    let binding = self.merge_binding(
      then_value.ty,
      [(then_value.binding, then_end), (else_value.binding, else_end)],
    )?;
    Ok(Value {
      ty: then_value.ty,
      storage: Storage::Addressed(dest),
      binding,
    })
  }

  /// `container[index]`: an address inside the container's storage.
  fn lower_index(
    &mut self,
    container: &Expression,
    index: &Expression,
  ) -> Result<Value, CodegenError> {
    let mut container = self.lower_expr(container)?;
    let element = self
      .types
      .element(container.ty)
      .ok_or_else(|| CodegenError::NotIndexable {
        ty: self.type_name(container.ty),
      })?;

    let mut index = self.lower_expr(index)?;
    if index.ty != self.types.int() {
      return Err(CodegenError::OperandMismatch {
        callee: format!("{}[]", self.type_name(container.ty)),
        expected: self.type_name(self.types.int()),
        found: self.type_name(index.ty),
      });
    }

    let element_ir = self.value_ir(element)?;
    let base = self.obtain_value(&mut container)?.operand;
    let offset = self.obtain_value(&mut index)?;
    let dest = self.temp();

    self.emit(Instr::GetElementPtr {
      dest: dest.clone(),
      ty: element_ir,
      base,
      indices: vec![offset],
    })?;
    self.release(&index)?;

    Ok(Value::stable(element, dest))
  }

  fn lower_call(
    &mut self,
    callee: &str,
    args: &[Expression],
  ) -> Result<Option<Value>, CodegenError> {
    let callee = Callee::resolve(callee, self.signatures)?;
    let args = args
      .iter()
      .map(|arg| self.lower_expr(arg))
      .collect::<Result<Vec<_>, _>>()?;

    self.dispatch(&callee, args)
  }
}
