use super::{LoweringContext, signature::Callee, value::Value};
use crate::{CodegenError, Instr, IrType, TypedOperand};

impl<'a> LoweringContext<'a> {
  /// Emit a call to `callee`.
  ///
  /// Arguments go by value or by address according to their type's
  /// convention. A non-void result is written through a fresh stack slot
  /// appended as the last argument, so the emitted call is always
  /// `call void`. Temporary arguments are torn down afterwards.
  pub(crate) fn dispatch(
    &mut self,
    callee: &Callee,
    mut args: Vec<Value>,
  ) -> Result<Option<Value>, CodegenError> {
    let call = callee.bind(&args, self.types, self.signatures)?;

    let mut operands = Vec::with_capacity(args.len() + 1);
    for arg in args.iter_mut() {
      let operand = if self.types.get(&arg.ty).is_by_value() {
        self.obtain_value(arg)?
      } else {
        self.obtain_address(arg)?
      };
      operands.push(operand);
    }

    let result = if self.types.is_void(call.returns) {
      None
    } else {
      let ty = self.ir(call.returns);
      let slot = self.temp();
      self.emit(Instr::Alloca {
        dest: slot.clone(),
        ty: ty.clone(),
      })?;
      operands.push(TypedOperand::new(ty.ptr(), slot.clone()));
      Some(Value::temporary(call.returns, slot))
    };

    self.emit(Instr::Call {
      dest: None,
      ret: IrType::void(),
      callee: call.symbol,
      args: operands,
    })?;

    for arg in &args {
      self.release(arg)?;
    }

    Ok(result)
  }

  /// Like [`dispatch`](Self::dispatch), for calls whose result is used.
  pub(crate) fn dispatch_value(
    &mut self,
    callee: &Callee,
    args: Vec<Value>,
  ) -> Result<Value, CodegenError> {
    self.dispatch(callee, args)?.ok_or_else(|| CodegenError::VoidValue {
      function: self.function_name().to_string(),
    })
  }
}
