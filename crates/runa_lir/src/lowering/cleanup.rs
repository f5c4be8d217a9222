use super::{
  LoweringContext,
  value::{Binding, Value},
};
use crate::{CodegenError, Instr, IrType, Operand, Terminator, TypedOperand};

pub(crate) const TEARDOWN: &str = "__del__";

impl<'a> LoweringContext<'a> {
  /// Tear down a value the current site owns.
  ///
  /// Only addressed values whose type declares `__del__` are released.
  /// Variables, parameters and pool constants belong to someone else. A
  /// value owned on some paths only is released behind a branch on its
  /// ownership flag.
  pub(crate) fn release(
    &mut self,
    value: &Value,
  ) -> Result<(), CodegenError> {
    let flag = match value.binding {
      Binding::Temporary => None,
      Binding::Conditional(flag) => Some(flag),
      Binding::Stable | Binding::Constant => return Ok(()),
    };

    let Some(address) = value.address() else {
      return Ok(());
    };

    let Some(entry) = self.types.method(value.ty, TEARDOWN) else {
      return Ok(());
    };

    let teardown = Instr::Call {
      dest: None,
      ret: IrType::void(),
      callee: entry.symbol.clone(),
      args: vec![TypedOperand::new(self.ir(value.ty).ptr(), address.clone())],
    };

    let Some(flag) = flag else {
      return self.emit(teardown);
    };

    let owned = self.new_block("release");
    let fin = self.new_block("release-fin");
    self.terminate(Terminator::CondBr {
      condition: Operand::Temp(flag),
      then_block: owned,
      else_block: fin,
    })?;

    self.switch_to(owned);
    self.emit(teardown)?;
    self.terminate(Terminator::Br(fin))?;

    self.switch_to(fin);
    Ok(())
  }
}
