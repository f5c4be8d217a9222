use crate::{BlockId, IrType, Operand, TypedOperand};

/// A single IR instruction. `dest` is always a `Temp` or a named `Local`.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
  /// Stack storage for one `ty`.
  /// `dest = alloca ty`
  Alloca { dest: Operand, ty: IrType },

  /// `dest = load ty, ty* source`
  Load {
    dest: Operand,
    ty: IrType,
    source: Operand,
  },

  /// `store value, value.ty* dest`
  Store { value: TypedOperand, dest: Operand },

  /// `[dest =] call ret @callee(args...)`
  Call {
    dest: Option<Operand>,
    ret: IrType,
    callee: String,
    args: Vec<TypedOperand>,
  },

  /// `dest = getelementptr inbounds ty, ty* base, indices...`
  GetElementPtr {
    dest: Operand,
    ty: IrType,
    base: Operand,
    indices: Vec<TypedOperand>,
  },

  /// `dest = select i1 condition, if_true, if_false`
  Select {
    dest: Operand,
    condition: Operand,
    if_true: TypedOperand,
    if_false: TypedOperand,
  },

  /// Merge of values flowing in from predecessor blocks. Must lead its block.
  Phi {
    dest: Operand,
    ty: IrType,
    incoming: Vec<(Operand, BlockId)>,
  },
}

impl Instr {
  pub fn dest(&self) -> Option<&Operand> {
    match self {
      Instr::Alloca { dest, .. }
      | Instr::Load { dest, .. }
      | Instr::GetElementPtr { dest, .. }
      | Instr::Select { dest, .. }
      | Instr::Phi { dest, .. } => Some(dest),
      Instr::Call { dest, .. } => dest.as_ref(),
      Instr::Store { .. } => None,
    }
  }

  pub fn is_phi(&self) -> bool {
    matches!(self, Instr::Phi { .. })
  }
}
