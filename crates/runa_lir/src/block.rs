use crate::{BlockId, Instr, Operand, TypedOperand};

/// A basic block: a sequence of instructions ending with a terminator.
#[derive(Debug, Clone)]
pub struct Block {
  /// `None` only for a function's entry block.
  pub label: Option<String>,
  /// Role comment printed after the label (`while-head`).
  pub hint: Option<String>,
  pub instructions: Vec<Instr>,
  /// Unset while the block is still being built.
  pub terminator: Option<Terminator>,
}

impl Block {
  pub fn entry() -> Self {
    Self {
      label: None,
      hint: None,
      instructions: Vec::new(),
      terminator: None,
    }
  }

  pub fn new(
    label: String,
    hint: impl Into<String>,
  ) -> Self {
    Self {
      label: Some(label),
      hint: Some(hint.into()),
      instructions: Vec::new(),
      terminator: None,
    }
  }
}

/// Block terminator: how control exits a basic block.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
  /// Unconditional jump.
  Br(BlockId),

  /// `br i1 condition, label then_block, label else_block`
  CondBr {
    condition: Operand,
    then_block: BlockId,
    else_block: BlockId,
  },

  Ret(Option<TypedOperand>),
}

impl Terminator {
  pub fn successors(&self) -> Vec<BlockId> {
    match self {
      Terminator::Br(target) => vec![*target],
      Terminator::CondBr {
        then_block, else_block, ..
      } => vec![*then_block, *else_block],
      Terminator::Ret(_) => vec![],
    }
  }
}
