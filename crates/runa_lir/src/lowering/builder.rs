use runa_type::Store;

use crate::{Block, BlockId, CodegenError, FunctionLir, Instr, IrType, Param, Terminator};

/// Builder for constructing a single function's IR.
pub struct FunctionBuilder {
  name: String,
  ret: IrType,
  params: Vec<Param>,
  attrs: Vec<String>,

  blocks: Store<Block>,
  /// Blocks in the order they were started.
  layout: Vec<BlockId>,

  /// Currently active block being built.
  current_block: BlockId,
  /// Allocas hoisted to the top of the entry block so far.
  hoisted: usize,
}

impl FunctionBuilder {
  pub fn new(
    name: &str,
    ret: IrType,
    params: Vec<Param>,
    attrs: Vec<String>,
  ) -> Self {
    let mut blocks = Store::new();
    let entry = blocks.alloc(Block::entry());

    Self {
      name: name.to_string(),
      ret,
      params,
      attrs,
      blocks,
      layout: vec![entry],
      current_block: entry,
      hoisted: 0,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn return_type(&self) -> &IrType {
    &self.ret
  }

  /// Create a labeled block. It is placed in the layout once started.
  pub fn create_block(
    &mut self,
    label: String,
    hint: impl Into<String>,
  ) -> BlockId {
    self.blocks.alloc(Block::new(label, hint))
  }

  /// Continue emission in `block`, placing it after every block started so far.
  pub fn switch_to_block(
    &mut self,
    block: BlockId,
  ) {
    if !self.layout.contains(&block) {
      self.layout.push(block);
    }
    self.current_block = block;
  }

  pub fn current_block(&self) -> BlockId {
    self.current_block
  }

  /// Emit an instruction to the current block.
  pub fn emit(
    &mut self,
    instr: Instr,
  ) -> Result<(), CodegenError> {
    self.ensure_open()?;
    self.blocks.get_mut(self.current_block).instructions.push(instr);
    Ok(())
  }

  /// Set the terminator for the current block.
  pub fn terminate(
    &mut self,
    term: Terminator,
  ) -> Result<(), CodegenError> {
    self.ensure_open()?;
    self.blocks.get_mut(self.current_block).terminator = Some(term);
    Ok(())
  }

  /// Place a named stack slot at the top of the entry block, ahead of any
  /// code, so it dominates every use. Allowed after the entry block closed.
  pub fn hoist(
    &mut self,
    instr: Instr,
  ) {
    let entry = self.layout[0];
    self.blocks.get_mut(entry).instructions.insert(self.hoisted, instr);
    self.hoisted += 1;
  }

  pub fn is_terminated(&self) -> bool {
    self.blocks.get(&self.current_block).terminator.is_some()
  }

  fn ensure_open(&self) -> Result<(), CodegenError> {
    if self.is_terminated() {
      let block = self.blocks.get(&self.current_block);
      return Err(CodegenError::BlockAlreadyTerminated {
        function: self.name.clone(),
        block: block.label.clone().unwrap_or_else(|| "entry".to_string()),
      });
    }
    Ok(())
  }

  /// Finish building and return the completed function.
  pub fn finish(self) -> FunctionLir {
    FunctionLir {
      name: self.name,
      ret: self.ret,
      params: self.params,
      attrs: self.attrs,
      blocks: self.blocks,
      layout: self.layout,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blocks_are_laid_out_in_start_order() {
    let mut builder = FunctionBuilder::new("f", IrType::void(), vec![], vec![]);
    let late = builder.create_block("L1".to_string(), "if-fin");
    let early = builder.create_block("L2".to_string(), "if-suite-0");

    builder.terminate(Terminator::Br(early)).unwrap();
    builder.switch_to_block(early);
    builder.terminate(Terminator::Br(late)).unwrap();
    builder.switch_to_block(late);
    builder.terminate(Terminator::Ret(None)).unwrap();

    let func = builder.finish();
    let labels: Vec<_> = func.ordered_blocks().map(|(_, b)| b.label.clone()).collect();
    assert_eq!(labels, vec![None, Some("L2".to_string()), Some("L1".to_string())]);
  }

  #[test]
  fn hoisted_slots_lead_the_entry_block() {
    let mut builder = FunctionBuilder::new("f", IrType::void(), vec![], vec![]);
    builder
      .emit(Instr::Alloca {
        dest: crate::Operand::Temp(1),
        ty: IrType::i64(),
      })
      .unwrap();
    builder.terminate(Terminator::Ret(None)).unwrap();
    builder.hoist(Instr::Alloca {
      dest: crate::Operand::local("x"),
      ty: IrType::i64(),
    });
    builder.hoist(Instr::Alloca {
      dest: crate::Operand::local("y"),
      ty: IrType::i1(),
    });

    let func = builder.finish();
    let dests: Vec<_> = func.ordered_blocks().next().unwrap().1.instructions.iter().map(|i| i.dest().cloned()).collect();
    assert_eq!(
      dests,
      vec![
        Some(crate::Operand::local("x")),
        Some(crate::Operand::local("y")),
        Some(crate::Operand::Temp(1)),
      ]
    );
  }

  #[test]
  fn second_terminator_is_rejected() {
    let mut builder = FunctionBuilder::new("f", IrType::void(), vec![], vec![]);
    builder.terminate(Terminator::Ret(None)).unwrap();

    assert!(builder.is_terminated());
    let err = builder.terminate(Terminator::Ret(None)).unwrap_err();
    assert!(matches!(err, CodegenError::BlockAlreadyTerminated { ref block, .. } if block == "entry"));
    assert!(builder
      .emit(Instr::Alloca {
        dest: crate::Operand::Temp(1),
        ty: IrType::i64(),
      })
      .is_err());
  }
}
