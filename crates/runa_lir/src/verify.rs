use std::collections::HashSet;

use thiserror::Error;

use crate::{BlockId, FunctionLir, Instr, ModuleLir, Operand};

/// Structural problems found in lowered IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
  #[error("`{function}`: function has no blocks")]
  EmptyFunction { function: String },

  #[error("`{function}`: block `{block}` has no terminator")]
  MissingTerminator { function: String, block: String },

  #[error("`{function}`: block `{block}` was created but never placed")]
  UnplacedBlock { function: String, block: String },

  #[error("`{function}`: block `{block}` refers to a block outside the function layout")]
  UnknownTarget { function: String, block: String },

  #[error("`{function}`: block `{block}` branches to the entry block")]
  EntryTargeted { function: String, block: String },

  #[error("`{function}`: label `{label}` is defined twice")]
  DuplicateLabel { function: String, label: String },

  #[error("`{function}`: phi in block `{block}` follows a non-phi instruction")]
  MisplacedPhi { function: String, block: String },

  #[error("`{function}`: phi in block `{block}` names `{incoming}`, which does not branch there")]
  PhiUnknownPredecessor {
    function: String,
    block: String,
    incoming: String,
  },

  #[error("`{function}`: expected temporary %{expected}, found %{found}")]
  NonSequentialTemp { function: String, expected: u32, found: u32 },

  #[error("`{function}`: local `%{name}` is defined twice")]
  DuplicateLocal { function: String, name: String },
}

/// IR verification result.
pub type VerifyResult = Result<(), Vec<VerifyError>>;

/// Checks the block-structure invariants the printer relies on.
pub struct LirVerifier<'a> {
  module: &'a ModuleLir,
  errors: Vec<VerifyError>,
}

impl<'a> LirVerifier<'a> {
  pub fn new(module: &'a ModuleLir) -> Self {
    Self {
      module,
      errors: Vec::new(),
    }
  }

  pub fn verify(mut self) -> VerifyResult {
    let module = self.module;
    for func in &module.functions {
      self.verify_function(func);
    }

    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(self.errors)
    }
  }

  fn verify_function(
    &mut self,
    func: &FunctionLir,
  ) {
    let function = func.name.clone();

    let Some(&entry) = func.layout.first() else {
      self.errors.push(VerifyError::EmptyFunction { function });
      return;
    };

    let placed: HashSet<BlockId> = func.layout.iter().copied().collect();

    for (id, _) in func.blocks.iter() {
      if !placed.contains(&id) {
        self.errors.push(VerifyError::UnplacedBlock {
          function: function.clone(),
          block: block_name(func, id),
        });
      }
    }

    let mut labels = HashSet::new();
    let mut locals: HashSet<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
    let mut next_temp = 1;

    for (id, block) in func.ordered_blocks() {
      if let Some(label) = &block.label {
        if !labels.insert(label.as_str()) {
          self.errors.push(VerifyError::DuplicateLabel {
            function: function.clone(),
            label: label.clone(),
          });
        }
      }

      let mut seen_non_phi = false;
      for instr in &block.instructions {
        if instr.is_phi() {
          if seen_non_phi {
            self.errors.push(VerifyError::MisplacedPhi {
              function: function.clone(),
              block: block_name(func, id),
            });
          }
          if let Instr::Phi { incoming, .. } = instr {
            self.check_incoming(func, id, &placed, incoming);
          }
        } else {
          seen_non_phi = true;
        }

        match instr.dest() {
          Some(Operand::Temp(n)) => {
            if *n != next_temp {
              self.errors.push(VerifyError::NonSequentialTemp {
                function: function.clone(),
                expected: next_temp,
                found: *n,
              });
            }
            next_temp = n + 1;
          },
          Some(Operand::Local(name)) => {
            if !locals.insert(name.as_str()) {
              self.errors.push(VerifyError::DuplicateLocal {
                function: function.clone(),
                name: name.clone(),
              });
            }
          },
          _ => {},
        }
      }

      match &block.terminator {
        None => self.errors.push(VerifyError::MissingTerminator {
          function: function.clone(),
          block: block_name(func, id),
        }),
        Some(term) => {
          for target in term.successors() {
            self.check_target(func, id, entry, &placed, target);
          }
        },
      }
    }
  }

  fn check_target(
    &mut self,
    func: &FunctionLir,
    from: BlockId,
    entry: BlockId,
    placed: &HashSet<BlockId>,
    target: BlockId,
  ) {
    if target == entry {
      self.errors.push(VerifyError::EntryTargeted {
        function: func.name.clone(),
        block: block_name(func, from),
      });
    } else if !placed.contains(&target) {
      self.errors.push(VerifyError::UnknownTarget {
        function: func.name.clone(),
        block: block_name(func, from),
      });
    }
  }

  fn check_incoming(
    &mut self,
    func: &FunctionLir,
    block: BlockId,
    placed: &HashSet<BlockId>,
    incoming: &[(Operand, BlockId)],
  ) {
    for (_, pred) in incoming {
      if !placed.contains(pred) {
        self.errors.push(VerifyError::UnknownTarget {
          function: func.name.clone(),
          block: block_name(func, block),
        });
        continue;
      }

      let branches_here = func
        .block(*pred)
        .terminator
        .as_ref()
        .map(|t| t.successors().contains(&block))
        .unwrap_or(false);

      if !branches_here {
        self.errors.push(VerifyError::PhiUnknownPredecessor {
          function: func.name.clone(),
          block: block_name(func, block),
          incoming: block_name(func, *pred),
        });
      }
    }
  }
}

fn block_name(
  func: &FunctionLir,
  id: BlockId,
) -> String {
  func.block(id).label.clone().unwrap_or_else(|| "entry".to_string())
}

pub fn verify_lir(module: &ModuleLir) -> VerifyResult {
  LirVerifier::new(module).verify()
}
