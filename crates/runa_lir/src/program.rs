use ordered_float::OrderedFloat;
use runa_type::Store;

use crate::{Block, BlockId, IrType};

/// A lowered module, ready to be printed as LLVM IR text.
#[derive(Debug, Clone)]
pub struct ModuleLir {
  pub triple: String,
  pub preamble: Preamble,
  /// Constant pool contents, in allocation order.
  pub globals: Vec<Global>,
  /// Functions in source order.
  pub functions: Vec<FunctionLir>,
}

impl ModuleLir {
  pub fn function(
    &self,
    name: &str,
  ) -> Option<&FunctionLir> {
    self.functions.iter().find(|f| f.name == name)
  }
}

/// Everything between the target line and the constants.
#[derive(Debug, Clone)]
pub enum Preamble {
  /// Type definitions and external declarations derived from the registry.
  Derived {
    type_defs: Vec<TypeDef>,
    declarations: Vec<Declaration>,
  },
  /// A user-supplied file inserted verbatim.
  Include(String),
}

/// `%str = type { i1, i64, i8* }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
  pub name: String,
  pub body: String,
}

/// `declare void @print(%str*)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
  pub symbol: String,
  pub ret: IrType,
  pub params: Vec<IrType>,
}

/// `@int0 = constant i64 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
  pub symbol: String,
  pub ty: IrType,
  pub init: GlobalInit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlobalInit {
  Bool(bool),
  Int(i64),
  Float(OrderedFloat<f64>),
  /// Raw character data, `[N x i8] c"..."`.
  Bytes(Vec<u8>),
  /// A `%str` header pointing at the `data` global of `len` bytes.
  Str { len: usize, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  pub ty: IrType,
  pub name: String,
}

impl Param {
  pub fn new(
    ty: IrType,
    name: &str,
  ) -> Self {
    Self {
      ty,
      name: name.to_string(),
    }
  }
}

/// A single function in IR form.
#[derive(Debug, Clone)]
pub struct FunctionLir {
  pub name: String,
  pub ret: IrType,
  pub params: Vec<Param>,
  /// Function attributes (`nounwind`, `ssp`).
  pub attrs: Vec<String>,
  pub blocks: Store<Block>,
  /// Blocks in the order they were started; the first is the entry block.
  pub layout: Vec<BlockId>,
}

impl FunctionLir {
  pub fn block(
    &self,
    id: BlockId,
  ) -> &Block {
    self.blocks.get(&id)
  }

  /// Blocks in layout order.
  pub fn ordered_blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
    self.layout.iter().map(move |id| (*id, self.blocks.get(id)))
  }

  pub fn instruction_count(&self) -> usize {
    self.ordered_blocks().map(|(_, b)| b.instructions.len()).sum()
  }
}
