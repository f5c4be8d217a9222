pub mod block;
pub mod display;
pub mod errors;
pub mod instr;
pub mod lowering;
pub mod operand;
pub mod program;
pub mod target;
pub mod verify;

use runa_type::Id;

pub use block::{Block, Terminator};
pub use errors::CodegenError;
pub use instr::Instr;
pub use lowering::{CodegenOptions, emit_llvm, generate, lower_and_verify};
pub use operand::{ConstValue, IrType, Operand, TypedOperand};
pub use program::{Declaration, FunctionLir, Global, GlobalInit, ModuleLir, Param, Preamble, TypeDef};
pub use verify::{VerifyError, verify_lir};

/// Unique identifier for a basic block within a function.
pub type BlockId = Id<Block>;
