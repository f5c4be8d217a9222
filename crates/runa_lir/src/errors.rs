use thiserror::Error;

use crate::VerifyError;

/// Fatal lowering failures. The backend only runs on validated input, so
/// each of these points at a defect upstream or in the type registry.
#[derive(Debug, Error)]
pub enum CodegenError {
  #[error("CG0001: unresolved name `{name}` in `{function}`")]
  UnresolvedName { name: String, function: String },

  #[error("CG0002: type `{ty}` has no method `{method}`")]
  MissingMethod { ty: String, method: String },

  #[error("CG0003: `{callee}` expects `{expected}`, found `{found}`")]
  OperandMismatch {
    callee: String,
    expected: String,
    found: String,
  },

  #[error("CG0004: conditional branches yield `{then_ty}` and `{else_ty}`")]
  BranchTypeMismatch { then_ty: String, else_ty: String },

  #[error("CG0005: type `{ty}` is not indexable")]
  NotIndexable { ty: String },

  #[error("CG0006: `void` value used as an operand in `{function}`")]
  VoidValue { function: String },

  #[error("CG0007: unknown callee `{name}`")]
  UnknownCallee { name: String },

  #[error("CG0008: call to `{name}` expects {expected} argument(s), found {found}")]
  ArityMismatch {
    name: String,
    expected: usize,
    found: usize,
  },

  #[error("CG0009: unknown type `{name}`")]
  UnknownType { name: String },

  #[error("CG0010: unsupported platform `{platform}`")]
  UnsupportedPlatform { platform: String },

  #[error("CG0011: `{function}` returns `{expected}`, found `{found}`")]
  ReturnMismatch {
    function: String,
    expected: String,
    found: String,
  },

  #[error("CG0012: block `{block}` in `{function}` is already terminated")]
  BlockAlreadyTerminated { function: String, block: String },

  #[error("CG0013: IR verification failed with {} error(s)", .0.len())]
  Verify(Vec<VerifyError>),
}

