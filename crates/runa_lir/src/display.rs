use std::fmt::{self, Write};

use crate::{
  Block, BlockId, FunctionLir, GlobalInit, Instr, ModuleLir, Preamble, Terminator, TypedOperand, program::Global,
};

/// Renders a [`ModuleLir`] as LLVM IR text.
pub struct LirPrinter<'a> {
  module: &'a ModuleLir,
}

impl<'a> LirPrinter<'a> {
  pub fn new(module: &'a ModuleLir) -> Self {
    Self { module }
  }

  pub fn print(self) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = self.write_to(&mut output);
    output
  }

  pub fn write_to<W: Write>(
    &self,
    out: &mut W,
  ) -> fmt::Result {
    writeln!(out, "target triple = \"{}\"", self.module.triple)?;
    writeln!(out)?;

    write_preamble(out, &self.module.preamble)?;

    if !self.module.globals.is_empty() {
      for global in &self.module.globals {
        write_global(out, global)?;
      }
      writeln!(out)?;
    }

    for func in &self.module.functions {
      write_function(out, func)?;
      writeln!(out)?;
    }

    Ok(())
  }
}

impl fmt::Display for ModuleLir {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    LirPrinter::new(self).write_to(f)
  }
}

impl fmt::Display for FunctionLir {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write_function(f, self)
  }
}

pub fn print_lir(module: &ModuleLir) -> String {
  LirPrinter::new(module).print()
}

fn write_preamble<W: Write>(
  out: &mut W,
  preamble: &Preamble,
) -> fmt::Result {
  match preamble {
    Preamble::Include(text) => {
      writeln!(out, "{}", text.trim_end())?;
      writeln!(out)
    },
    Preamble::Derived {
      type_defs,
      declarations,
    } => {
      if !type_defs.is_empty() {
        for def in type_defs {
          writeln!(out, "{} = type {}", def.name, def.body)?;
        }
        writeln!(out)?;
      }

      if !declarations.is_empty() {
        for decl in declarations {
          let params: Vec<_> = decl.params.iter().map(|p| p.to_string()).collect();
          writeln!(out, "declare {} @{}({})", decl.ret, decl.symbol, params.join(", "))?;
        }
        writeln!(out)?;
      }

      Ok(())
    },
  }
}

fn write_global<W: Write>(
  out: &mut W,
  global: &Global,
) -> fmt::Result {
  write!(out, "@{} = constant {} ", global.symbol, global.ty)?;

  match &global.init {
    GlobalInit::Bool(b) => writeln!(out, "{}", *b as u8),
    GlobalInit::Int(i) => writeln!(out, "{}", i),
    // Hex keeps every double exact.
    GlobalInit::Float(f) => writeln!(out, "0x{:016X}", f.into_inner().to_bits()),
    GlobalInit::Bytes(bytes) => writeln!(out, "c\"{}\"", escape_bytes(bytes)),
    GlobalInit::Str { len, data } => writeln!(
      out,
      "{{ i1 0, i64 {len}, i8* getelementptr inbounds ([{len} x i8], [{len} x i8]* @{data}, i32 0, i32 0) }}",
      len = len,
      data = data
    ),
  }
}

fn escape_bytes(bytes: &[u8]) -> String {
  let mut escaped = String::with_capacity(bytes.len());
  for &b in bytes {
    if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
      escaped.push(b as char);
    } else {
      escaped.push_str(&format!("\\{:02X}", b));
    }
  }
  escaped
}

fn write_function<W: Write>(
  out: &mut W,
  func: &FunctionLir,
) -> fmt::Result {
  let params: Vec<_> = func.params.iter().map(|p| format!("{} %{}", p.ty, p.name)).collect();
  let attrs: String = func.attrs.iter().map(|a| format!(" {}", a)).collect();

  writeln!(out, "define {} @{}({}){} {{", func.ret, func.name, params.join(", "), attrs)?;

  for (i, (_, block)) in func.ordered_blocks().enumerate() {
    if i > 0 {
      writeln!(out)?;
    }
    write_block(out, func, block)?;
  }

  writeln!(out, "}}")
}

fn write_block<W: Write>(
  out: &mut W,
  func: &FunctionLir,
  block: &Block,
) -> fmt::Result {
  if let Some(label) = &block.label {
    match &block.hint {
      Some(hint) => writeln!(out, "{}: ; {}", label, hint)?,
      None => writeln!(out, "{}:", label)?,
    }
  }

  for instr in &block.instructions {
    write!(out, "\t")?;
    write_instr(out, func, instr)?;
  }

  if let Some(term) = &block.terminator {
    write!(out, "\t")?;
    write_terminator(out, func, term)?;
  }

  Ok(())
}

fn label_ref(
  func: &FunctionLir,
  id: BlockId,
) -> String {
  // The unnamed entry block takes the implicit `%0`.
  match &func.block(id).label {
    Some(label) => format!("%{}", label),
    None => "%0".to_string(),
  }
}

fn join_args(args: &[TypedOperand]) -> String {
  args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
}

fn write_instr<W: Write>(
  out: &mut W,
  func: &FunctionLir,
  instr: &Instr,
) -> fmt::Result {
  match instr {
    Instr::Alloca { dest, ty } => writeln!(out, "{} = alloca {}", dest, ty),
    Instr::Load { dest, ty, source } => writeln!(out, "{} = load {}, {}* {}", dest, ty, ty, source),
    Instr::Store { value, dest } => writeln!(out, "store {}, {}* {}", value, value.ty, dest),
    Instr::Call {
      dest,
      ret,
      callee,
      args,
    } => {
      if let Some(dest) = dest {
        write!(out, "{} = ", dest)?;
      }
      writeln!(out, "call {} @{}({})", ret, callee, join_args(args))
    },
    Instr::GetElementPtr {
      dest,
      ty,
      base,
      indices,
    } => writeln!(
      out,
      "{} = getelementptr inbounds {}, {}* {}, {}",
      dest,
      ty,
      ty,
      base,
      join_args(indices)
    ),
    Instr::Select {
      dest,
      condition,
      if_true,
      if_false,
    } => writeln!(out, "{} = select i1 {}, {}, {}", dest, condition, if_true, if_false),
    Instr::Phi { dest, ty, incoming } => {
      let arms: Vec<_> = incoming
        .iter()
        .map(|(value, block)| format!("[ {}, {} ]", value, label_ref(func, *block)))
        .collect();
      writeln!(out, "{} = phi {} {}", dest, ty, arms.join(", "))
    },
  }
}

fn write_terminator<W: Write>(
  out: &mut W,
  func: &FunctionLir,
  term: &Terminator,
) -> fmt::Result {
  match term {
    Terminator::Br(target) => writeln!(out, "br label {}", label_ref(func, *target)),
    Terminator::CondBr {
      condition,
      then_block,
      else_block,
    } => writeln!(
      out,
      "br i1 {}, label {}, label {}",
      condition,
      label_ref(func, *then_block),
      label_ref(func, *else_block)
    ),
    Terminator::Ret(Some(value)) => writeln!(out, "ret {}", value),
    Terminator::Ret(None) => writeln!(out, "ret void"),
  }
}
