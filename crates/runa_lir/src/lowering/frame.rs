use std::collections::{HashMap, HashSet};

use runa_type::{Id, Store};

use super::value::Value;

pub type FrameId = Id<Frame>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
  /// Parameters, or the process-entry bindings.
  Function,
  /// A function body.
  Body,
}

#[derive(Debug, Clone)]
pub struct Frame {
  pub parent: Option<FrameId>,
  pub kind: FrameKind,
  pub names: HashMap<String, Value>,
}

/// Lexical frames of one function. Temporaries, labels and storage names
/// are numbered per tree, so nothing collides inside the function and no
/// state leaks into the next one.
#[derive(Debug, Clone)]
pub struct FrameTree {
  frames: Store<Frame>,
  current: FrameId,
  next_temp: u32,
  next_label: u32,
  used_names: HashSet<String>,
}

impl Default for FrameTree {
  fn default() -> Self {
    Self::new()
  }
}

impl FrameTree {
  pub fn new() -> Self {
    let mut frames = Store::new();
    let root = frames.alloc(Frame {
      parent: None,
      kind: FrameKind::Function,
      names: HashMap::new(),
    });

    Self {
      frames,
      current: root,
      next_temp: 1,
      next_label: 1,
      used_names: HashSet::new(),
    }
  }

  pub fn current(&self) -> FrameId {
    self.current
  }

  pub fn push(
    &mut self,
    kind: FrameKind,
  ) -> FrameId {
    let frame = self.frames.alloc(Frame {
      parent: Some(self.current),
      kind,
      names: HashMap::new(),
    });
    self.current = frame;
    frame
  }

  pub fn pop(&mut self) {
    if let Some(parent) = self.frames.get(&self.current).parent {
      self.current = parent;
    }
  }

  /// Bind `name` in the current frame, shadowing any outer binding.
  pub fn define(
    &mut self,
    name: &str,
    value: Value,
  ) {
    self.frames.get_mut(self.current).names.insert(name.to_string(), value);
  }

  /// Walk the parent chain from the current frame.
  pub fn lookup(
    &self,
    name: &str,
  ) -> Option<&Value> {
    let mut current = self.current;
    loop {
      let frame = self.frames.get(&current);
      if let Some(value) = frame.names.get(name) {
        return Some(value);
      }
      match frame.parent {
        Some(parent) => current = parent,
        None => return None,
      }
    }
  }

  /// Binding of `name` in the current frame only.
  pub fn lookup_local(
    &self,
    name: &str,
  ) -> Option<&Value> {
    self.frames.get(&self.current).names.get(name)
  }

  /// Fresh numbered temporary.
  pub fn next_temp(&mut self) -> u32 {
    let n = self.next_temp;
    self.next_temp += 1;
    n
  }

  /// Fresh block label (`L1`, `L2`, ...).
  pub fn next_label(&mut self) -> String {
    let label = format!("L{}", self.next_label);
    self.next_label += 1;
    label
  }

  /// Claim a storage name, suffixing `.1`, `.2`, ... if `base` is taken.
  pub fn unique_name(
    &mut self,
    base: &str,
  ) -> String {
    let mut candidate = base.to_string();
    let mut n = 1;
    while self.used_names.contains(&candidate) {
      candidate = format!("{}.{}", base, n);
      n += 1;
    }
    self.used_names.insert(candidate.clone());
    candidate
  }

  /// Mark a fixed name (parameter, entry binding) as taken.
  pub fn reserve(
    &mut self,
    name: &str,
  ) {
    self.used_names.insert(name.to_string());
  }
}
