mod common;

use runa_ast::{BinaryOperator, Expression, Function, GuardedBlock, Module, Param, Statement};
use runa_lir::{CodegenError, CodegenOptions, Instr, Operand, Preamble, Terminator, emit_llvm, generate};
use runa_type::TypeStore;

fn print(expr: Expression) -> Statement {
  Statement::expr(Expression::call("print", vec![expr]))
}

fn void_fn(body: Vec<Statement>) -> Module {
  common::single("f", vec![], "void", body)
}

#[test]
fn each_literal_site_gets_its_own_constant() {
  let result = common::lower(&void_fn(vec![
    Statement::assign("a", Expression::int(7)),
    Statement::assign("b", Expression::int(7)),
  ]));

  let ints: Vec<_> = result
    .module
    .globals
    .iter()
    .filter(|g| g.symbol.starts_with("int"))
    .map(|g| g.symbol.as_str())
    .collect();
  assert_eq!(ints, vec!["int0", "int1"]);
}

#[test]
fn stable_bindings_are_reloaded_on_every_read() {
  let result = common::lower(&void_fn(vec![
    Statement::assign("x", Expression::int(1)),
    Statement::assign(
      "y",
      Expression::binary(BinaryOperator::Add, Expression::name("x"), Expression::name("x")),
    ),
  ]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  assert_eq!(common::loads_from(func, &Operand::local("x")), 2);
}

#[test]
fn call_results_are_loaded_once() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::binary(BinaryOperator::Add, Expression::int(1), Expression::int(2)),
  )]));

  let func = common::function(&result, "f");
  assert_eq!(common::loads_from(func, &Operand::Temp(3)), 1);
  assert_eq!(common::calls_to(func, "int.__add__"), 1);
  assert_eq!(common::calls_to(func, "str.__del__"), 0);
}

#[test]
fn temporary_arguments_are_torn_down_after_the_call() {
  let result = common::lower(&common::entry(vec![
    print(Expression::call("str", vec![Expression::int(5)])),
    print(Expression::binary(
      BinaryOperator::Add,
      Expression::string("a"),
      Expression::string("b"),
    )),
  ]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "int.__str__"), 1);
  assert_eq!(common::calls_to(main, "str.__add__"), 1);
  assert_eq!(common::calls_to(main, "str.__del__"), 2);

  // Teardown follows the call that consumed the value.
  let calls: Vec<_> = common::instructions(main)
    .into_iter()
    .filter_map(|i| match i {
      Instr::Call { callee, .. } => Some(callee.as_str()),
      _ => None,
    })
    .collect();
  assert_eq!(
    calls,
    vec!["argv", "int.__str__", "print", "str.__del__", "str.__add__", "print", "str.__del__"]
  );
}

#[test]
fn variables_and_constants_are_never_torn_down() {
  let result = common::lower(&common::entry(vec![
    Statement::assign("s", Expression::string("kept")),
    print(Expression::name("s")),
    print(Expression::name("name")),
    print(Expression::string("literal")),
  ]));

  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "print"), 3);
  assert_eq!(common::calls_to(main, "str.__del__"), 0);
}

#[test]
fn protocol_call_goes_through_the_argument_type() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "b",
    Expression::call("bool", vec![Expression::float(0.5)]),
  )]));

  let func = common::function(&result, "f");
  assert_eq!(common::calls_to(func, "float.__bool__"), 1);
}

#[test]
fn user_functions_are_callable_before_their_definition() {
  let module = Module::new(vec![
    Function::new(
      "__main__",
      vec![],
      "void",
      vec![Statement::assign("x", Expression::call("twice", vec![Expression::int(3)]))],
    ),
    Function::new(
      "twice",
      vec![Param::new("n", "int")],
      "int",
      vec![Statement::ret(Some(Expression::binary(
        BinaryOperator::Mul,
        Expression::name("n"),
        Expression::int(2),
      )))],
    ),
  ]);

  let result = common::lower(&module);
  common::assert_verifies(&result);

  let main = common::function(&result, "main");
  let call = common::instructions(main)
    .into_iter()
    .find(|i| matches!(i, Instr::Call { callee, .. } if callee == "twice"))
    .unwrap();
  let Instr::Call { args, .. } = call else { unreachable!() };
  assert_eq!(args.len(), 2);
  assert_eq!(args[0].ty.as_str(), "i64");
  assert_eq!(args[1].ty.as_str(), "i64*");

  let names: Vec<_> = result.module.functions.iter().map(|f| f.name.as_str()).collect();
  assert_eq!(names, vec!["main", "twice"]);
}

#[test]
fn same_typed_and_merges_over_addresses() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::and(Expression::int(1), Expression::int(2)),
  )]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  assert_eq!(common::hints(func), vec!["and-true", "and-false", "and-fin"]);

  let phi = common::instructions(func).into_iter().find(|i| i.is_phi()).unwrap();
  assert!(matches!(phi, Instr::Phi { ty, .. } if ty.as_str() == "i64*"));

  // `x` keeps the operand type.
  let slot = common::instructions(func)
    .into_iter()
    .find(|i| matches!(i, Instr::Alloca { dest, .. } if *dest == Operand::local("x")))
    .unwrap();
  assert!(matches!(slot, Instr::Alloca { ty, .. } if ty.as_str() == "i64"));
}

#[test]
fn mixed_typed_or_merges_over_flags() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::or(Expression::int(0), Expression::string("fallback")),
  )]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  assert_eq!(common::hints(func), vec!["or-false", "or-true", "or-fin"]);
  assert_eq!(common::calls_to(func, "int.__bool__"), 1);
  assert_eq!(common::calls_to(func, "str.__bool__"), 1);

  let phi = common::instructions(func).into_iter().find(|i| i.is_phi()).unwrap();
  assert!(matches!(phi, Instr::Phi { ty, .. } if ty.as_str() == "i1"));
}

#[test]
fn or_evaluates_right_side_only_when_left_is_false() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::or(Expression::boolean(true), Expression::boolean(false)),
  )]));

  let func = common::function(&result, "f");
  let (_, entry) = func.ordered_blocks().next().unwrap();
  let Some(Terminator::CondBr {
    then_block, else_block, ..
  }) = &entry.terminator
  else {
    panic!("entry should end in a conditional branch");
  };

  assert_eq!(func.block(*then_block).hint.as_deref(), Some("or-true"));
  assert_eq!(func.block(*else_block).hint.as_deref(), Some("or-false"));
}

#[test]
fn not_coerces_then_selects() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::not(Expression::string("")),
  )]));

  let func = common::function(&result, "f");
  assert_eq!(common::calls_to(func, "str.__bool__"), 1);
  assert!(common::instructions(func)
    .into_iter()
    .any(|i| matches!(i, Instr::Select { .. })));
}

#[test]
fn ternary_merges_equal_types() {
  let result = common::lower(&void_fn(vec![Statement::assign(
    "x",
    Expression::ternary(Expression::boolean(true), Expression::float(1.0), Expression::float(2.0)),
  )]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  assert_eq!(common::hints(func), vec!["ternary-if", "ternary-else", "ternary-fin"]);
  let phi = common::instructions(func).into_iter().find(|i| i.is_phi()).unwrap();
  assert!(matches!(phi, Instr::Phi { ty, .. } if ty.as_str() == "double*"));
}

#[test]
fn ternary_with_different_types_is_rejected() {
  let err = common::lower_err(&void_fn(vec![Statement::assign(
    "x",
    Expression::ternary(Expression::boolean(true), Expression::int(1), Expression::string("one")),
  )]));

  assert!(matches!(
    err,
    CodegenError::BranchTypeMismatch { ref then_ty, ref else_ty } if then_ty == "int" && else_ty == "str"
  ));
}

#[test]
fn indexing_arguments_yields_element_storage() {
  let result = common::lower(&common::entry(vec![print(Expression::index(
    Expression::name("args"),
    Expression::int(0),
  ))]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");

  assert_eq!(common::loads_from(main, &Operand::local("args")), 1);
  let gep = common::instructions(main)
    .into_iter()
    .filter(|i| matches!(i, Instr::GetElementPtr { dest: Operand::Temp(_), .. }))
    .count();
  assert_eq!(gep, 1);
  // The element belongs to the array.
  assert_eq!(common::calls_to(main, "str.__del__"), 0);
}

#[test]
fn if_chain_lays_out_conditions_and_suites() {
  let result = common::lower(&common::single(
    "pick",
    vec![Param::new("n", "int")],
    "void",
    vec![Statement::if_chain(vec![
      GuardedBlock::when(
        Expression::binary(BinaryOperator::Lt, Expression::name("n"), Expression::int(0)),
        vec![print(Expression::string("neg"))],
      ),
      GuardedBlock::when(
        Expression::binary(BinaryOperator::Eq, Expression::name("n"), Expression::int(0)),
        vec![print(Expression::string("zero"))],
      ),
      GuardedBlock::otherwise(vec![print(Expression::string("pos"))]),
    ])],
  ));

  common::assert_verifies(&result);
  let func = common::function(&result, "pick");
  assert_eq!(
    common::hints(func),
    vec!["if-suite-0", "if-cond-1", "if-suite-1", "if-suite-2", "if-fin"]
  );
}

#[test]
fn if_without_else_falls_through_to_fin() {
  let result = common::lower(&void_fn(vec![Statement::if_chain(vec![GuardedBlock::when(
    Expression::boolean(true),
    vec![print(Expression::string("yes"))],
  )])]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  assert_eq!(common::hints(func), vec!["if-suite-0", "if-fin"]);
}

#[test]
fn returning_suites_skip_their_trailing_branch() {
  let result = common::lower(&common::single(
    "sign",
    vec![Param::new("n", "int")],
    "int",
    vec![Statement::if_chain(vec![
      GuardedBlock::when(
        Expression::binary(BinaryOperator::Lt, Expression::name("n"), Expression::int(0)),
        vec![Statement::ret(Some(Expression::int(-1))), print(Expression::string("dead"))],
      ),
      GuardedBlock::otherwise(vec![Statement::ret(Some(Expression::int(1)))]),
    ])],
  ));

  common::assert_verifies(&result);
  let func = common::function(&result, "sign");
  assert_eq!(common::calls_to(func, "print"), 0);

  let rets = func
    .ordered_blocks()
    .filter(|(_, b)| matches!(b.terminator, Some(Terminator::Ret(None))))
    .count();
  // Two explicit returns plus the implicit one closing `if-fin`.
  assert_eq!(rets, 3);
}

#[test]
fn for_loop_drives_the_iterator() {
  let result = common::lower(&common::entry(vec![Statement::for_loop(
    "i",
    Expression::call("range", vec![Expression::int(0), Expression::int(3), Expression::int(1)]),
    vec![print(Expression::call("str", vec![Expression::name("i")]))],
  )]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(common::hints(main), vec!["for-head", "for-body", "for-end"]);

  let next = common::instructions(main)
    .into_iter()
    .find(|i| matches!(i, Instr::Call { callee, .. } if callee == "intiter.__next__"))
    .unwrap();
  let Instr::Call { dest, ret, args, .. } = next else { unreachable!() };
  assert!(dest.is_some());
  assert_eq!(ret.as_str(), "i1");
  assert_eq!(args[0].ty.as_str(), "%intiter*");
  assert_eq!(args[1].to_string(), "i64* %i");
}

#[test]
fn rebinding_with_a_new_type_gets_a_new_slot() {
  let result = common::lower(&void_fn(vec![
    Statement::assign("x", Expression::int(1)),
    Statement::assign("x", Expression::int(2)),
    Statement::assign("x", Expression::string("two")),
  ]));

  common::assert_verifies(&result);
  let func = common::function(&result, "f");
  let slots: Vec<_> = common::instructions(func)
    .into_iter()
    .filter_map(|i| match i {
      Instr::Alloca {
        dest: Operand::Local(name),
        ty,
      } => Some((name.as_str(), ty.as_str())),
      _ => None,
    })
    .collect();
  assert_eq!(slots, vec![("x", "i64"), ("x.1", "%str")]);
}

#[test]
fn reassigning_a_parameter_does_not_write_through_it() {
  let result = common::lower(&common::single(
    "bump",
    vec![Param::new("n", "int")],
    "void",
    vec![Statement::assign(
      "n",
      Expression::binary(BinaryOperator::Add, Expression::name("n"), Expression::int(1)),
    )],
  ));

  common::assert_verifies(&result);
  let func = common::function(&result, "bump");
  assert!(common::instructions(func)
    .into_iter()
    .any(|i| matches!(i, Instr::Store { dest, .. } if *dest == Operand::local("n.1"))));
}

#[test]
fn entry_always_decodes_arguments() {
  let result = common::lower(&common::entry(vec![]));

  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "argv"), 1);
  assert_eq!(main.ret.as_str(), "i32");
  assert_eq!(main.attrs, vec!["nounwind", "ssp"]);
  assert!(matches!(
    main.ordered_blocks().last().unwrap().1.terminator,
    Some(Terminator::Ret(Some(_)))
  ));
}

#[test]
fn derived_preamble_declares_runtime_surface() {
  let result = common::lower(&common::entry(vec![]));
  let text = common::format_module(&result);

  assert!(text.contains("%str = type { i1, i64, i8* }\n"));
  assert!(text.contains("declare void @print(%str*)\n"));
  assert!(text.contains("declare void @range(i64, i64, i64, %intiter*)\n"));
  assert!(text.contains("declare void @argv(i32, i8**, %str**)\n"));
  assert!(text.contains("declare i1 @intiter.__next__(%intiter*, i64*)\n"));
}

#[test]
fn user_definitions_replace_library_declarations() {
  let module = Module::new(vec![Function::new(
    "print",
    vec![Param::new("s", "str")],
    "void",
    vec![],
  )]);

  let result = common::lower(&module);
  let text = common::format_module(&result);

  assert!(text.contains("define void @print(%str* %s) {\n"));
  assert!(!text.contains("declare void @print("));
}

#[test]
fn include_file_replaces_derived_preamble() {
  let types = TypeStore::new();
  let options = CodegenOptions {
    include: Some("; runtime\n%str = type { i1, i64, i8* }\n".to_string()),
    ..common::options()
  };

  let lir = generate(&common::entry(vec![]), &types, &options, None).unwrap();
  assert!(matches!(lir.preamble, Preamble::Include(_)));

  let text = emit_llvm(&common::entry(vec![]), &types, &options, None).unwrap();
  assert!(text.contains("; runtime\n%str = type { i1, i64, i8* }\n\n"));
  assert!(!text.contains("declare"));
}

#[test]
fn darwin_uses_apple_triple() {
  let options = CodegenOptions {
    platform: "darwin".to_string(),
    ..common::options()
  };
  let lir = generate(&common::entry(vec![]), &TypeStore::new(), &options, None).unwrap();
  assert_eq!(lir.triple, "x86_64-apple-darwin11.0.0");
}

#[test]
fn unknown_platform_fails_before_lowering() {
  let options = CodegenOptions {
    platform: "plan9".to_string(),
    ..common::options()
  };
  let module = void_fn(vec![print(Expression::name("missing"))]);

  let err = generate(&module, &TypeStore::new(), &options, None).unwrap_err();
  assert!(matches!(err, CodegenError::UnsupportedPlatform { ref platform } if platform == "plan9"));
}

#[test]
fn custom_entry_name() {
  let options = CodegenOptions {
    entry: "start".to_string(),
    ..common::options()
  };
  let module = common::single("start", vec![], "void", vec![]);

  let lir = generate(&module, &TypeStore::new(), &options, None).unwrap();
  assert!(lir.function("main").is_some());
  assert!(lir.function("start").is_none());
}

fn concat(
  left: &str,
  right: &str,
) -> Expression {
  Expression::binary(BinaryOperator::Add, Expression::string(left), Expression::string(right))
}

fn block_calls<'a>(
  func: &'a runa_lir::FunctionLir,
  hint: &str,
) -> Vec<&'a str> {
  func
    .ordered_blocks()
    .filter(|(_, b)| b.hint.as_deref() == Some(hint))
    .flat_map(|(_, b)| b.instructions.iter())
    .filter_map(|i| match i {
      Instr::Call { callee, .. } => Some(callee.as_str()),
      _ => None,
    })
    .collect()
}

#[test]
fn mixed_typed_and_tears_down_its_left_operand() {
  let result = common::lower(&common::entry(vec![Statement::assign(
    "x",
    Expression::and(concat("a", "b"), Expression::int(1)),
  )]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "str.__bool__"), 1);
  assert_eq!(common::calls_to(main, "str.__del__"), 1);
  // Only the flag is merged, so the string dies after the join.
  assert_eq!(block_calls(main, "and-fin"), vec!["str.__del__"]);
}

#[test]
fn same_typed_or_tears_down_the_left_it_skips_over() {
  let result = common::lower(&common::entry(vec![print(Expression::or(
    concat("a", "b"),
    concat("c", "d"),
  ))]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(common::hints(main), vec!["or-false", "or-true", "or-fin"]);
  assert_eq!(block_calls(main, "or-false"), vec!["str.__add__", "str.__del__"]);
  // Whichever side arrives is owned and released after `print`.
  assert_eq!(block_calls(main, "or-fin"), vec!["print", "str.__del__"]);
}

#[test]
fn partly_owned_merge_is_released_behind_its_flag() {
  let result = common::lower(&common::entry(vec![
    Statement::assign("s", Expression::string("kept")),
    print(Expression::or(concat("a", "b"), Expression::name("s"))),
  ]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(
    common::hints(main),
    vec!["or-false", "or-true", "or-fin", "release", "release-fin"]
  );
  assert_eq!(block_calls(main, "or-false"), vec!["str.__del__"]);
  assert_eq!(block_calls(main, "release"), vec!["str.__del__"]);

  let flags: Vec<_> = common::instructions(main)
    .into_iter()
    .filter(|i| matches!(i, Instr::Phi { ty, .. } if ty.as_str() == "i1"))
    .collect();
  assert_eq!(flags.len(), 1);
  let Instr::Phi { incoming, .. } = flags[0] else {
    unreachable!()
  };
  let owned: Vec<_> = incoming.iter().map(|(flag, _)| flag.to_string()).collect();
  assert_eq!(owned, vec!["true", "false"]);
}

#[test]
fn ternary_with_one_temporary_branch_releases_conditionally() {
  let result = common::lower(&common::entry(vec![
    Statement::assign("s", Expression::string("kept")),
    print(Expression::ternary(
      Expression::boolean(true),
      concat("a", "b"),
      Expression::name("s"),
    )),
  ]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "str.__del__"), 1);
  assert_eq!(block_calls(main, "release"), vec!["str.__del__"]);
}

#[test]
fn uniform_ownership_merges_need_no_flag() {
  let result = common::lower(&common::entry(vec![
    Statement::assign("s", Expression::string("kept")),
    Statement::assign("t", Expression::string("other")),
    print(Expression::and(Expression::name("s"), Expression::name("t"))),
    print(Expression::ternary(
      Expression::boolean(false),
      concat("a", "b"),
      concat("c", "d"),
    )),
  ]));

  common::assert_verifies(&result);
  let main = common::function(&result, "main");
  assert!(!common::hints(main).contains(&"release".to_string()));
  // Variables merged with variables stay untouched; two temporaries merge
  // into one owned value released after `print`.
  assert_eq!(common::calls_to(main, "str.__del__"), 1);
}

#[test]
fn lowers_a_module_tree_read_from_json() {
  let module: Module = serde_json::from_value(serde_json::json!({
    "functions": [{
      "name": "__main__",
      "body": [{
        "kind": "for",
        "var": "i",
        "source": { "kind": "call", "callee": "range", "args": [
          { "kind": "int", "value": 0 },
          { "kind": "int", "value": 3 },
          { "kind": "int", "value": 1 }
        ]},
        "body": [{ "kind": "expr", "expr": {
          "kind": "call", "callee": "print",
          "args": [{ "kind": "call", "callee": "str", "args": [{ "kind": "name", "name": "i" }] }]
        }}]
      }]
    }]
  }))
  .unwrap();

  let result = common::lower(&module);
  common::assert_verifies(&result);

  let main = common::function(&result, "main");
  assert_eq!(common::calls_to(main, "intiter.__next__"), 1);
  assert_eq!(common::calls_to(main, "print"), 1);
  assert_eq!(common::hints(main), vec!["for-head", "for-body", "for-end"]);
}

mod errors {
  use super::*;

  #[test]
  fn unresolved_name() {
    let err = common::lower_err(&void_fn(vec![print(Expression::name("ghost"))]));
    assert!(matches!(err, CodegenError::UnresolvedName { ref name, ref function } if name == "ghost" && function == "f"));
  }

  #[test]
  fn missing_operator_method() {
    let err = common::lower_err(&void_fn(vec![Statement::assign(
      "x",
      Expression::binary(BinaryOperator::Sub, Expression::string("a"), Expression::string("b")),
    )]));
    assert!(matches!(err, CodegenError::MissingMethod { ref ty, ref method } if ty == "str" && method == "__sub__"));
  }

  #[test]
  fn operand_mismatch() {
    let err = common::lower_err(&void_fn(vec![Statement::assign(
      "x",
      Expression::binary(BinaryOperator::Add, Expression::int(1), Expression::float(1.0)),
    )]));
    assert!(matches!(
      err,
      CodegenError::OperandMismatch { ref callee, ref expected, ref found }
        if callee == "int.__add__" && expected == "int" && found == "float"
    ));
  }

  #[test]
  fn unknown_callee() {
    let err = common::lower_err(&void_fn(vec![Statement::expr(Expression::call("launch", vec![]))]));
    assert!(matches!(err, CodegenError::UnknownCallee { ref name } if name == "launch"));
  }

  #[test]
  fn arity_mismatch() {
    let err = common::lower_err(&void_fn(vec![Statement::expr(Expression::call(
      "range",
      vec![Expression::int(3)],
    ))]));
    assert!(matches!(err, CodegenError::ArityMismatch { expected: 3, found: 1, .. }));
  }

  #[test]
  fn not_indexable() {
    let err = common::lower_err(&void_fn(vec![Statement::assign(
      "x",
      Expression::index(Expression::int(1), Expression::int(0)),
    )]));
    assert!(matches!(err, CodegenError::NotIndexable { ref ty } if ty == "int"));
  }

  #[test]
  fn void_result_used_as_value() {
    let err = common::lower_err(&void_fn(vec![Statement::assign(
      "x",
      Expression::call("print", vec![Expression::string("a")]),
    )]));
    assert!(matches!(err, CodegenError::VoidValue { .. }));
  }

  #[test]
  fn unknown_parameter_type() {
    let err = common::lower_err(&common::single("f", vec![Param::new("p", "point")], "void", vec![]));
    assert!(matches!(err, CodegenError::UnknownType { ref name } if name == "point"));
  }

  #[test]
  fn return_type_mismatch() {
    let err = common::lower_err(&common::single(
      "f",
      vec![],
      "int",
      vec![Statement::ret(Some(Expression::string("nope")))],
    ));
    assert!(matches!(
      err,
      CodegenError::ReturnMismatch { ref expected, ref found, .. } if expected == "int" && found == "str"
    ));
  }

  #[test]
  fn bare_return_from_value_function() {
    let err = common::lower_err(&common::single("f", vec![], "int", vec![Statement::ret(None)]));
    assert!(matches!(err, CodegenError::ReturnMismatch { ref found, .. } if found == "void"));
  }

  #[test]
  fn error_codes_are_stable() {
    let err = CodegenError::UnknownCallee {
      name: "launch".to_string(),
    };
    assert_eq!(err.to_string(), "CG0007: unknown callee `launch`");
  }
}
