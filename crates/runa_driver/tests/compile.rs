mod common;

use common::{Project, hello, quiet, read};
use runa_ast::{Expression, Function, Module, Param, Statement};
use runa_config::DEFAULT_ENTRY;
use runa_driver::{DriverError, compile_file, load_types};
use runa_lir::CodegenError;

#[test]
fn emits_ll_into_output_dir() {
  let project = Project::new();
  let file = project.write_module("hello.json", &hello());

  let output = compile_file(&quiet(project.build_config(&file))).unwrap();

  assert_eq!(output.ll_path, project.path("build").join("hello.ll"));
  assert!(output.bin_path.is_none());

  let ir = read(&output.ll_path);
  assert!(ir.starts_with("target triple = \"x86_64-pc-linux-gnu\""));
  assert!(ir.contains("define i32 @main(i32 %argc, i8** %argv) nounwind ssp {"));
  assert!(ir.contains("call void @int.__add__("));
  assert!(ir.contains("call void @str.__del__("));
  assert!(ir.contains("declare void @print(%str*)"));
}

#[test]
fn explicit_ll_path_and_platform() {
  let project = Project::new();
  let file = project.write_module("hello.json", &hello());

  let mut build = project.build_config(&file);
  build.platform = Some("darwin".to_string());
  build.emit_ll = Some(project.path("nested/out/program.ll").to_string_lossy().into_owned());

  let output = compile_file(&quiet(build)).unwrap();

  assert_eq!(output.ll_path, project.path("nested/out/program.ll"));
  assert!(read(&output.ll_path).starts_with("target triple = \"x86_64-apple-darwin11.0.0\""));
}

#[test]
fn include_file_replaces_derived_preamble() {
  let project = Project::new();
  let file = project.write_module("hello.json", &hello());
  let include = project.write("include.ll", "; runtime declarations\n");

  let mut build = project.build_config(&file);
  build.include_file = Some(include);

  let ir = read(&compile_file(&quiet(build)).unwrap().ll_path);

  assert!(ir.contains("; runtime declarations"));
  assert!(!ir.contains("declare void @print"));
}

#[test]
fn types_file_extends_registry() {
  let project = Project::new();
  let types = project.write(
    "types.toml",
    r#"
[[types]]
name = "point"
ir = "%point"
convention = "by-address"
layout = "{ i64, i64 }"

[types.methods.__str__]
symbol = "point.__str__"
returns = "str"
"#,
  );

  let module = Module::new(vec![Function::new(
    "show",
    vec![Param::new("p", "point")],
    "void",
    vec![Statement::expr(Expression::call(
      "print",
      vec![Expression::call("str", vec![Expression::int(0)])],
    ))],
  )]);
  let file = project.write_module("point.json", &module);

  let mut build = project.build_config(&file);
  build.types_file = Some(types);

  let ir = read(&compile_file(&quiet(build)).unwrap().ll_path);

  assert!(ir.contains("%point = type { i64, i64 }"));
  assert!(ir.contains("define void @show(%point* %p) {"));
  assert!(ir.contains("declare void @point.__str__(%point*, %str*)"));
}

#[test]
fn load_types_without_file_is_builtin_registry() {
  let config = quiet(runa_config::RunaBuildConfig::new("unused.json"));
  let types = load_types(&config, None).unwrap();
  assert!(types.lookup("intiter").is_some());
}

mod errors {
  use super::*;

  #[test]
  fn missing_input() {
    let project = Project::new();
    let missing = project.path("absent.json").to_string_lossy().into_owned();

    let err = compile_file(&quiet(project.build_config(&missing))).unwrap_err();
    assert!(matches!(err, DriverError::Read { ref path, .. } if *path == missing));
  }

  #[test]
  fn malformed_module_tree() {
    let project = Project::new();
    let file = project.write("bad.json", "{ \"functions\": [ { \"name\": 3 } ] }");

    let err = compile_file(&quiet(project.build_config(&file))).unwrap_err();
    assert!(matches!(err, DriverError::Json { .. }));
  }

  #[test]
  fn invalid_types_file() {
    let project = Project::new();
    let file = project.write_module("hello.json", &hello());
    let types = project.write("types.toml", "[[types]]\nname = \"h\"\nir = \"i64\"\nelement = \"nope\"\n");

    let mut build = project.build_config(&file);
    build.types_file = Some(types);

    let err = compile_file(&quiet(build)).unwrap_err();
    assert!(matches!(err, DriverError::Types { .. }));
  }

  #[test]
  fn codegen_failure_writes_nothing() {
    let project = Project::new();
    let module = Module::new(vec![Function::new(
      DEFAULT_ENTRY,
      vec![],
      "void",
      vec![Statement::expr(Expression::call("launch", vec![]))],
    )]);
    let file = project.write_module("bad.json", &module);

    let err = compile_file(&quiet(project.build_config(&file))).unwrap_err();

    assert!(matches!(
      err,
      DriverError::Codegen(CodegenError::UnknownCallee { ref name }) if name == "launch"
    ));
    assert!(!project.path("build").join("bad.ll").exists());
  }

  #[test]
  fn unknown_platform() {
    let project = Project::new();
    let file = project.write_module("hello.json", &hello());

    let mut build = project.build_config(&file);
    build.platform = Some("plan9".to_string());

    let err = compile_file(&quiet(build)).unwrap_err();
    assert!(matches!(err, DriverError::Codegen(CodegenError::UnsupportedPlatform { .. })));
  }

  #[test]
  fn link_failure_is_a_toolchain_error() {
    let project = Project::new();
    let file = project.write_module("hello.json", &hello());

    let mut build = project.build_config(&file);
    build.cc = "runa-no-such-compiler".to_string();
    build.emit_bin = Some(project.path("build/hello").to_string_lossy().into_owned());

    let err = compile_file(&quiet(build)).unwrap_err();
    assert!(matches!(err, DriverError::Toolchain(_)));
    assert!(project.path("build/hello.ll").exists());
  }

  #[test]
  fn no_build_config() {
    let config = runa_config::RunaConfig::new_basic(false, vec![], true, 0);
    assert!(matches!(compile_file(&config), Err(DriverError::MissingBuildConfig)));
  }
}
