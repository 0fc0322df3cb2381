use super::*;
use crate::decl::{Directives, FunctionDecl, ParamSpec};
use conform_checks::{CheckerCompiler, TypeSpec};
use pretty_assertions::assert_eq;

fn sig(decl: &FunctionDecl, declared: &[(String, TypeSpec)], directives: &Directives) -> Signature {
    Signature::new(decl, declared, directives, &CheckerCompiler::default()).unwrap()
}

fn typed(name: &str, tag: &str) -> (String, TypeSpec) {
    (name.to_string(), TypeSpec::class(tag))
}

fn kws(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

fn call_err(signature: &Signature, args: &[Value], keywords: &[(&str, Value)]) -> String {
    signature
        .check_call(args, &kws(keywords))
        .unwrap_err()
        .to_string()
}

#[test]
fn test_func_no_args_no_kws() {
    let foo = sig(&FunctionDecl::new("foo"), &[], &Directives::none());

    assert!(foo.check_call(&[], &[]).is_ok());
    assert_eq!(
        call_err(&foo, &[Value::Int(1)], &[]),
        "`foo()` doesn't take any arguments"
    );
    assert_eq!(
        call_err(&foo, &[Value::Int(1), Value::Int(2), Value::Int(3)], &[]),
        "`foo()` doesn't take any arguments"
    );
    assert_eq!(
        call_err(&foo, &[], &[("w", Value::Int(1))]),
        "`foo()` got an unexpected keyword argument `w`"
    );
    // Arity is checked before keywords
    assert_eq!(
        call_err(&foo, &[Value::Int(1)], &[("q", Value::Int(2))]),
        "`foo()` doesn't take any arguments"
    );
}

#[test]
fn test_method_no_args() {
    let bar = sig(
        &FunctionDecl::new("bar").with_receiver(),
        &[],
        &Directives::none(),
    );
    let receiver = Value::instance("Foo", vec![]);

    assert!(bar.check_call(&[receiver.clone()], &[]).is_ok());
    // The receiver is excluded from the notion of "arguments"
    assert_eq!(
        call_err(&bar, &[receiver.clone(), Value::Int(1)], &[]),
        "`bar()` doesn't take any arguments"
    );
    assert_eq!(
        call_err(&bar, &[receiver], &[("ww", Value::Int(1))]),
        "`bar()` got an unexpected keyword argument `ww`"
    );
}

#[test]
fn test_func_one_typed_arg() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::positional("x")),
        &[typed("x", "int")],
        &Directives::none(),
    );

    assert!(foo.check_call(&[Value::Int(1)], &[]).is_ok());
    assert!(foo.check_call(&[], &kws(&[("x", Value::Int(15))])).is_ok());

    assert_eq!(
        call_err(&foo, &[], &[]),
        "`foo()` missing 1 required positional argument `x`"
    );
    assert_eq!(
        call_err(&foo, &[Value::Int(1), Value::Int(2), Value::Int(3)], &[]),
        "`foo()` takes 1 positional argument but 3 were given"
    );
    assert_eq!(
        call_err(&foo, &[Value::string("bar")], &[]),
        "Parameter `x` of type `int` received value \"bar\" of type str"
    );
    assert_eq!(
        call_err(&foo, &[Value::Int(1)], &[("x", Value::Int(2))]),
        "`foo()` got multiple values for argument `x`"
    );
}

#[test]
fn test_func_three_typed_args() {
    let foo = sig(
        &FunctionDecl::new("foo")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::positional("y"))
            .with_param(ParamSpec::positional("z")),
        &[typed("x", "int"), typed("y", "float"), typed("z", "str")],
        &Directives::none(),
    );

    assert!(foo
        .check_call(&[Value::Int(1), Value::Int(2), Value::string("bar")], &[])
        .is_ok());
    assert!(foo
        .check_call(
            &[],
            &kws(&[
                ("z", Value::string("reverse")),
                ("x", Value::Int(7)),
                ("y", Value::Float(0.001)),
            ]),
        )
        .is_ok());

    assert_eq!(
        call_err(&foo, &[], &[]),
        "`foo()` missing 3 required positional arguments: `x`, `y` and `z`"
    );
    assert_eq!(
        call_err(&foo, &[], &[("y", Value::Int(0))]),
        "`foo()` missing 2 required positional arguments: `x` and `z`"
    );
    assert_eq!(
        call_err(
            &foo,
            &[],
            &[
                ("x", Value::list(vec![Value::Int(3)])),
                ("y", Value::Int(4)),
                ("z", Value::string("")),
            ],
        ),
        "Parameter `x` of type `int` received value [3] of type list"
    );
}

#[test]
fn test_func_varargs() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::var_positional("args")),
        &[typed("args", "int")],
        &Directives::none(),
    );

    assert!(foo.check_call(&[], &[]).is_ok());
    assert!(foo.check_call(&[Value::Int(1)], &[]).is_ok());
    assert!(foo
        .check_call(
            &[
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4),
                Value::Int(5),
            ],
            &[],
        )
        .is_ok());

    assert_eq!(
        call_err(
            &foo,
            &[Value::Int(1), Value::Int(3), Value::string("bar")],
            &[],
        ),
        "Parameter `*args` of type `int` received value \"bar\" of type str"
    );
}

#[test]
fn test_func_varkws() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::var_keyword("kws")),
        &[typed("kws", "float")],
        &Directives::none(),
    );

    assert!(foo.check_call(&[], &[]).is_ok());
    assert!(foo.check_call(&[], &kws(&[("x", Value::Int(1))])).is_ok());
    assert!(foo
        .check_call(
            &[],
            &kws(&[
                ("x", Value::Int(1)),
                ("y", Value::Float(3.3)),
                ("z", Value::Float(0.7)),
            ]),
        )
        .is_ok());

    assert_eq!(
        call_err(
            &foo,
            &[],
            &[
                ("x", Value::Int(1)),
                ("xx", Value::Int(3)),
                ("xxx", Value::string("bar")),
            ],
        ),
        "Parameter `xxx` of type `numeric` received value \"bar\" of type str"
    );
    assert_eq!(
        call_err(
            &foo,
            &[Value::Int(1), Value::Int(2)],
            &[("x", Value::Int(10))],
        ),
        "`foo()` accepts only keyword arguments"
    );
}

#[test]
fn test_return_value() {
    let foo = sig(
        &FunctionDecl::new("foo"),
        &[],
        &Directives::returns(TypeSpec::class("float")),
    );
    assert!(foo.check_return(&Value::Float(12.5)).is_ok());
    // The numeric return checker admits integers as well
    assert!(foo.check_return(&Value::Int(12)).is_ok());

    let bar = sig(
        &FunctionDecl::new("bar").with_param(ParamSpec::positional("x")),
        &[],
        &Directives::returns(TypeSpec::class("int")),
    );
    assert!(bar.check_return(&Value::Int(1)).is_ok());
    assert_eq!(
        bar.check_return(&Value::string("test")).unwrap_err().to_string(),
        "Incorrect return type in `bar()`: expected int got str"
    );
}

#[test]
fn test_defaults_exempt_type_checks() {
    let foo = sig(
        &FunctionDecl::new("foo")
            .with_param(ParamSpec::positional("x").with_default(Value::None)),
        &[typed("x", "int")],
        &Directives::none(),
    );

    assert!(foo.check_call(&[], &[]).is_ok());
    assert!(foo.check_call(&[Value::Int(5)], &[]).is_ok());
    // None equals the declared default, so the int checker is bypassed
    assert!(foo.check_call(&[Value::None], &[]).is_ok());
    assert!(foo.check_call(&[], &kws(&[("x", Value::Int(10))])).is_ok());
    assert!(foo.check_call(&[], &kws(&[("x", Value::None)])).is_ok());

    assert_eq!(
        call_err(&foo, &[], &[("x", Value::string(""))]),
        "Parameter `x` of type `int` received value \"\" of type str"
    );
}

#[test]
fn test_optional_parameter_spec() {
    let foo = sig(
        &FunctionDecl::new("foo")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::positional("msg").with_default(Value::None)),
        &[
            typed("x", "int"),
            (
                "msg".to_string(),
                TypeSpec::optional(TypeSpec::class("str")),
            ),
        ],
        &Directives::none(),
    );

    assert!(foo.check_call(&[Value::Int(1)], &[]).is_ok());
    assert!(foo
        .check_call(&[Value::Int(1), Value::string("hello")], &[])
        .is_ok());
    assert!(foo.check_call(&[Value::Int(1), Value::None], &[]).is_ok());
    assert_eq!(
        call_err(&foo, &[Value::Int(1), Value::Int(2)], &[]),
        "Parameter `msg` received value 2 of type int"
    );
}

#[test]
fn test_list_pattern_diagnostics_through_binder() {
    let foo1 = sig(
        &FunctionDecl::new("foo1").with_param(ParamSpec::positional("x")),
        &[(
            "x".to_string(),
            TypeSpec::ListPattern(vec![TypeSpec::class("int")]),
        )],
        &Directives::none(),
    );

    assert!(foo1.check_call(&[Value::list(vec![])], &[]).is_ok());
    assert!(foo1.check_call(&[Value::list(vec![Value::Int(0)])], &[]).is_ok());

    assert_eq!(
        call_err(&foo1, &[Value::set(vec![Value::string("bar")])], &[]),
        "Parameter `x` of type `List[int]` received value {\"bar\"} of type set"
    );
    assert_eq!(
        call_err(&foo1, &[Value::list(vec![Value::string("bar")])], &[]),
        "Parameter `x` of type `List[int]` received a list where 1st element is \"bar\" of type str"
    );
    assert_eq!(
        call_err(
            &foo1,
            &[Value::list(vec![
                Value::Int(1),
                Value::Int(7),
                Value::string("why"),
                Value::Int(0),
            ])],
            &[],
        ),
        "Parameter `x` of type `List[int]` received a list where 3rd element is \"why\" of type str"
    );
}

#[test]
fn test_kwonly_all_converted() {
    let foo = sig(
        &FunctionDecl::new("foo")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::positional("y")),
        &[],
        &Directives::kwonly(2),
    );

    assert!(foo
        .check_call(&[], &kws(&[("x", Value::Int(1)), ("y", Value::Int(2))]))
        .is_ok());
    assert!(foo
        .check_call(
            &[],
            &kws(&[("y", Value::string("spam")), ("x", Value::string("ham"))]),
        )
        .is_ok());

    assert_eq!(
        call_err(&foo, &[Value::Int(1), Value::Int(2)], &[]),
        "`foo()` accepts only keyword arguments"
    );
    assert_eq!(
        call_err(&foo, &[Value::Int(1)], &[("y", Value::Int(2))]),
        "`foo()` accepts only keyword arguments"
    );
}

#[test]
fn test_kwonly_partial_conversion() {
    let bar = sig(
        &FunctionDecl::new("bar")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::positional("y")),
        &[],
        &Directives::kwonly(1),
    );

    assert!(bar
        .check_call(&[], &kws(&[("x", Value::Int(3)), ("y", Value::Int(4))]))
        .is_ok());
    assert!(bar
        .check_call(&[Value::Int(3)], &kws(&[("y", Value::Int(7))]))
        .is_ok());

    // The missing keyword-only check runs before duplicate detection
    assert_eq!(
        call_err(&bar, &[Value::Int(1)], &[("x", Value::Int(2))]),
        "`bar()` missing 1 required keyword argument `y`"
    );
    assert_eq!(
        call_err(&bar, &[Value::Int(1)], &[]),
        "`bar()` missing 1 required keyword argument `y`"
    );
    // ...and before unexpected-keyword detection
    assert_eq!(
        call_err(&bar, &[Value::Int(1)], &[("smth", Value::Int(2))]),
        "`bar()` missing 1 required keyword argument `y`"
    );
    assert_eq!(
        call_err(&bar, &[Value::Int(1), Value::Int(2)], &[]),
        "`bar()` takes 1 positional argument but 2 were given"
    );
}

#[test]
fn test_kwonly_with_trailing_default() {
    let baz = sig(
        &FunctionDecl::new("baz")
            .with_param(ParamSpec::positional("a"))
            .with_param(ParamSpec::positional("b"))
            .with_param(ParamSpec::positional("c"))
            .with_param(ParamSpec::positional("d").with_default(Value::Int(4))),
        &[],
        &Directives::kwonly(2),
    );

    assert!(baz
        .check_call(
            &[Value::Int(1), Value::Int(2)],
            &kws(&[("c", Value::Int(3)), ("d", Value::Int(44))]),
        )
        .is_ok());
    assert!(baz
        .check_call(&[Value::Int(1), Value::Int(2)], &kws(&[("c", Value::Int(3))]))
        .is_ok());

    assert_eq!(
        call_err(
            &baz,
            &[Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
            &[],
        ),
        "`baz()` takes 2 positional arguments but 4 were given"
    );
    assert_eq!(
        call_err(
            &baz,
            &[Value::Int(1), Value::Int(2)],
            &[("d", Value::Int(5))],
        ),
        "`baz()` missing 1 required keyword argument `c`"
    );
    assert_eq!(
        call_err(
            &baz,
            &[Value::Int(1)],
            &[("c", Value::Int(2)), ("d", Value::Int(5))],
        ),
        "`baz()` missing 1 required positional argument `b`"
    );
}

#[test]
fn test_kwonly_with_defaults_stays_callable() {
    let ooz = sig(
        &FunctionDecl::new("ooz")
            .with_param(ParamSpec::positional("a"))
            .with_param(ParamSpec::positional("b").with_default(Value::Int(2)))
            .with_param(ParamSpec::positional("x").with_default(Value::None)),
        &[],
        &Directives::kwonly(2),
    );

    assert!(ooz.check_call(&[Value::Int(3)], &[]).is_ok());
    assert!(ooz
        .check_call(&[Value::Int(5)], &kws(&[("b", Value::Int(0))]))
        .is_ok());
}

#[test]
fn test_native_keyword_only_params() {
    let bar = sig(
        &FunctionDecl::new("bar")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::keyword_only("y")),
        &[typed("x", "int"), typed("y", "int")],
        &Directives::none(),
    );
    assert!(bar
        .check_call(&[Value::Int(1)], &kws(&[("y", Value::Int(2))]))
        .is_ok());
    assert!(bar
        .check_call(&[], &kws(&[("x", Value::Int(5)), ("y", Value::Int(7))]))
        .is_ok());
    assert_eq!(
        call_err(&bar, &[Value::Int(1)], &[]),
        "`bar()` missing 1 required keyword argument `y`"
    );

    let baz = sig(
        &FunctionDecl::new("baz")
            .with_param(ParamSpec::positional("x"))
            .with_param(ParamSpec::keyword_only("y").with_default(Value::Int(5))),
        &[typed("x", "int"), typed("y", "int")],
        &Directives::none(),
    );
    assert!(baz.check_call(&[Value::Int(5)], &[]).is_ok());
    assert!(baz.check_call(&[], &kws(&[("x", Value::Int(1))])).is_ok());
    assert!(baz
        .check_call(&[], &kws(&[("x", Value::Int(1)), ("y", Value::Int(2))]))
        .is_ok());
}

#[test]
fn test_keyword_type_check_applies_to_named_params() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::positional("x")),
        &[typed("x", "int")],
        &Directives::none(),
    );
    assert_eq!(
        call_err(&foo, &[], &[("x", Value::string("bar"))]),
        "Parameter `x` of type `int` received value \"bar\" of type str"
    );
}

#[test]
fn test_varkw_without_checker_accepts_anything() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::var_keyword("kws")),
        &[],
        &Directives::none(),
    );
    assert!(foo
        .check_call(&[], &kws(&[("whatever", Value::None)]))
        .is_ok());
}

#[test]
fn test_union_attribution_through_binder() {
    let foo = sig(
        &FunctionDecl::new("foo").with_param(ParamSpec::positional("x")),
        &[(
            "x".to_string(),
            TypeSpec::union_of(vec![
                TypeSpec::list_of(TypeSpec::class("int")),
                TypeSpec::list_of(TypeSpec::class("str")),
            ]),
        )],
        &Directives::none(),
    );
    assert_eq!(
        call_err(
            &foo,
            &[Value::list(vec![
                Value::Int(1),
                Value::Int(5),
                Value::string("ham"),
            ])],
            &[],
        ),
        "Parameter `x` expects type `List[int]` but received a list where 3rd element is \"ham\" of type str"
    );
}
