use std::fs;

use exprcalc::get_result;

fn assert_value(src: &str, expected: &str) {
    match get_result(src) {
        Ok(Some(value)) => assert_eq!(value.to_string(), expected, "script: {src}"),
        Ok(None) => panic!("Script produced no value: {src}"),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) {
    if let Ok(value) = get_result(src) {
        panic!("Script succeeded with {value:?} but was expected to fail: {src}")
    }
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_value("x = 1 + 2\nx", "3");
    assert_value("x = 7 * 9\nx", "63");
    assert_value("x = 8 - 5\nx", "3");
    assert_value("x = 10 / 4\nx", "2.5");
}

#[test]
fn operator_precedence() {
    assert_value("1 + 2 * 3", "7");
    assert_value("(1 + 2) * 3", "9");
    assert_value("2 * 3 ^ 2", "18");
    assert_value("10 - 4 - 3", "3");
    assert_value("64 / 4 / 2", "8");
}

#[test]
fn power_is_left_associative() {
    assert_value("2^3^2", "64");
}

#[test]
fn signs() {
    assert_value("--3", "3");
    assert_value("+-+3", "-3");
    assert_value("2*-3", "-6");
    assert_value("-2^2", "4");
    assert_value("-(2^2)", "-4");
}

#[test]
fn decimal_arithmetic() {
    assert_value("0.1 + 0.2", "0.3");
    assert_value(".5 * 4", "2");
    assert_value("1/3", "0.3333333333333333");
    assert_value("2/3", "0.6666666666666667");
    assert_value("2^64", "18446744073709550000");
    assert_value("10^20", "100000000000000000000");
}

#[test]
fn powers() {
    assert_value("2^10", "1024");
    assert_value("2^-2", "0.25");
    assert_value("2^0", "1");
    assert_value("4^0.5", "2");
    assert_value("2^0.5", "1.414213562373095");
}

#[test]
fn builtin_functions() {
    assert_value("sin(0)", "0");
    assert_value("cos(0)", "1");
    assert_value("tan(0)", "0");
    assert_value("log(1)", "0");
    assert_value("sqrt(16)", "4");
    assert_value("abs(-5)", "5");
    assert_value("x = 9\nsqrt(x) + abs(-1)", "4");
}

#[test]
fn builtins_mix_with_operators() {
    assert_value("sqrt(16)+2^2", "8");
    assert_value("abs(-3) * sqrt(4)", "6");
}

#[test]
fn user_defined_function_and_calls() {
    assert_value("square(x) = x * x\nsquare(3)", "9");
    assert_value("add(a, b) = a + b\nadd(2, 5)", "7");
    assert_value("g(a,b)=a*b\nf(a,b)=a+b\nf(2, g(3,4))", "14");
    assert_value("k()=42\nk() + 1", "43");
}

#[test]
fn functions_are_keyed_by_arity() {
    assert_value("f(x)=x\nf(x,y)=x*y\nf(5) + f(2,3)", "11");
}

#[test]
fn deleting_one_arity_keeps_the_other() {
    assert_value("f(x)=x\nf(x,y)=x*y\nf(2)=\nf(5)", "5");
    assert_failure("f(x)=x\nf(x,y)=x*y\nf(2)=\nf(2,3)");
}

#[test]
fn function_bodies_resolve_globals_at_call_time() {
    assert_value("f(x)=x+y\ny=10\nf(1)", "11");
    assert_value("f(x)=x+y\ny=10\nf(1)\ny=20\nf(1)", "21");
}

#[test]
fn parameters_shadow_globals() {
    assert_value("x=100\nf(x)=x*2\nf(3)", "6");
    assert_value("x=100\nf(x)=x*2\nf(3)\nx", "100");
}

#[test]
fn builtins_can_be_overloaded_by_arity() {
    assert_value("sin(a,b)=a+b\nsin(1,2)", "3");
}

#[test]
fn ans_holds_the_last_result() {
    assert_value("2 + 3\nans * 2", "10");
}

#[test]
fn example_works() {
    let contents = fs::read_to_string("tests/example.calc").unwrap();
    assert_value(&contents, "55");
}

#[test]
fn division_by_zero_is_error() {
    assert_failure("x = 1 / 0");
    assert_failure("0^-1");
}

#[test]
fn unknown_variable_is_error() {
    assert_failure("foo + 1");
}

#[test]
fn redefinition_of_builtin_function_is_error() {
    assert_failure("sin(x) = x");
}

#[test]
fn wrong_function_arity_is_error() {
    assert_failure("f(x, y) = x + y\nf(3)");
}

#[test]
fn domain_errors() {
    assert_failure("sqrt(-1)");
    assert_failure("log(0)");
    assert_failure("log(-2)");
    assert_failure("(-8)^0.5");
}

#[test]
fn runaway_recursion_is_error() {
    assert_failure("f(x)=f(x)\nf(1)");
}

#[test]
fn oversized_results_are_errors() {
    assert_failure("10^999999999");
    assert_failure(&vec!["1"; 20_000].join("+"));
}

#[test]
fn malformed_expressions_are_errors() {
    assert_failure("2+");
    assert_failure("()");
    assert_failure("((3)");
    assert_failure("3)");
    assert_failure("3$4");
    assert_failure("2*/3");
    assert_failure("1.2.3");
}
