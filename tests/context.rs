use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use bigdecimal::RoundingMode;
use exprcalc::{
    ast::{Expr, MAX_NESTING_DEPTH},
    error::{ContextError, RuntimeError, SymbolError},
    interpreter::{
        evaluator::{
            core::{Change, Context},
            function::core::Function,
        },
        parser::core::parse,
        step::NoSteps,
        value::{
            core::Number,
            precision::{DEFAULT_MAX_EXPONENT, Precision},
        },
    },
};

fn eval(ctx: &Context, src: &str) -> Result<Number, RuntimeError> {
    let expr = parse(src).unwrap_or_else(|e| panic!("Failed to parse {src:?}: {e}"));
    ctx.evaluate(&expr, &mut NoSteps)
}

fn assert_eval(ctx: &Context, src: &str, expected: &str) {
    match eval(ctx, src) {
        Ok(value) => assert_eq!(value.to_string(), expected, "expression: {src}"),
        Err(e) => panic!("Failed to evaluate {src:?}: {e}"),
    }
}

fn counting_observer(ctx: &mut Context) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    ctx.subscribe(move |_: &Change| {
           counter.fetch_add(1, Ordering::SeqCst);
       });
    count
}

#[test]
fn builtins_are_readonly() {
    let mut ctx = Context::new();

    for name in ["sin", "cos", "tan", "log", "sqrt", "abs"] {
        assert!(ctx.is_readonly_function(name, 1), "{name} should be readonly");
    }
    assert_eq!(ctx.define_function("sin", vec!["x".into()], parse("x").unwrap(), false),
               Err(ContextError::ReadonlyFunction { name:  "sin".to_string(),
                                                    arity: 1, }));
    assert_eq!(ctx.delete_function("sqrt", 1),
               Err(ContextError::ReadonlyFunction { name:  "sqrt".to_string(),
                                                    arity: 1, }));
    assert_eval(&ctx, "sqrt(9)", "3");
}

#[test]
fn builtins_can_be_overloaded_at_other_arities() {
    let mut ctx = Context::new();
    ctx.define_function("sin", vec!["a".into(), "b".into()], parse("a*b").unwrap(), false)
       .unwrap();

    assert_eval(&ctx, "sin(2, 3)", "6");
    assert_eval(&ctx, "sin(0)", "0");
}

#[test]
fn invalid_names_are_rejected() {
    let mut ctx = Context::new();

    assert_eq!(ctx.set_variable("2x", 1.into(), false),
               Err(ContextError::InvalidIdentifier(SymbolError::InvalidChar { name:  "2x".to_string(),
                                                                             index: 0,
                                                                             ch:    '2', })));
    assert_eq!(ctx.set_variable("", 1.into(), false),
               Err(ContextError::InvalidIdentifier(SymbolError::Empty)));
    assert!(matches!(ctx.define_function("f", vec!["a b".into()], parse("1").unwrap(), false),
                     Err(ContextError::InvalidIdentifier(_))));
    assert!(matches!(ctx.define_function("f-g", Vec::new(), parse("1").unwrap(), false),
                     Err(ContextError::InvalidIdentifier(_))));
    assert_eq!(ctx.variables().count(), 0);
}

#[test]
fn duplicate_parameters_are_rejected() {
    let mut ctx = Context::new();

    assert_eq!(ctx.define_function("f", vec!["a".into(), "a".into()], parse("a").unwrap(), false),
               Err(ContextError::DuplicateParameter { name: "a".to_string() }));
    assert!(ctx.get_function("f", 2).is_err());
}

#[test]
fn readonly_variables_cannot_change() {
    let mut ctx = Context::new();
    ctx.set_variable("c", 3.into(), true).unwrap();

    assert_eq!(ctx.set_variable("c", 4.into(), false),
               Err(ContextError::ReadonlyVariable { name: "c".to_string() }));
    assert_eq!(ctx.set_variable("c", 4.into(), true),
               Err(ContextError::ReadonlyVariable { name: "c".to_string() }));
    assert_eq!(ctx.delete_variable("c"),
               Err(ContextError::ReadonlyVariable { name: "c".to_string() }));
    assert_eq!(ctx.get_variable("c").unwrap().to_string(), "3");
    assert!(ctx.is_readonly_variable("c"));
}

#[test]
fn readonly_functions_cannot_change() {
    let mut ctx = Context::new();
    ctx.define_function("sq", vec!["a".into()], parse("a^2").unwrap(), true)
       .unwrap();

    assert!(ctx.define_function("sq", vec!["b".into()], parse("b").unwrap(), false)
               .is_err());
    assert!(ctx.delete_function("sq", 1).is_err());
    assert_eval(&ctx, "sq(4)", "16");
}

#[test]
fn variables_can_be_replaced_and_deleted() {
    let mut ctx = Context::new();
    ctx.set_variable("x", 1.into(), false).unwrap();
    ctx.set_variable("x", 2.into(), false).unwrap();
    assert_eval(&ctx, "x", "2");

    assert_eq!(ctx.delete_variable("x"),
               Ok(Change::VariableDeleted { name: "x".to_string() }));
    assert_eq!(eval(&ctx, "x"),
               Err(RuntimeError::UndefinedVariable { name: "x".to_string() }));
}

#[test]
fn deleting_unbound_names_succeeds() {
    let mut ctx = Context::new();

    assert!(ctx.delete_variable("nothing").is_ok());
    assert_eq!(ctx.delete_function("nothing", 2),
               Ok(Change::FunctionDeleted { name:  "nothing".to_string(),
                                            arity: 2, }));
}

#[test]
fn clear_keeps_readonly_entries() {
    let mut ctx = Context::new();
    ctx.set_variable("x", 1.into(), false).unwrap();
    ctx.set_variable("y", 2.into(), true).unwrap();
    ctx.define_function("f", vec!["a".into()], parse("a").unwrap(), false)
       .unwrap();
    ctx.define_function("g", vec!["a".into()], parse("-a").unwrap(), true)
       .unwrap();

    assert_eq!(ctx.clear(), Change::Cleared);

    assert!(ctx.get_variable("x").is_err());
    assert!(ctx.get_function("f", 1).is_err());
    assert_eval(&ctx, "y + g(1) + abs(-1)", "2");
}

#[test]
fn observers_see_successful_mutations_only() {
    let mut ctx = Context::new();
    let count = counting_observer(&mut ctx);

    ctx.set_variable("x", 1.into(), false).unwrap();
    ctx.set_variable("c", 1.into(), true).unwrap();
    assert!(ctx.set_variable("c", 2.into(), false).is_err());
    assert!(ctx.set_variable("1x", 2.into(), false).is_err());
    assert!(ctx.define_function("cos", vec!["x".into()], parse("x").unwrap(), false)
               .is_err());
    assert_eq!(count.load(Ordering::SeqCst), 2);

    ctx.delete_variable("x").unwrap();
    ctx.define_function("f", vec!["a".into()], parse("a").unwrap(), false)
       .unwrap();
    ctx.delete_function("f", 1).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 5);

    ctx.clear();
    assert_eq!(count.load(Ordering::SeqCst), 6);
}

#[test]
fn observers_receive_the_change() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = Context::new();
    let sink = Arc::clone(&seen);
    ctx.subscribe(move |change: &Change| sink.lock().unwrap().push(change.clone()));

    ctx.set_variable("x", 1.into(), false).unwrap();
    ctx.define_function("f", vec!["a".into(), "b".into()], parse("a+b").unwrap(), false)
       .unwrap();
    ctx.evaluate_and_store(&parse("f(x, 2)").unwrap(), &mut NoSteps)
       .unwrap();

    assert_eq!(*seen.lock().unwrap(),
               vec![Change::VariableSet { name: "x".to_string() },
                    Change::FunctionSet { name:  "f".to_string(),
                                          arity: 2, },
                    Change::VariableSet { name: "ans".to_string() }]);
}

#[test]
fn unsubscribed_observers_are_not_called() {
    let mut ctx = Context::new();
    let first = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&first);
    let id = ctx.subscribe(move |_: &Change| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
    let second = counting_observer(&mut ctx);

    ctx.set_variable("x", 1.into(), false).unwrap();
    assert!(ctx.unsubscribe(id));
    assert!(!ctx.unsubscribe(id));
    ctx.set_variable("x", 2.into(), false).unwrap();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[test]
fn display_lists_variables_then_functions() {
    let mut ctx = Context::new();
    ctx.set_variable("y", 2.into(), true).unwrap();
    ctx.set_variable("x", "1.50".parse().unwrap(), false).unwrap();
    ctx.define_function("f", vec!["a".into()], parse("a+1").unwrap(), false)
       .unwrap();

    assert_eq!(ctx.to_string(),
               "x=1.5\n\
                readonly y=2\n\
                readonly abs(x1)=<builtin>\n\
                readonly cos(x1)=<builtin>\n\
                f(a)=(a+1)\n\
                readonly log(x1)=<builtin>\n\
                readonly sin(x1)=<builtin>\n\
                readonly sqrt(x1)=<builtin>\n\
                readonly tan(x1)=<builtin>");
}

#[test]
fn precision_applies_to_later_evaluations() {
    let mut ctx = Context::new();
    ctx.set_variable("third", eval(&ctx, "1/3").unwrap(), false)
       .unwrap();

    ctx.set_precision(Precision::new(3, RoundingMode::HalfUp).unwrap());
    assert_eval(&ctx, "1/3", "0.333");
    assert_eval(&ctx, "2/3", "0.667");
    assert_eval(&ctx, "third * 1", "0.333");
    assert_eq!(ctx.get_variable("third").unwrap().to_string(), "0.3333333333333333");

    ctx.set_precision(Precision::new(3, RoundingMode::Down).unwrap());
    assert_eval(&ctx, "2/3", "0.666");
}

#[test]
fn precision_presets() {
    let ctx = Context::with_precision(Precision::decimal128());
    assert_eval(&ctx, "1/3", &format!("0.{}", "3".repeat(34)));

    let ctx = Context::with_precision(Precision::decimal32());
    assert_eval(&ctx, "2/3", "0.6666667");
    assert_eval(&ctx, "123456789", "123456800");

    assert!(Precision::new(0, RoundingMode::HalfEven).is_none());
}

#[test]
fn results_are_stored_in_ans() {
    let mut ctx = Context::new();

    let value = ctx.evaluate_and_store(&parse("6*7").unwrap(), &mut NoSteps)
                   .unwrap();
    assert_eq!(value.to_string(), "42");
    assert_eval(&ctx, "ans + 1", "43");
}

#[test]
fn readonly_ans_is_reported_as_a_warning() {
    let mut ctx = Context::new();
    ctx.set_variable("ans", 1.into(), true).unwrap();

    let mut steps: Vec<String> = Vec::new();
    let value = ctx.evaluate_and_store(&parse("2+2").unwrap(), &mut steps)
                   .unwrap();

    assert_eq!(value.to_string(), "4");
    assert_eq!(ctx.get_variable("ans").unwrap().to_string(), "1");
    assert_eq!(steps.last().map(String::as_str),
               Some("Warning: failed to store result. Reason: The \"ans\" variable is defined as read-only."));
}

#[test]
fn evaluate_does_not_write_ans() {
    let ctx = Context::new();

    assert_eval(&ctx, "1+1", "2");
    assert!(ctx.get_variable("ans").is_err());
}

#[test]
fn evaluation_steps_are_post_order() {
    let mut ctx = Context::new();
    ctx.set_variable("x", 3.into(), false).unwrap();

    let mut steps: Vec<String> = Vec::new();
    ctx.evaluate(&parse("(1+2)*x").unwrap(), &mut steps).unwrap();

    assert_eq!(steps,
               vec!["(1+2) evaluates to 3",
                    "x evaluates to 3",
                    "((1+2)*x) evaluates to 9"]);
}

#[test]
fn function_lookup_uses_the_call_arity() {
    let mut ctx = Context::new();
    ctx.define_function("f", vec!["a".into(), "b".into()], parse("a-b").unwrap(), false)
       .unwrap();

    assert_eq!(eval(&ctx, "f(1)"),
               Err(RuntimeError::UndefinedFunction { name:  "f".to_string(),
                                                     arity: 1, }));
    assert_eq!(eval(&ctx, "sqrt(1, 2)"),
               Err(RuntimeError::UndefinedFunction { name:  "sqrt".to_string(),
                                                     arity: 2, }));
    assert_eval(&ctx, "f(5, 2)", "3");
}

#[test]
fn functions_may_reference_later_definitions() {
    let mut ctx = Context::new();
    ctx.define_function("f", vec!["x".into()], parse("g(x) + k").unwrap(), false)
       .unwrap();
    assert!(eval(&ctx, "f(1)").is_err());

    ctx.define_function("g", vec!["y".into()], parse("y*10").unwrap(), false)
       .unwrap();
    ctx.set_variable("k", 5.into(), false).unwrap();
    assert_eval(&ctx, "f(1)", "15");
}

#[test]
fn call_depth_is_limited() {
    let mut ctx = Context::new();
    ctx.define_function("g", vec!["x".into()], parse("x+1").unwrap(), false)
       .unwrap();
    ctx.define_function("h", vec!["x".into()], parse("g(x)*2").unwrap(), false)
       .unwrap();
    ctx.define_function("loop", vec!["x".into()], parse("loop(x)").unwrap(), false)
       .unwrap();

    ctx.set_max_call_depth(32);
    assert_eq!(eval(&ctx, "loop(1)"), Err(RuntimeError::RecursionLimit { depth: 32 }));

    ctx.set_max_call_depth(1);
    assert_eval(&ctx, "g(1)", "2");
    assert_eq!(eval(&ctx, "h(1)"), Err(RuntimeError::RecursionLimit { depth: 1 }));

    ctx.set_max_call_depth(2);
    assert_eval(&ctx, "h(1)", "4");
}

#[test]
fn builtin_domain_errors() {
    let ctx = Context::new();

    assert!(matches!(eval(&ctx, "sqrt(-4)"), Err(RuntimeError::DomainError { .. })));
    assert!(matches!(eval(&ctx, "log(0)"), Err(RuntimeError::DomainError { .. })));
    assert_eq!(eval(&ctx, "1/(2-2)"), Err(RuntimeError::DivisionByZero));
    assert!(matches!(eval(&ctx, "(-8)^0.5"), Err(RuntimeError::UnsupportedPower { .. })));
}

#[test]
fn context_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Context>();
}

#[test]
fn division_and_sqrt_use_every_requested_digit() {
    let ctx = Context::with_precision(Precision::new(150, RoundingMode::HalfEven).unwrap());

    assert_eval(&ctx, "1/3", &format!("0.{}", "3".repeat(150)));
    assert_eq!(eval(&ctx, "1/7").unwrap().as_decimal().digits(), 150);
    assert_eq!(eval(&ctx, "2/3").unwrap().to_string(), format!("0.{}7", "6".repeat(149)));

    let root = eval(&ctx, "sqrt(2)").unwrap().to_string();
    assert!(root.len() > 140, "sqrt(2) = {root}");
    assert!(root.starts_with("1.41421356237309504880168872420969807856967187537694"));
}

#[test]
fn huge_exponents_are_out_of_range() {
    let ctx = Context::new();
    let out_of_range = Err(RuntimeError::ExponentOutOfRange { max_exponent: DEFAULT_MAX_EXPONENT });

    assert_eq!(eval(&ctx, "10^999999999"), out_of_range);
    assert_eq!(eval(&ctx, "(10^999999999)^999999999"), out_of_range);
    assert_eq!(eval(&ctx, "10^-999999999"), out_of_range);
    assert!(eval(&ctx, "2^(10^99999999)").is_err());
    assert_eval(&ctx, "10^20", "100000000000000000000");
}

#[test]
fn exponent_range_can_be_narrowed() {
    let precision = Precision::default().with_max_exponent(3);
    let ctx = Context::with_precision(precision);
    let out_of_range = Err(RuntimeError::ExponentOutOfRange { max_exponent: 3 });

    assert_eval(&ctx, "999 + 1", "1000");
    assert_eq!(eval(&ctx, "5000 * 2"), out_of_range);
    assert_eq!(eval(&ctx, "1/10000"), out_of_range);
    assert_eq!(eval(&ctx, "0 * 10000"), Ok(Number::from(0)));
    assert_eq!(precision.max_exponent(), 3);
}

#[test]
fn deep_custom_recursion_hits_the_nesting_limit() {
    let mut ctx = Context::new();
    ctx.define_function("loop", vec!["x".into()], parse("loop(x)").unwrap(), false)
       .unwrap();
    ctx.set_max_call_depth(100_000);

    assert_eq!(eval(&ctx, "loop(1)"),
               Err(RuntimeError::NestingLimit { depth: MAX_NESTING_DEPTH }));
}

#[test]
fn deleting_one_arity_keeps_the_other() {
    let mut ctx = Context::new();
    ctx.define_function("f", vec!["x".into()], parse("x*10").unwrap(), false)
       .unwrap();
    ctx.define_function("f", vec!["x".into(), "y".into()], parse("x+y").unwrap(), false)
       .unwrap();

    ctx.delete_function("f", 2).unwrap();

    assert_eval(&ctx, "f(5)", "50");
    assert_eq!(eval(&ctx, "f(2, 3)"),
               Err(RuntimeError::UndefinedFunction { name:  "f".to_string(),
                                                     arity: 2, }));
    assert!(ctx.get_function("f", 2).is_err());
}

#[test]
fn rounded_constants_render_and_parse_back() {
    let ctx = Context::with_precision(Precision::new(5, RoundingMode::Down).unwrap());

    for src in ["2/3", "-2/3", "10^8/7", "1/8000"] {
        let value = eval(&ctx, src).unwrap();
        let rendered = Expr::constant(value.clone()).to_string();
        let reparsed = parse(&rendered).unwrap_or_else(|e| panic!("{rendered:?}: {e}"));

        assert_eq!(ctx.evaluate(&reparsed, &mut NoSteps), Ok(value), "source: {src}");
    }
    assert_eval(&ctx, "2/3", "0.66666");
    assert_eval(&ctx, "-2/3", "-0.66666");
}

#[test]
fn custom_functions_expose_their_definition() {
    let mut ctx = Context::new();
    ctx.define_function("hyp", vec!["a".into(), "b".into()], parse("sqrt(a^2+b^2)").unwrap(), true)
       .unwrap();

    let Ok(Function::Custom(hyp)) = ctx.get_function("hyp", 2) else {
        panic!("hyp(a,b) should be a custom function");
    };
    assert_eq!(hyp.params(), ["a", "b"]);
    assert_eq!(hyp.body().to_string(), "sqrt(((a^2)+(b^2)))");

    let custom = ctx.functions()
                    .filter(|b| matches!(b.value, Function::Custom(_)))
                    .collect::<Vec<_>>();
    assert_eq!(custom.len(), 1);
    assert!(custom[0].readonly);
    assert_eq!(ctx.functions().count(), 7);
}
