use exprcalc::{
    error::SessionError,
    interpreter::step::NoSteps,
    session::{HELP_TEXT, Outcome, Session, Status},
};

struct Transcript {
    status:  Status,
    out:     String,
    verbose: String,
    err:     String,
}

fn run(session: &mut Session, input: &str) -> Transcript {
    let (mut out, mut verbose, mut err) = (Vec::new(), Vec::new(), Vec::new());
    let status = session.run(input.as_bytes(), &mut out, &mut verbose, &mut err)
                        .unwrap();

    Transcript { status,
                 out: String::from_utf8(out).unwrap(),
                 verbose: String::from_utf8(verbose).unwrap(),
                 err: String::from_utf8(err).unwrap() }
}

fn outcome(session: &mut Session, line: &str) -> String {
    match session.execute_line(line, &mut NoSteps) {
        Ok(outcome) => outcome.to_string(),
        Err(e) => panic!("Statement {line:?} failed: {e}"),
    }
}

fn error(session: &mut Session, line: &str) -> String {
    match session.execute_line(line, &mut NoSteps) {
        Ok(outcome) => panic!("Statement {line:?} succeeded with {outcome:?}"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn statement_outcomes() {
    let mut session = Session::new();

    assert_eq!(outcome(&mut session, "x = 1 + 2"), "x is now 3");
    assert_eq!(outcome(&mut session, "x * 2"), "6");
    assert_eq!(outcome(&mut session, "x ="), "x has been deleted.");
    assert_eq!(outcome(&mut session, "sum(a, b) = a + b"), "sum(a,b) is now defined as (a+b)");
    assert_eq!(outcome(&mut session, "sum(1, 2)"), "3");
    assert_eq!(outcome(&mut session, "sum(2) ="), "sum(2) has been deleted.");
    assert_eq!(outcome(&mut session, "   "), "");
}

#[test]
fn assignments_do_not_write_ans() {
    let mut session = Session::new();
    outcome(&mut session, "x = 5");

    assert!(session.context().get_variable("ans").is_err());
    assert_eq!(outcome(&mut session, "x"), "5");
    assert_eq!(session.context().get_variable("ans").unwrap().to_string(), "5");
}

#[test]
fn readonly_statements() {
    let mut session = Session::new();
    outcome(&mut session, "readonly c = 1");
    outcome(&mut session, "readonly double(a) = a * 2");

    assert_eq!(error(&mut session, "c = 2"),
               "Expression error: The \"c\" variable is defined as read-only.");
    assert_eq!(error(&mut session, "c ="),
               "Expression error: The \"c\" variable is defined as read-only.");
    assert_eq!(error(&mut session, "double(1) ="),
               "Expression error: The \"double\" function is defined as read-only for 1 arguments.");
    assert_eq!(outcome(&mut session, "double(c)"), "2");

    assert_eq!(outcome(&mut session, "readonlyx = 3"), "readonlyx is now 3");
    assert!(!session.context().is_readonly_variable("readonlyx"));
}

#[test]
fn malformed_statements() {
    let mut session = Session::new();

    assert_eq!(session.execute_line("a=b=c", &mut NoSteps),
               Err(SessionError::OnlyOneEquality));
    assert_eq!(session.execute_line("f(x)=", &mut NoSteps),
               Err(SessionError::IncorrectDelete));
    assert_eq!(error(&mut session, "help = 2"),
               "help is a reserved word and can't be used as symbol name.");
    assert_eq!(error(&mut session, "exit(a) = a"),
               "exit is a reserved word and can't be used as symbol name.");
    assert!(matches!(session.execute_line("f(x = x", &mut NoSteps),
                     Err(SessionError::Parse(_))));
    assert!(matches!(session.execute_line("x y = 3", &mut NoSteps),
                     Err(SessionError::Context(_))));
    assert_eq!(error(&mut session, "1/0"), "Expression error: Division by zero.");
}

#[test]
fn failed_statements_leave_the_context_unchanged() {
    let mut session = Session::new();
    outcome(&mut session, "x = 1");

    error(&mut session, "x = 1/0");
    error(&mut session, "x = y");
    assert_eq!(outcome(&mut session, "x"), "1");
}

#[test]
fn zero_parameter_functions() {
    let mut session = Session::new();

    assert_eq!(outcome(&mut session, "answer() = 6 * 7"), "answer() is now defined as (6*7)");
    assert_eq!(outcome(&mut session, "answer()"), "42");
    assert_eq!(outcome(&mut session, "answer(0) ="), "answer(0) has been deleted.");
}

#[test]
fn run_stops_at_exit() {
    let mut session = Session::new();
    let transcript = run(&mut session, "1+1\nexit\n2+2\n");

    assert_eq!(transcript.status, Status::Exit);
    assert_eq!(transcript.out, "2\n");
}

#[test]
fn run_reports_errors_and_continues() {
    let mut session = Session::new();
    let transcript = run(&mut session, "1/0\n2\n");

    assert_eq!(transcript.status, Status::InputEnd);
    assert_eq!(transcript.out, "2\n");
    assert_eq!(transcript.err, "Expression error: Division by zero.\n");
}

#[test]
fn run_can_stop_on_error() {
    let mut session = Session::new();
    session.set_stop_on_error(true);
    let transcript = run(&mut session, "1/0\n2\n");

    assert_eq!(transcript.status, Status::Error);
    assert_eq!(transcript.out, "");
    assert_eq!(transcript.err, "Expression error: Division by zero.\n");
}

#[test]
fn clear_and_context_commands() {
    let mut session = Session::new();
    let transcript = run(&mut session, "readonly y=2\nx=1\nclear\ncontext\n");

    assert!(transcript.out
                      .starts_with("readonly y=2\nreadonly abs(x1)=<builtin>\n"));
    assert!(!transcript.out.contains("x=1"));
    assert_eq!(transcript.verbose,
               "2 can be rewritten as 2\n\
                y is now 2\n\
                1 can be rewritten as 1\n\
                x is now 1\n\
                All non-readonly variables and functions have been deleted.\n");
}

#[test]
fn verbose_output_lists_steps() {
    let mut session = Session::new();
    let transcript = run(&mut session, "2*3\n");

    assert_eq!(transcript.out, "6\n");
    assert_eq!(transcript.verbose,
               "2*3 can be rewritten as (2*3)\n(2*3) evaluates to 6\n");
}

#[test]
fn readonly_ans_is_a_warning() {
    let mut session = Session::new();
    let transcript = run(&mut session, "readonly ans = 0\n5\nans\n");

    assert_eq!(transcript.out, "5\n0\n");
    assert_eq!(transcript.err, "");
    assert!(transcript.verbose.contains(
        "Warning: failed to store result. Reason: The \"ans\" variable is defined as read-only.\n"
    ));
}

#[test]
fn help_goes_to_output_unless_verbose() {
    let mut session = Session::new();
    let transcript = run(&mut session, "help\n");
    assert_eq!(transcript.out, format!("{HELP_TEXT}\n"));

    session.set_help_verbose(true);
    let transcript = run(&mut session, "help\n");
    assert_eq!(transcript.out, "");
    assert_eq!(transcript.verbose, format!("{HELP_TEXT}\n"));
}

#[test]
fn prompt_is_written_before_each_line() {
    let mut session = Session::new();
    session.set_prompt("> ");
    let transcript = run(&mut session, "1\n");

    assert_eq!(transcript.out, "> 1\n> ");
    assert_eq!(transcript.status, Status::InputEnd);
}

#[test]
fn custom_commands() {
    let mut session = Session::new();
    session.set_commands("show", "reset", "?", "quit");

    assert_eq!(outcome(&mut session, "exit = 3"), "exit is now 3");
    assert_eq!(session.execute_line(" ? ", &mut NoSteps), Ok(Outcome::Help));
    assert_eq!(error(&mut session, "quit = 1"),
               "quit is a reserved word and can't be used as symbol name.");

    let transcript = run(&mut session, "reset\nshow\nquit\n1\n");
    assert_eq!(transcript.status, Status::Exit);
    assert!(transcript.out.starts_with("readonly abs(x1)=<builtin>"));

    session.set_default_commands();
    assert_eq!(session.execute_line("exit", &mut NoSteps), Ok(Outcome::Exit));
}
