use std::{
    collections::HashMap,
    fmt,
    io::{self, BufRead, Write},
};

use crate::{
    ast::{Command, Expr, Statement},
    error::SessionError,
    interpreter::{
        evaluator::core::Context,
        parser::statement::parse_statement,
        step::{StepSink, WriterSink},
        value::core::Number,
    },
};

/// The text printed by the `help` command.
pub const HELP_TEXT: &str = "\
Accepted statements are expressions, assignments and commands.
An expression can be formed by integer or decimal numbers, the +,-,*,/,^ binary operators, variables, functions and parenthesis.
A symbol name starts with a letter or an underscore, followed by letters, digits and underscores. Symbols can't be named as commands, which are reserved words.
When an expression is successfully evaluated, its result is displayed and assigned to the \"ans\" variable, so it can be used by the next statement.
A variable assignment is formed by a variable name followed by the = symbol and an expression, which is evaluated and bound to that variable.
An empty assignment (in the form \"someVariable=\") deletes the variable.
A function assignment is formed by a function name and its parameters, followed by the = symbol and an expression, e.g. \"sum(x,y)=x+y\".
A function is deleted with an empty assignment giving its number of arguments, e.g. \"sum(2)=\" deletes the function \"sum\" defined on two arguments.
An assignment can be prefixed with the \"readonly\" word to prevent it from being modified or deleted, e.g. \"readonly x=1\", \"readonly square(a)=a^2\".
The builtin functions are sin, cos, tan, log (natural logarithm), sqrt and abs.
The commands are: context (prints all the defined variables and functions), clear (deletes all the non-readonly variables and functions), help (shows this message) and exit (stops reading input).";

/// The reasons that can cause [`Session::run`] to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The end of the input was reached.
    InputEnd,
    /// The exit command was read.
    Exit,
    /// A statement failed and the session stops on errors.
    Error,
}

/// The result of one successfully executed statement.
///
/// Its `Display` output is the line the interactive front end prints, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A blank line; nothing happened.
    Nothing,
    /// An expression was evaluated (and stored in `ans`).
    Value(Number),
    /// A variable was assigned.
    Assigned {
        /// Name of the variable.
        name:  String,
        /// Its new value.
        value: Number,
    },
    /// A function was defined.
    Defined {
        /// The signature, e.g. `sum(x,y)`.
        signature: String,
        /// The body.
        body:      Expr,
    },
    /// A variable, or a function given as `name(arity)`, was deleted.
    Deleted(String),
    /// The context was cleared.
    Cleared,
    /// The dump of the context was requested.
    Context(String),
    /// The help text was requested.
    Help,
    /// The exit command was given.
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing | Self::Exit => Ok(()),
            Self::Value(value) => write!(f, "{value}"),
            Self::Assigned { name, value } => write!(f, "{name} is now {value}"),
            Self::Defined { signature, body } => write!(f, "{signature} is now defined as {body}"),
            Self::Deleted(name) => write!(f, "{name} has been deleted."),
            Self::Cleared => write!(f, "All non-readonly variables and functions have been deleted."),
            Self::Context(dump) => write!(f, "{dump}"),
            Self::Help => write!(f, "{HELP_TEXT}"),
        }
    }
}

/// A line-oriented interactive session over a [`Context`].
///
/// Each line is a command, an assignment, a deletion, a function definition
/// or an expression (see
/// [`parse_statement`](crate::interpreter::parser::statement::parse_statement)).
/// The session only uses the public operations of its context.
///
/// # Example
/// ```
/// use exprcalc::{interpreter::step::NoSteps, session::{Outcome, Session}};
///
/// let mut session = Session::new();
///
/// session.execute_line("square(a) = a^2", &mut NoSteps).unwrap();
/// let outcome = session.execute_line("square(3) + 1", &mut NoSteps).unwrap();
///
/// assert_eq!(outcome, Outcome::Value(10.into()));
/// assert_eq!(session.context().get_variable("ans").unwrap().to_string(), "10");
/// ```
#[derive(Debug)]
pub struct Session {
    context:       Context,
    commands:      HashMap<String, Command>,
    prompt:        String,
    help_verbose:  bool,
    stop_on_error: bool,
}

impl Session {
    /// Creates a session over a fresh [`Context`] with the default commands.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(Context::new())
    }

    /// Creates a session over `context` with the default commands.
    #[must_use]
    pub fn with_context(context: Context) -> Self {
        let mut session = Self { context,
                                 commands: HashMap::new(),
                                 prompt: String::new(),
                                 help_verbose: false,
                                 stop_on_error: false };
        session.set_default_commands();
        session
    }

    /// Changes the words recognized as commands. The words become reserved
    /// and can no longer be used as symbol names.
    pub fn set_commands(&mut self, context: &str, clear: &str, help: &str, exit: &str) {
        self.commands = HashMap::from([(context.to_string(), Command::Context),
                                       (clear.to_string(), Command::Clear),
                                       (help.to_string(), Command::Help),
                                       (exit.to_string(), Command::Exit)]);
    }

    /// Restores the commands `context`, `clear`, `help` and `exit`.
    pub fn set_default_commands(&mut self) {
        self.set_commands("context", "clear", "help", "exit");
    }

    /// The context statements are executed in.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable access to the context, e.g. to change its precision.
    pub const fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Sets the text written before reading each line. Empty disables it.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Sends the help text to the verbose writer instead of the output one.
    pub const fn set_help_verbose(&mut self, value: bool) {
        self.help_verbose = value;
    }

    /// Makes [`Session::run`] return at the first failing statement.
    pub const fn set_stop_on_error(&mut self, value: bool) {
        self.stop_on_error = value;
    }

    /// Parses and executes one line.
    ///
    /// Parse and evaluation steps go to `log`.
    ///
    /// # Errors
    /// Any [`SessionError`]. A failed statement leaves the context as it was.
    pub fn execute_line(&mut self, line: &str, log: &mut dyn StepSink)
                        -> Result<Outcome, SessionError> {
        if line.trim().is_empty() {
            return Ok(Outcome::Nothing);
        }
        let statement = parse_statement(line, &self.commands, log)?;
        self.execute(statement, log)
    }

    /// Executes an already parsed statement.
    ///
    /// # Errors
    /// Evaluation and context errors of the statement.
    pub fn execute(&mut self, statement: Statement, log: &mut dyn StepSink)
                   -> Result<Outcome, SessionError> {
        match statement {
            Statement::Command(Command::Context) => Ok(Outcome::Context(self.context.to_string())),
            Statement::Command(Command::Clear) => {
                self.context.clear();
                Ok(Outcome::Cleared)
            },
            Statement::Command(Command::Help) => Ok(Outcome::Help),
            Statement::Command(Command::Exit) => Ok(Outcome::Exit),
            Statement::Expression(expr) => {
                Ok(Outcome::Value(self.context.evaluate_and_store(&expr, log)?))
            },
            Statement::AssignVariable { name, value, readonly } => {
                let value = self.context.evaluate(&value, log)?;
                self.context.set_variable(&name, value.clone(), readonly)?;
                Ok(Outcome::Assigned { name, value })
            },
            Statement::DeleteVariable { name } => {
                self.context.delete_variable(&name)?;
                Ok(Outcome::Deleted(name))
            },
            Statement::DefineFunction { name,
                                        params,
                                        body,
                                        readonly, } => {
                let signature = format!("{name}({})", params.join(","));
                self.context
                    .define_function(&name, params, body.clone(), readonly)?;
                Ok(Outcome::Defined { signature, body })
            },
            Statement::DeleteFunction { name, arity } => {
                self.context.delete_function(&name, arity)?;
                Ok(Outcome::Deleted(format!("{name}({arity})")))
            },
        }
    }

    /// Reads lines from `input` and executes them until the input ends, the
    /// exit command is read or, with stop-on-error set, a statement fails.
    ///
    /// Values, the context dump and (unless help is verbose) the help text go
    /// to `out`; steps and confirmations go to `verbose`; error messages go to
    /// `err`.
    ///
    /// # Errors
    /// Only I/O errors of the reader or the writers.
    ///
    /// # Example
    /// ```
    /// use exprcalc::session::{Session, Status};
    ///
    /// let mut session = Session::new();
    /// let (mut out, mut verbose, mut err) = (Vec::new(), Vec::new(), Vec::new());
    ///
    /// let status = session.run("x=2\nx*3\nexit\n4".as_bytes(), &mut out, &mut verbose, &mut err)
    ///                     .unwrap();
    ///
    /// assert_eq!(status, Status::Exit);
    /// assert_eq!(String::from_utf8(out).unwrap(), "6\n");
    /// ```
    pub fn run<R: BufRead>(&mut self,
                           input: R,
                           out: &mut dyn Write,
                           verbose: &mut dyn Write,
                           err: &mut dyn Write)
                           -> io::Result<Status> {
        let mut lines = input.lines();
        loop {
            if !self.prompt.is_empty() {
                write!(out, "{}", self.prompt)?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                return Ok(Status::InputEnd);
            };
            let line = line?;

            let result = {
                let mut sink = WriterSink(&mut *verbose);
                self.execute_line(&line, &mut sink)
            };
            match result {
                Ok(Outcome::Exit) => return Ok(Status::Exit),
                Ok(Outcome::Nothing) => {},
                Ok(outcome @ (Outcome::Value(_) | Outcome::Context(_))) => {
                    writeln!(out, "{outcome}")?;
                },
                Ok(Outcome::Help) if !self.help_verbose => writeln!(out, "{}", Outcome::Help)?,
                Ok(outcome) => writeln!(verbose, "{outcome}")?,
                Err(e) => {
                    tracing::debug!(line, error = %e, "statement failed");
                    writeln!(err, "{e}")?;
                    if self.stop_on_error {
                        return Ok(Status::Error);
                    }
                },
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
