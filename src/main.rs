use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

use bigdecimal::RoundingMode;
use clap::{Parser, ValueEnum};
use exprcalc::{
    error::Error,
    interpreter::{
        step::WriterSink,
        value::precision::{DECIMAL64_DIGITS, DEFAULT_MAX_EXPONENT, Precision},
    },
    session::{Outcome, Session, Status},
};
use tracing_subscriber::EnvFilter;

/// exprcalc evaluates arithmetic expressions with arbitrary-precision
/// decimals, variables and user-defined functions.
///
/// Without an expression or a file, statements are read from standard input.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells exprcalc to read statements from a file instead of stdin.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Prints every parsing and evaluation step.
    #[arg(short, long)]
    verbose: bool,

    /// Number of significant digits kept after every operation.
    #[arg(short, long, default_value_t = DECIMAL64_DIGITS,
          value_parser = clap::value_parser!(u64).range(1..))]
    precision: u64,

    /// Rounding mode used to drop extra digits.
    #[arg(short, long, value_enum, default_value_t = Rounding::HalfEven)]
    rounding: Rounding,

    /// Largest decimal exponent, positive or negative, a result may have.
    #[arg(long, value_name = "EXP", default_value_t = DEFAULT_MAX_EXPONENT)]
    max_exponent: u64,

    /// Stops at the first failing statement and exits with an error.
    #[arg(long)]
    stop_on_error: bool,

    /// Text printed before reading each line from stdin.
    #[arg(long, default_value = "> ")]
    prompt: String,

    /// A single statement to execute instead of reading input.
    expression: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rounding {
    Up,
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    HalfEven,
}

impl From<Rounding> for RoundingMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Up => Self::Up,
            Rounding::Down => Self::Down,
            Rounding::Ceiling => Self::Ceiling,
            Rounding::Floor => Self::Floor,
            Rounding::HalfUp => Self::HalfUp,
            Rounding::HalfDown => Self::HalfDown,
            Rounding::HalfEven => Self::HalfEven,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the session described by `args`. Returns `false` when a statement
/// failed in a mode that reports failures through the exit code.
fn run(args: Args) -> Result<bool, Error> {
    let precision = Precision::new(args.precision, args.rounding.into())
                        .ok_or(Error::InvalidPrecision)?
                        .with_max_exponent(args.max_exponent);

    let mut session = Session::new();
    session.context_mut().set_precision(precision);
    session.set_stop_on_error(args.stop_on_error);

    let mut stdout = io::stdout().lock();
    let mut verbose: Box<dyn Write> = if args.verbose {
        Box::new(io::stdout())
    } else {
        Box::new(io::sink())
    };

    if let Some(expression) = args.expression {
        let mut log = WriterSink(&mut *verbose);
        return match session.execute_line(&expression, &mut log)? {
            Outcome::Nothing | Outcome::Exit => Ok(true),
            outcome => {
                writeln!(stdout, "{outcome}")?;
                Ok(true)
            },
        };
    }

    let mut stderr = io::stderr();
    let status = match args.file {
        Some(path) => {
            let reader = BufReader::new(File::open(&path)?);
            session.run(reader, &mut stdout, &mut *verbose, &mut stderr)?
        },
        None => {
            session.set_prompt(args.prompt);
            session.run(io::stdin().lock(), &mut stdout, &mut *verbose, &mut stderr)?
        },
    };

    tracing::debug!(?status, "session finished");
    Ok(status != Status::Error)
}
