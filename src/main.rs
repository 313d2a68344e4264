use derivcalc::*;
use std::io::BufRead;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Differentiate a single-variable function such as 3x^2+5x-7.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Function to differentiate. Read from standard input if not given.
    function: Option<String>,

    /// Order of the derivative.
    #[arg(long, default_value_t = 1)]
    order: usize,

    /// Also print the function and its derivative evaluated at this value. May be repeated.
    #[arg(long, allow_negative_numbers = true)]
    at: Vec<f64>,

    /// Evaluate an arithmetic expression instead (`_` before a number negates it).
    #[arg(long, conflicts_with = "function")]
    eval: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// The first whitespace-delimited token on the first line, without waiting for the rest of the input
fn read_function<R: BufRead>(input: R) -> Result<String> {
    let line = match input.lines().next() {
        Some(line) => line.context("reading function")?,
        None => String::new(),
    };
    Ok(line.split_whitespace().next().unwrap_or_default().to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(expr) = args.eval {
        let value = evaluate(&expr).with_context(|| format!("evaluating {}", expr))?;
        println!("{}", value);
        return Ok(())
    }

    let text = match args.function {
        Some(text) => text,
        None => read_function(std::io::stdin().lock())?,
    };
    let function = Function::new(&text);
    let derivative = Function::from(differentiate_n(function.expression().clone(), args.order));
    let primes = "'".repeat(args.order);
    if args.order == 1 {
        println!("Derivative of f(x): {}", derivative);
    } else {
        println!("Derivative {} of f(x): {}", args.order, derivative);
    }
    for x in args.at {
        println!("f({}) = {}", x, function.solve(x));
        println!("f{}({}) = {}", primes, x, derivative.solve(x));
    }
    Ok(())
}
