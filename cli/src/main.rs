mod test_runner;

use std::path::Path;
use std::process;
use std::sync::Once;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use matcher::MatchExpression;
use shape::ParseError;

#[derive(Parser)]
#[command(name = "shape", version, about = "Structural pattern matcher")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a match expression against a value
    Eval(EvalArgs),

    /// Parse a match expression and print it back
    Check(CheckArgs),

    /// Run .test.shape files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct EvalArgs {
    /// Match expression, e.g. '[#0] | [] => false'
    expression: String,

    /// Value to match, e.g. '[1, 2, 3]'
    value: String,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Match expression to parse
    expression: String,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.shape file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set, e.g. `RUST_LOG=matcher=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Eval(args) => do_eval(args, cli.no_color),
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &args.category);
            process::exit(exit_code);
        }
    }
}

/// Source files shown in diagnostics: the expression and the value operand.
struct Sources {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
}

impl Sources {
    fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Sources {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color_choice),
        }
    }

    fn add(&mut self, name: &str, source: &str) -> usize {
        self.files.add(name.to_string(), source.to_string())
    }

    fn emit(&self, error: &ParseError) {
        let config = term::Config::default();
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut self.writer.lock(), &config, &self.files, &diagnostic);
    }
}

/// Parse `text` into an expression, emitting parse warnings as diagnostics
/// when `lint` is set.
fn parse_expression(sources: &mut Sources, text: &str, lint: bool) -> MatchExpression {
    let file_id = sources.add("<expression>", text);
    let chain = match shape::Parser::new(text.to_string(), file_id).parse() {
        Ok(chain) => chain,
        Err(error) => {
            sources.emit(&error);
            process::exit(1);
        }
    };
    if lint {
        for warning in chain.warnings() {
            sources.emit(&warning);
        }
    }
    match MatchExpression::from_chain(chain) {
        Some(expression) => expression,
        None => {
            eprintln!("error: expression has no alternatives");
            process::exit(1);
        }
    }
}

fn do_eval(args: EvalArgs, no_color: bool) {
    let mut sources = Sources::new(no_color);
    let expression = parse_expression(&mut sources, &args.expression, false);

    let file_id = sources.add("<value>", &args.value);
    let value = match shape::Parser::new(args.value.clone(), file_id).parse_value() {
        Ok(value) => value,
        Err(error) => {
            sources.emit(&error);
            process::exit(1);
        }
    };

    match expression.evaluate(&value) {
        Ok(evaluation) => println!("{}", evaluation),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let mut sources = Sources::new(no_color);
    let expression = parse_expression(&mut sources, &args.expression, true);
    println!("{}", expression);
}
