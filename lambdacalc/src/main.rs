use std::path::{Path, PathBuf};

use anyhow::Result;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use clap::Parser;
use lambdacalc::{Config, Error, ParseError, Session};
use tracing_subscriber::EnvFilter;
use util::repl::{self, Flow};

#[derive(Parser)]
#[command(name = "lambdacalc", version)]
#[command(about = "Untyped lambda calculus calculator", long_about = None)]
struct Args {
    /// Script to run before the prompt
    #[arg(short = 'f', long = "load", value_name = "FILE")]
    load: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Seed for hygiene suffixes
    #[arg(long)]
    seed: Option<u64>,

    /// Where to keep the line history
    #[arg(long, value_name = "FILE", default_value = "/tmp/lambdacalc.history")]
    history: PathBuf,
}

fn build_report(e: &ParseError) -> Report {
    let span = e.span();
    let message = e.to_string();
    let label = match e {
        ParseError::Unclosed(_) => format!("Unclosed delimiter {}", "(".fg(Color::Yellow)),
        ParseError::Unexpected { found, .. } => format!("Unexpected {}", found.fg(Color::Red)),
        _ => format!("{}", message.as_str().fg(Color::Red)),
    };
    let color = match e {
        ParseError::Unclosed(_) => Color::Yellow,
        _ => Color::Red,
    };
    Report::build(ReportKind::Error, (), span.start)
        .with_message(message)
        .with_label(Label::new(span).with_message(label).with_color(color))
        .finish()
}

fn report(e: &Error, input: &str) -> Result<()> {
    match e {
        Error::Parse(e) => build_report(e).eprint(Source::from(input))?,
        Error::Script {
            path,
            line,
            text,
            source,
        } => {
            eprintln!("In {}:{line}:", path.display());
            report(source, text)?;
        }
        e => eprintln!("Error: {e}"),
    }
    Ok(())
}

struct Lambda {
    session: Session,
    history: PathBuf,
}

impl repl::Repl for Lambda {
    type Error = anyhow::Error;
    const PROMPT: &'static str = "λ> ";
    fn history(&self) -> Option<&Path> {
        Some(&self.history)
    }
    fn evaluate(&mut self, input: String) -> Result<Flow, Self::Error> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }
        if input == "exit" {
            println!("Bye!");
            return Ok(Flow::Exit);
        }
        match self.session.execute(input) {
            Ok(Some(term)) => println!("{term}"),
            Ok(None) => {}
            Err(e) => report(&e, input)?,
        }
        Ok(Flow::Continue)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new(Config {
        seed: args.seed,
        ..Config::default()
    });
    if let Some(path) = &args.load {
        if let Err(e) = session.load(path) {
            report(&e, "")?;
        }
    }

    println!("Hi, this is an untyped lambda calculus REPL. `exit` to quit");
    println!();
    repl::start_repl(Lambda {
        session,
        history: args.history,
    })?;
    Ok(())
}
