//! `nodal` command line: evaluate snippets or start the REPL.

use std::env;
use std::error::Error;
use std::process::ExitCode;

use nodal_runtime::{Repl, Session};
use tracing::Level;

/// What the command line asked for.
#[derive(Debug, Default)]
struct Options {
    snippets: Vec<String>,
    verbosity: u8,
    quiet: bool,
    help: bool,
    version: bool,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "-V" | "--version" => options.version = true,
                "-q" | "--quiet" => options.quiet = true,
                "-v" => options.verbosity = options.verbosity.max(1),
                "-vv" => options.verbosity = 2,
                "-e" | "--eval" => match args.next() {
                    Some(code) => options.snippets.push(code),
                    None => return Err(format!("{arg} expects source code")),
                },
                unknown => return Err(format!("unrecognized argument '{unknown}'")),
            }
        }
        Ok(options)
    }

    fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let result = Options::parse(env::args().skip(1))
        .map_err(Into::into)
        .and_then(run);
    if let Err(e) = result {
        eprintln!("\x1b[31mnodal: {e}\x1b[0m");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    if options.help {
        print!("{USAGE}");
        return Ok(());
    }
    if options.version {
        println!("nodal {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_max_level(options.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if options.snippets.is_empty() {
        let repl = Repl::new()?;
        let mut repl = if options.quiet { repl.without_banner() } else { repl };
        repl.run()?;
        return Ok(());
    }

    let mut session = Session::new()?;
    for code in &options.snippets {
        for value in session.eval(code)? {
            println!("{value}");
        }
    }
    Ok(())
}

const USAGE: &str = "\
\x1b[1mnodal\x1b[0m - expressions compiled into a live dataflow graph

\x1b[1mUsage:\x1b[0m nodal [-q] [-v|-vv] [-e CODE]...

\x1b[1mOptions:\x1b[0m
    -e, --eval CODE    Evaluate CODE and print each instruction's value
                       (repeatable; later snippets see earlier variables)
    -q, --quiet        Start the REPL without the banner
    -v, -vv            Log at debug or trace level to stderr
    -h, --help         Show this message
    -V, --version      Show the version

\x1b[1mExamples:\x1b[0m
    nodal -e \"a = 3; a * a\"      prints 3 and 9
    nodal -vv -e \"sin(0) + 1\"    shows the parser's trace

Inside the REPL, :help lists the meta commands and Ctrl+D exits.
";
