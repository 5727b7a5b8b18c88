use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use csvhtml::page::RenderOptions;
use csvhtml::{ConvertOptions, format};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "CSVHTML_LOG";

/// csvhtml: turn a CSV file of unknown encoding and delimiter into a
/// self-contained HTML page with search, column filters and export.
#[derive(Parser)]
#[command(
    name = "csvhtml",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CSVHTML_BUILD_COMMIT"), ")"),
    about
)]
struct Cli {
    /// Input CSV file.
    input: Option<PathBuf>,

    /// Output HTML file. Defaults to the input path with `.html`.
    output: Option<PathBuf>,

    /// Page title. Defaults to "Data from <file name>".
    #[arg(short, long)]
    title: Option<String>,

    /// Escape HTML in cell values. By default values are inserted verbatim,
    /// which is only safe for trusted input.
    #[arg(long)]
    escape_html: bool,

    /// Don't write an error page when the input can't be parsed.
    #[arg(long)]
    no_error_page: bool,

    /// Machine-readable JSON summary.
    #[arg(long)]
    json: bool,

    /// Log parse attempts to stderr (overridden by CSVHTML_LOG).
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "csvhtml", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose);

    let Some(input) = cli.input else {
        let _ = Cli::command().print_help();
        return;
    };

    let options = ConvertOptions {
        render: RenderOptions {
            escape_html: cli.escape_html,
        },
        error_page: !cli.no_error_page,
    };

    match csvhtml::convert(
        &input,
        cli.output.as_deref(),
        cli.title.as_deref(),
        &options,
    ) {
        Ok(conversion) => {
            if cli.json {
                match serde_json::to_string_pretty(&conversion) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("json error: {e}");
                        process::exit(1);
                    }
                }
            } else {
                println!("{}", format::summary(&conversion));
            }
        }
        Err(e) => {
            if cli.json {
                let json = serde_json::json!({
                    "input": input,
                    "error": e.kind(),
                    "message": e.to_string(),
                });
                println!("{json}");
            } else {
                eprintln!("error [{}]: {e}", e.kind());
            }
            process::exit(e.exit_code());
        }
    }
}

/// stderr logging; `CSVHTML_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
