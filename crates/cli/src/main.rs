// samplegrid CLI - anonymized sample grid extraction

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use exit_codes::{EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use samplegrid_engine::registry::IdentityRegistry;
use samplegrid_engine::view::render;
use samplegrid_io::xlsx;

#[derive(Parser)]
#[command(name = "samplegrid")]
#[command(about = "Materialize a position-token sheet into an anonymized, cross-referenced grid workbook")]
#[command(version)]
#[command(after_help = "\
Reads the first sheet of INPUT, where each cell holds a 'row;column;identifier'
token, and writes OUTPUT with three sheets: Grid (raw identifiers plus unscored
placeholders), List (anonymized labels with score references), and AnonGrid
(labels only, scores referenced from Grid). Malformed tokens are reported on
stderr and skipped.")]
#[derive(Debug)]
struct Cli {
    /// Input workbook holding position tokens on its first sheet
    input: PathBuf,

    /// Output workbook to create (Grid, List, AnonGrid sheets)
    output: PathBuf,

    /// Suppress informational output (stderr parse errors still shown)
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap prints its own usage/help text; help and version go to
            // stdout and exit 0, real usage errors go to stderr and exit 2
            let _ = e.print();
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let (grid, import_result) = xlsx::import(&cli.input).map_err(|e| {
        CliError::io(e).with_hint("input must be an xlsx/ods workbook of 'row;column;identifier' tokens")
    })?;

    for error in &import_result.parse_errors {
        eprintln!("{}", error);
    }
    if import_result.tokens_failed > import_result.parse_errors.len() {
        eprintln!(
            "... and {} more parse errors",
            import_result.tokens_failed - import_result.parse_errors.len()
        );
    }

    if !cli.quiet {
        println!(
            "Read {} rows x {} columns from {}",
            import_result.num_rows,
            import_result.num_cols,
            cli.input.display()
        );
        if import_result.overwrites > 0 {
            println!(
                "Note: {} cells were specified more than once (last token wins)",
                import_result.overwrites
            );
        }
    }

    let registry = IdentityRegistry::from_grid(&grid);
    let rendered = render(&grid, &registry);

    if !cli.quiet {
        println!("Found {} unique sample ids.", registry.len());
    }

    let export_result = xlsx::export(&rendered, &cli.output).map_err(CliError::io)?;

    if !cli.quiet {
        println!(
            "Wrote {} to {}",
            export_result.summary(),
            cli.output.display()
        );
    }

    Ok(())
}
