use clap::Parser;
use log::error;
use nesheader::Outcome;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod walk;

/// Create .unh equivalents of .nes files. Processes files in directory if
/// one is specified.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also process .nes files in subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// A ROM file, or a directory holding .nes files.
    input_path: PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    created: usize,
    unheadered: usize,
    existing: usize,
    failed: usize,
}

fn report(path: &Path, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created(out) => format!("{}: created {}", path.display(), out.display()),
        Outcome::AlreadyUnheadered => format!("{}: already unheadered", path.display()),
        Outcome::CopyExists(out) => format!(
            "{}: unheadered copy already exists at {}",
            path.display(),
            out.display()
        ),
    }
}

fn process<I>(paths: I, out: &mut impl Write) -> Summary
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut summary = Summary::default();
    for path in paths {
        match nesheader::process_file(&path) {
            Ok(outcome) => {
                if let Err(e) = writeln!(out, "{}", report(&path, &outcome)) {
                    error!("{}: could not report outcome: {}", path.display(), e);
                }
                match outcome {
                    Outcome::Created(_) => summary.created += 1,
                    Outcome::AlreadyUnheadered => summary.unheadered += 1,
                    Outcome::CopyExists(_) => summary.existing += 1,
                }
            },
            Err(e) => {
                error!("{}", e);
                summary.failed += 1;
            },
        }
    }
    summary
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Summary> {
    let input = &cli.input_path;
    if input.is_dir() {
        Ok(process(walk::candidates(input, cli.recursive)?, out))
    } else if cli.recursive {
        eprintln!("Only directories can be recursed");
        Ok(Summary::default())
    } else {
        Ok(process([input.clone()], out))
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let summary = run(&cli, &mut io::stdout().lock())?;
    log::debug!("{:?}", summary);

    if summary.failed > 0 {
        error!("{} file(s) could not be processed", summary.failed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
