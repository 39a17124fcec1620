use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum, error::ErrorKind};
use cloudposser::Error;

const USAGE: &str = "Usage: json_to_cloudposse.py <path_to_json_file>";

/// Converts an AWS IAM policy document into the `iam_policy` input of the
/// cloudposse/iam-policy Terraform module.
#[derive(Parser, Debug)]
#[command(name = "json_to_cloudposse")]
#[command(version, about)]
struct Cli {
  /// IAM policy document to convert
  #[arg(value_name = "path_to_json_file")]
  path: PathBuf,

  /// Output format
  #[arg(short = 'f', long = "format", value_enum, default_value_t)]
  format: OutputFormat,

  /// Enable debug logging on standard error
  #[arg(long = "verbose")]
  verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
  #[default]
  Hcl,
  Json,
}

fn run(cli: &Cli) -> Result<String, Error> {
  let policy = cloudposser::load(&cli.path)?;

  match cli.format {
    OutputFormat::Hcl => policy.render(),
    OutputFormat::Json => policy.to_json(),
  }
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      let _ = err.print();
      return ExitCode::SUCCESS;
    }
    Err(_) => {
      println!("{USAGE}");
      return ExitCode::FAILURE;
    }
  };

  let level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

  match run(&cli) {
    Ok(output) => {
      println!("{output}");
      ExitCode::SUCCESS
    }
    Err(err) => {
      log::debug!("conversion of {} failed: {err:?}", cli.path.display());
      println!("Error: {err}");
      ExitCode::FAILURE
    }
  }
}
