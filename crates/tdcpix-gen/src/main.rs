//! Command-line generator and inspector for TDCpix chunk files.

mod generate;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate and inspect TDCpix chunk files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write randomized chunks of data words, each closed by a frame word
    Generate(generate::GenerateArgs),
    /// Decode a chunk file and print a summary or its pixel view
    Inspect(inspect::InspectArgs),
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Generate(args) => generate::run(&args),
        Command::Inspect(args) => inspect::run(&args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so `--output -` keeps stdout clean.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["tdcpix-gen", "generate"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.config();
        assert_eq!(config.num_chunks, 10);
        assert_eq!(config.data_words_per_chunk, 254);
        assert_eq!(config.pileup_odds, 333);
        assert_eq!(config.seed, None);
        assert_eq!(args.output.to_str(), Some("chunky_chunk.txt"));
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "tdcpix-gen",
            "generate",
            "--chunks",
            "3",
            "--data-words",
            "5",
            "--seed",
            "42",
            "--output",
            "-",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.config();
        assert_eq!(config.num_chunks, 3);
        assert_eq!(config.data_words_per_chunk, 5);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from(["tdcpix-gen", "inspect", "out.txt", "--json"]).unwrap();
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert!(args.json);
        assert_eq!(args.path.to_str(), Some("out.txt"));
    }

    #[test]
    fn test_parse_inspect_chunk() {
        let cli = Cli::try_parse_from(["tdcpix-gen", "inspect", "-", "--chunk", "3"]).unwrap();
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.chunk, Some(3));
        assert!(!args.json);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
