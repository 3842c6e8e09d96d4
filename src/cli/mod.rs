// src/cli/mod.rs — CLI definition (clap derive)

pub mod doctor;
pub mod models;
pub mod progress;
pub mod run;

use clap::{Parser, Subcommand};

use crate::studio::types::{MAX_CREATIVITY, MAX_ITERATIONS, MIN_CREATIVITY, MIN_ITERATIONS};

#[derive(Parser, Debug)]
#[command(
    name = "promptstudio",
    about = "Generate, test, score, refine and document prompt variants",
    version
)]
pub struct Cli {
    /// Rough prompt idea (runs the studio when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    pub idea: Vec<String>,

    /// Model used to test the variants (OpenRouter model id)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Pick the model interactively from the catalog
    #[arg(long)]
    pub select_model: bool,

    /// Creativity level 1-10 (higher means more novel prompts)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(MIN_CREATIVITY as i64..=MAX_CREATIVITY as i64))]
    pub creativity: Option<u8>,

    /// Test runs per variant (1-3)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(MIN_ITERATIONS as i64..=MAX_ITERATIONS as i64))]
    pub iterations: Option<u8>,

    /// Where to write the report (defaults to a timestamped file in the current directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Do not write a report file
    #[arg(long, conflicts_with = "output")]
    pub no_report: bool,

    /// Suppress progress output (only print results)
    #[arg(short, long)]
    pub quiet: bool,

    /// Read the rough idea from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Serve the web UI
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the models offered in the model selector
    Models,
    /// Check configuration and the API key
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idea_and_flags() {
        let cli = Cli::try_parse_from([
            "promptstudio",
            "-c",
            "8",
            "-i",
            "2",
            "Write",
            "a",
            "blog",
        ])
        .unwrap();
        assert_eq!(cli.idea.join(" "), "Write a blog");
        assert_eq!(cli.creativity, Some(8));
        assert_eq!(cli.iterations, Some(2));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_out_of_range_iterations() {
        assert!(Cli::try_parse_from(["promptstudio", "-i", "4", "idea"]).is_err());
        assert!(Cli::try_parse_from(["promptstudio", "-c", "0", "idea"]).is_err());
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["promptstudio", "serve", "--port", "9000"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Serve {
                host: None,
                port: Some(9000)
            })
        );
    }

    #[test]
    fn test_output_conflicts_with_no_report() {
        assert!(
            Cli::try_parse_from(["promptstudio", "--no-report", "-o", "r.txt", "idea"]).is_err()
        );
    }
}
