use crate::pipeline::{run_discover, run_pipeline, DiscoverArgs, PipelineArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_intel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Intelligence",
    about = "Score, qualify and discover B2B leads from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Match, score and qualify a single lead described in a JSON request file
    Pipeline(PipelineArgs),
    /// Merge candidate pools into a ranking of companies similar to a target
    Discover(DiscoverArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pipeline(args) => run_pipeline(args),
        Command::Discover(args) => run_discover(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["lead-intel-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn discover_accepts_apollo_export() {
        let cli = Cli::try_parse_from([
            "lead-intel-api",
            "discover",
            "--request",
            "target.json",
            "--apollo-csv",
            "companies.csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Discover(args)) => {
                assert_eq!(args.request.to_str(), Some("target.json"));
                assert_eq!(
                    args.apollo_csv.as_deref().and_then(|path| path.to_str()),
                    Some("companies.csv")
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pipeline_requires_a_request_file() {
        assert!(Cli::try_parse_from(["lead-intel-api", "pipeline"]).is_err());
    }
}
