use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grant_flow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Grant Flow",
    about = "Run the grant application lifecycle service or replay the reference scenario",
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
    /// Walk one application from submission to decision and print each status
    Demo(DemoArgs),
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
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_flags_parse() {
        let cli = Cli::try_parse_from([
            "grant-flow-api",
            "demo",
            "--withdraw",
            "--status",
            "REJECTED",
        ])
        .expect("arguments parse");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert!(args.withdraw);
                assert_eq!(args.status, "REJECTED");
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["grant-flow-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
