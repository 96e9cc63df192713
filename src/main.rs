use clap::error::ErrorKind;
use clap::Parser;
use flowrun::app::{handle_fatal_error, init_logging, run_flow, AppConfig};
use flowrun::config::ConfigLoader;
use flowrun::flow::{render_value, InvocationRequest, StdoutEmitter};
use std::path::PathBuf;

/// Run a flow module's entry point
#[derive(Parser, Debug)]
#[command(name = "flowrun", version)]
#[command(about = "Load a flow from the flows directory and run its executor", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory flow paths resolve against, relative to the working directory
    #[arg(long, value_name = "DIR")]
    flows_dir: Option<PathBuf>,

    /// Flow file, relative to the flows directory
    #[arg(value_name = "FILE_PATH")]
    file_path: PathBuf,

    /// Argument for the flow, decoded as JSON when possible and passed as text otherwise
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    arg: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = parse_cli();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        handle_fatal_error(e, verbose);
    }
}

/// Parse arguments; usage errors print clap's usage text and exit 1
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = AppConfig::new(cli.verbose)?;

    let mut runner = ConfigLoader::new(&app.working_dir).load().await?;
    if let Some(dir) = cli.flows_dir {
        runner.flows_dir = dir;
    }

    init_logging(&app, runner.log_level.as_deref());

    let request = InvocationRequest::new(cli.file_path, cli.arg);
    if let Some(value) = run_flow(&app, &runner, &request, &StdoutEmitter).await? {
        println!("Result: {}", render_value(&value));
    }

    Ok(())
}
