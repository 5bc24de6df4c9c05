use crate::server;
use crate::urla::{print_schema, validate_file, ValidateArgs};
use clap::{Args, Parser, Subcommand};
use loan_origination::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "loan-origination-api",
    about = "Run the loan origination service or check URLA documents from the command line",
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
    /// Work with URLA 2021 application documents
    Urla {
        #[command(subcommand)]
        command: UrlaCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UrlaCommand {
    /// Validate a JSON document and print its violations or financial summary
    Validate(ValidateArgs),
    /// Print the JSON Schema for URLA 2021 v1 documents
    Schema,
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
        Command::Urla {
            command: UrlaCommand::Validate(args),
        } => validate_file(args),
        Command::Urla {
            command: UrlaCommand::Schema,
        } => print_schema(),
    }
}
