mod cli;
mod infra;
mod middleware;
mod routes;
mod server;
mod urla;

use loan_origination::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
