mod cli;
mod infra;
mod routes;
mod server;

use hsa_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
