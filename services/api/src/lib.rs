mod cli;
mod infra;
mod pipeline;
mod routes;
mod server;

use lead_intel::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
