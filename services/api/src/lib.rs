mod analyze;
mod cli;
mod infra;
mod routes;
mod server;

use rental_eval::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
