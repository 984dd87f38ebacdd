use coop_credit::error::AppError;

mod cli;
mod demo;
mod infra;
mod routes;
mod server;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
