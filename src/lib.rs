pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod junction;
pub mod logging;
pub mod output;
pub mod presence;
pub mod profiles;
pub mod safety;
pub mod saves;
pub mod server;

use cli::Cli;
use error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    app::run(cli).await
}
