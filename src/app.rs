use std::sync::Arc;

use crate::cli::{Cli, Command, ServeArgs};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let overrides = cli.overrides();
    let Cli {
        json,
        verbose,
        command,
        ..
    } = cli;

    let ctx = AppContext::bootstrap(overrides, json, verbose)?;

    match command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => commands::serve::run(Arc::new(ctx), args).await,
        Command::Status => commands::status::run(&ctx).await,
        Command::Profiles => commands::profiles::run(&ctx).await,
        Command::Saves(args) => commands::saves::run(&ctx, args).await,
        Command::Load(args) => commands::switch::load(&ctx, args).await,
        Command::Import(args) => commands::switch::import(&ctx, args).await,
    }
}
