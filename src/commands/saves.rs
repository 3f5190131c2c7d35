use crate::cli::ProfileArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::output::OutputMode;
use crate::profiles::require_name;
use crate::saves::SaveInfo;

pub async fn run(ctx: &AppContext, args: ProfileArgs) -> AppResult<()> {
    let profile = require_name(&args.name, "profile")?;
    if !ctx.store.exists(&profile) {
        return Err(AppError::NotFound(format!("profile `{profile}` not found")));
    }

    let saves = ctx.store.list_saves(&profile, &ctx.quests);
    if ctx.output.mode() == OutputMode::Text && saves.is_empty() {
        println!("0 saves");
        return Ok(());
    }

    let lines = saves.iter().map(describe).collect::<Vec<_>>();
    ctx.output.emit_lines(&lines, &saves)
}

fn describe(save: &SaveInfo) -> String {
    let mut line = format!("{} [{}] {}", save.name, save.kind.as_str(), save.modified);
    for detail in [&save.level, &save.playtime] {
        if !detail.is_empty() {
            line.push_str(" | ");
            line.push_str(detail);
        }
    }

    let quest = if save.quest_title.is_empty() {
        &save.quest
    } else {
        &save.quest_title
    };
    if !quest.is_empty() {
        line.push_str(" | ");
        line.push_str(quest);
    }
    line
}
