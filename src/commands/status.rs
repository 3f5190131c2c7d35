use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let state = ctx.state();

    let active = if state.active.is_empty() {
        "(none)"
    } else {
        state.active.as_str()
    };
    let game_path = if state.path_missing {
        "(missing)"
    } else {
        state.game_path.as_str()
    };

    let mut lines = vec![
        format!("active: {active}"),
        format!("game saves: {game_path}"),
        format!("profiles: {} in {}", state.profiles.len(), state.profiles_dir),
    ];
    if ctx.verbose > 0 {
        lines.push(format!("config: {}", ctx.paths.settings_file().display()));
        lines.push(format!("quest titles: {}", ctx.quests.len()));
    }
    ctx.output.emit_lines(&lines, &state)
}
