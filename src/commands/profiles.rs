use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let profiles = ctx.store.list_profiles();
    let active = ctx.active_profile();

    if profiles.is_empty() {
        return ctx.output.emit("0 profiles", &profiles);
    }

    let lines = profiles
        .iter()
        .map(|name| {
            let marker = if active.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            let note = ctx.store.read_note(name);
            if note.is_empty() {
                format!("{marker} {name}")
            } else {
                format!("{marker} {name}  ({})", first_line(&note))
            }
        })
        .collect::<Vec<_>>();

    ctx.output.emit_lines(&lines, &profiles)
}

fn first_line(note: &str) -> &str {
    note.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_preview_uses_first_line() {
        assert_eq!(first_line("boss fight\nbefore the heist"), "boss fight");
        assert_eq!(first_line(""), "");
    }
}
