use serde_json::json;

use crate::cli::ProfileArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::presence::{ProcessProbe, SystemProbe};
use crate::profiles::require_name;

pub async fn load(ctx: &AppContext, args: ProfileArgs) -> AppResult<()> {
    load_with(ctx, args, &SystemProbe).await
}

pub async fn import(ctx: &AppContext, args: ProfileArgs) -> AppResult<()> {
    import_with(ctx, args, &SystemProbe).await
}

async fn load_with<P: ProcessProbe>(ctx: &AppContext, args: ProfileArgs, probe: &P) -> AppResult<()> {
    let name = require_name(&args.name, "profile")?;
    ctx.refresh_presence(probe).await;
    let target = ctx.load_profile(&name)?;

    let text = format!("loaded {name} ({})", target.display());
    ctx.output
        .emit(&text, &json!({ "status": "loaded", "profile": name }))
}

async fn import_with<P: ProcessProbe>(ctx: &AppContext, args: ProfileArgs, probe: &P) -> AppResult<()> {
    let name = require_name(&args.name, "profile")?;
    ctx.refresh_presence(probe).await;
    let dest = ctx.import_profile(&name)?;

    let text = format!("imported current saves into {name} ({})", dest.display());
    ctx.output
        .emit(&text, &json!({ "status": "imported", "profile": name }))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::future::Future;
    use std::path::Path;

    use super::*;
    use crate::config::{AppPaths, Settings};
    use crate::context::Overrides;
    use crate::error::AppError;
    use crate::output::Output;

    struct FixedProbe(bool);

    impl ProcessProbe for FixedProbe {
        fn is_running(&self, _image_name: &str) -> impl Future<Output = bool> + Send {
            let running = self.0;
            async move { running }
        }
    }

    fn context(root: &Path) -> AppContext {
        let overrides = Overrides {
            port: None,
            game_path: Some(root.join("Cyberpunk 2077")),
            profiles_dir: Some(root.join("profiles")),
        };
        AppContext::from_parts(
            AppPaths::rooted_at(root),
            Settings::default(),
            overrides,
            Output::new(true),
            0,
        )
        .expect("context")
    }

    fn args(name: &str) -> ProfileArgs {
        ProfileArgs {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn load_refuses_while_game_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(dir.path());
        let game = dir.path().join("Cyberpunk 2077");
        fs::create_dir_all(&game).expect("mkdir");

        let err = load_with(&ctx, args("corpo"), &FixedProbe(true))
            .await
            .expect_err("load should be blocked");
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(ctx.presence.is_running());
        assert!(game.is_dir());
        assert!(!ctx.store.exists("corpo"));
    }

    #[tokio::test]
    async fn import_refuses_while_game_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(dir.path());
        fs::create_dir_all(dir.path().join("Cyberpunk 2077/AutoSave-0")).expect("mkdir");

        let err = import_with(&ctx, args("corpo"), &FixedProbe(true))
            .await
            .expect_err("import should be blocked");
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(!ctx.store.exists("corpo"));
    }

    #[tokio::test]
    async fn import_proceeds_once_game_exits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(dir.path());
        fs::create_dir_all(dir.path().join("Cyberpunk 2077/AutoSave-0")).expect("mkdir");
        ctx.presence.update(true);

        import_with(&ctx, args("corpo"), &FixedProbe(false))
            .await
            .expect("import");
        assert!(!ctx.presence.is_running());
        assert!(ctx.store.profile_dir("corpo").join("AutoSave-0").is_dir());
    }
}
