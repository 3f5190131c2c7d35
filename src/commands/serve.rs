use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time;

use crate::cli::ServeArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::presence::{self, POLL_INTERVAL, SystemProbe};
use crate::safety;
use crate::server::HttpServer;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

pub async fn run(ctx: Arc<AppContext>, args: ServeArgs) -> AppResult<()> {
    if ctx.persist_initial_settings()? {
        tracing::debug!(path = %ctx.paths.settings_file().display(), "wrote initial config");
    }

    let report = safety::ensure_protection(ctx.game_save_path().as_deref(), ctx.profiles_root())?;
    if report.first_run {
        tracing::debug!(?report, "first run protection complete");
    }

    let port = ctx.port();
    let server = HttpServer::bind(&format!("127.0.0.1:{port}"))?;
    let url = format!("http://localhost:{port}");
    tracing::info!("CyberSaver running at {url}");

    let monitor = tokio::spawn(presence::run_monitor(
        Arc::clone(&ctx.presence),
        SystemProbe,
        POLL_INTERVAL,
        presence::log_change,
    ));

    if !args.no_browser && !open_browser(&url) {
        tracing::info!("open {url} in your browser");
    }

    let unblocker = server.unblocker();
    let runtime = Handle::current();
    let serving = tokio::task::spawn_blocking(move || server.serve(ctx, runtime));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    unblocker.unblock();
    monitor.abort();

    match time::timeout(SHUTDOWN_TIMEOUT, serving).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!("server task failed: {err}"),
        Err(_) => tracing::warn!("server did not stop within {SHUTDOWN_TIMEOUT:?}"),
    }

    Ok(())
}

fn open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        return std::process::Command::new("open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }

    #[cfg(target_os = "linux")]
    {
        return std::process::Command::new("xdg-open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }

    #[cfg(target_os = "windows")]
    {
        return std::process::Command::new("rundll32")
            .args(["url.dll,FileProtocolHandler", url])
            .spawn()
            .is_ok();
    }

    #[allow(unreachable_code)]
    false
}
