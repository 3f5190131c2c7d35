use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

pub const GAME_EXECUTABLE: &str = "Cyberpunk2077.exe";
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Whether the game process was seen on the last poll.
#[derive(Debug, Default)]
pub struct Presence {
    running: AtomicBool,
}

impl Presence {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stores `running` and reports whether it changed.
    pub fn update(&self, running: bool) -> bool {
        self.running.swap(running, Ordering::SeqCst) != running
    }
}

pub trait ProcessProbe: Send + Sync {
    fn is_running(&self, image_name: &str) -> impl Future<Output = bool> + Send;
}

/// Asks the OS process list. Any failure to run the tool counts as not running.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl ProcessProbe for SystemProbe {
    fn is_running(&self, image_name: &str) -> impl Future<Output = bool> + Send {
        let needle = image_name.to_lowercase();
        async move {
            match process_list(&needle).await {
                Some(listing) => listing.to_lowercase().contains(&needle),
                None => false,
            }
        }
    }
}

#[cfg(windows)]
async fn process_list(image_name: &str) -> Option<String> {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let output = Command::new("tasklist")
        .arg("/FI")
        .arg(format!("IMAGENAME eq {image_name}"))
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .await
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(not(windows))]
async fn process_list(_image_name: &str) -> Option<String> {
    let output = Command::new("ps")
        .args(["-A", "-o", "args="])
        .output()
        .await
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Probes once and notifies `on_change` only when the flag flips.
pub async fn poll_once<P, F>(presence: &Presence, probe: &P, image_name: &str, on_change: &F)
where
    P: ProcessProbe,
    F: Fn(bool),
{
    let running = probe.is_running(image_name).await;
    if presence.update(running) {
        on_change(running);
    }
}

/// Polls forever; the first probe runs immediately.
pub async fn run_monitor<P, F>(presence: Arc<Presence>, probe: P, period: Duration, on_change: F)
where
    P: ProcessProbe,
    F: Fn(bool),
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        poll_once(&presence, &probe, GAME_EXECUTABLE, &on_change).await;
    }
}

pub fn log_change(running: bool) {
    if running {
        tracing::info!("{GAME_EXECUTABLE} is running; profile switches are blocked");
    } else {
        tracing::info!("{GAME_EXECUTABLE} is not running; profile switches allowed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct ScriptedProbe {
        answers: Mutex<Vec<bool>>,
    }

    impl ProcessProbe for ScriptedProbe {
        fn is_running(&self, _image_name: &str) -> impl Future<Output = bool> + Send {
            let next = self
                .answers
                .lock()
                .map(|mut answers| answers.remove(0))
                .unwrap_or(false);
            async move { next }
        }
    }

    #[test]
    fn update_reports_only_changes() {
        let presence = Presence::default();
        assert!(!presence.update(false));
        assert!(presence.update(true));
        assert!(!presence.update(true));
        assert!(presence.is_running());
    }

    #[tokio::test]
    async fn notifies_on_transitions_only() {
        let presence = Presence::default();
        let probe = ScriptedProbe {
            answers: Mutex::new(vec![false, true, true, false]),
        };
        let seen = Mutex::new(Vec::new());
        let record = |running: bool| seen.lock().expect("lock").push(running);

        for _ in 0..4 {
            poll_once(&presence, &probe, GAME_EXECUTABLE, &record).await;
        }

        assert_eq!(*seen.lock().expect("lock"), vec![true, false]);
        assert!(!presence.is_running());
    }
}
