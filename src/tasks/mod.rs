//! Background jobs started once at boot.

use crate::config::UpdateConfig;
use crate::services::UpdateNotifier;

/// Spawn all background tasks.
///
/// The update check runs once at startup when enabled, then again every
/// `check_interval_secs` if that is set. Tasks are detached via
/// `tokio::spawn`; this function does not block.
pub fn spawn_all(update_notifier: UpdateNotifier, cfg: &UpdateConfig) {
    let check_on_startup = cfg.check_on_startup;
    let interval = cfg.check_interval_secs.filter(|secs| *secs > 0);

    if !check_on_startup && interval.is_none() {
        log::debug!("Update checks disabled");
        return;
    }

    tokio::spawn(async move {
        if check_on_startup {
            run_update_check(&update_notifier).await;
        }
        let Some(secs) = interval else {
            return;
        };
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
            run_update_check(&update_notifier).await;
        }
    });
}

async fn run_update_check(notifier: &UpdateNotifier) {
    match notifier.check_for_updates().await {
        Some(update) => log::info!(
            "New version {} ready to download from {}",
            update.version_name,
            update.update_url
        ),
        None => log::debug!("Update check finished, nothing new"),
    }
}
