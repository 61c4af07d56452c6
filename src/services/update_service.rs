use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::config::UpdateConfig;
use crate::error::AppResult;
use crate::external::{PackageInstaller, UpdateFeedClient};
use crate::models::{AppUpdate, UpdateState};

/// Checks for new releases and runs at most one download-then-install at a
/// time. State changes are pushed through a `watch` channel.
#[derive(Clone)]
pub struct UpdateNotifier {
    feed: UpdateFeedClient,
    installer: Arc<dyn PackageInstaller>,
    config: Arc<UpdateConfig>,
    downloading: Arc<AtomicBool>,
    state: Arc<watch::Sender<UpdateState>>,
}

impl UpdateNotifier {
    pub fn new(
        feed: UpdateFeedClient,
        installer: Arc<dyn PackageInstaller>,
        config: UpdateConfig,
    ) -> Self {
        let (state, _rx) = watch::channel(UpdateState {
            current_version_code: config.current_version_code,
            ..Default::default()
        });
        Self {
            feed,
            installer,
            config: Arc::new(config),
            downloading: Arc::new(AtomicBool::new(false)),
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> UpdateState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UpdateState> {
        self.state.subscribe()
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading.load(Ordering::Acquire)
    }

    /// Fetches the remote descriptor and publishes it when its version code is
    /// newer than the running build. Any failure means "no update".
    pub async fn check_for_updates(&self) -> Option<AppUpdate> {
        let update = match self.feed.fetch_descriptor().await {
            Ok(update) => update,
            Err(e) => {
                log::warn!("Update check failed: {e}");
                return None;
            }
        };

        if update.version_code <= self.config.current_version_code {
            log::debug!(
                "No update: remote {} <= current {}",
                update.version_code,
                self.config.current_version_code
            );
            return None;
        }

        log::info!(
            "Update available: {} (code {})",
            update.version_name,
            update.version_code
        );
        self.state.send_modify(|s| s.available = Some(update.clone()));
        Some(update)
    }

    /// Starts downloading `url` in the background and installs it when done.
    /// Returns `false` without doing anything while another download runs.
    pub fn download_update(&self, url: &str) -> bool {
        if self
            .downloading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Download already in progress, ignoring {url}");
            return false;
        }

        self.state.send_modify(|s| {
            s.downloading = true;
            s.last_error = None;
        });

        let notifier = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            let result = notifier.download_and_install(&url).await;
            notifier.state.send_modify(|s| {
                s.downloading = false;
                match &result {
                    Ok(path) => s.last_package = Some(path.display().to_string()),
                    Err(e) => s.last_error = Some(e.to_string()),
                }
                // cleared before subscribers are woken
                notifier.downloading.store(false, Ordering::Release);
            });
            if let Err(e) = result {
                log::error!("Update download from {url} failed: {e}");
            }
        });
        true
    }

    async fn download_and_install(&self, url: &str) -> AppResult<PathBuf> {
        let path = self
            .feed
            .download(
                url,
                &self.config.download_dir(),
                &self.config.package_file_name,
            )
            .await?;
        self.installer.install(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingInstaller {
        installed: Mutex<Vec<PathBuf>>,
    }

    impl PackageInstaller for RecordingInstaller {
        fn install(&self, package: &Path) -> AppResult<()> {
            self.installed
                .lock()
                .map_err(|_| AppError::InternalError("poisoned".into()))?
                .push(package.to_path_buf());
            Ok(())
        }
    }

    fn config(server: &MockServer, download_dir: &Path, current: i64) -> UpdateConfig {
        UpdateConfig {
            descriptor_url: format!("{}/update.json", server.uri()),
            current_version_code: current,
            download_dir: Some(download_dir.display().to_string()),
            request_timeout_secs: 5,
            ..Default::default()
        }
    }

    fn notifier(cfg: UpdateConfig, installer: Arc<RecordingInstaller>) -> UpdateNotifier {
        let feed = UpdateFeedClient::new(&cfg).unwrap();
        UpdateNotifier::new(feed, installer, cfg)
    }

    fn descriptor(server: &MockServer, version_code: i64) -> serde_json::Value {
        serde_json::json!({
            "versionCode": version_code,
            "versionName": "1.6",
            "updateUrl": format!("{}/rifas.apk", server.uri()),
            "description": "Nuevas estadísticas"
        })
    }

    #[tokio::test]
    async fn test_newer_version_is_published() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(descriptor(&server, 7)))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let notifier = notifier(config(&server, dir.path(), 6), Arc::default());
        let rx = notifier.subscribe();

        let update = notifier.check_for_updates().await.unwrap();
        assert_eq!(update.version_code, 7);
        assert_eq!(notifier.state().available, Some(update));
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_same_or_older_version_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(descriptor(&server, 7)))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let notifier = notifier(config(&server, dir.path(), 7), Arc::default());

        assert!(notifier.check_for_updates().await.is_none());
        assert!(notifier.state().available.is_none());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let notifier = notifier(config(&server, dir.path(), 1), Arc::default());
        assert!(notifier.check_for_updates().await.is_none());

        let bad_json = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&bad_json)
            .await;
        let notifier = self::notifier(config(&bad_json, dir.path(), 1), Arc::default());
        assert!(notifier.check_for_updates().await.is_none());

        let unreachable = UpdateConfig {
            descriptor_url: "http://127.0.0.1:9/update.json".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let notifier = self::notifier(unreachable, Arc::default());
        assert!(notifier.check_for_updates().await.is_none());
        assert!(notifier.state().available.is_none());
    }

    #[tokio::test]
    async fn test_download_installs_package_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rifas.apk"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"PK-package".to_vec())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let installer = Arc::new(RecordingInstaller::default());
        let notifier = notifier(config(&server, dir.path(), 1), installer.clone());
        let mut rx = notifier.subscribe();
        let url = format!("{}/rifas.apk", server.uri());

        assert!(notifier.download_update(&url));
        assert!(notifier.is_downloading());
        // second trigger while the first is in flight is a no-op
        assert!(!notifier.download_update(&url));

        let finished = tokio::time::timeout(
            Duration::from_secs(10),
            rx.wait_for(|s| !s.downloading && s.last_package.is_some()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        let expected = dir.path().join("rifas_update.apk");
        assert_eq!(finished.last_package, Some(expected.display().to_string()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"PK-package");
        assert_eq!(*installer.installed.lock().unwrap(), vec![expected]);
        assert!(!notifier.is_downloading());
    }

    #[tokio::test]
    async fn test_failed_download_clears_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rifas.apk"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let installer = Arc::new(RecordingInstaller::default());
        let notifier = notifier(config(&server, dir.path(), 1), installer.clone());
        let mut rx = notifier.subscribe();

        assert!(notifier.download_update(&format!("{}/rifas.apk", server.uri())));
        let finished = tokio::time::timeout(
            Duration::from_secs(10),
            rx.wait_for(|s| !s.downloading && s.last_error.is_some()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        assert!(finished.last_package.is_none());
        assert!(installer.installed.lock().unwrap().is_empty());
        assert!(!notifier.is_downloading());
        // no leftover partial files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
