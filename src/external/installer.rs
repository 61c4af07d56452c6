use std::path::Path;
use std::sync::Arc;

use tokio::process::Command;

use crate::config::UpdateConfig;
use crate::error::{AppError, AppResult};

/// Hands a downloaded package to whatever installs it on this platform
pub trait PackageInstaller: Send + Sync {
    fn install(&self, package: &Path) -> AppResult<()>;
}

/// Runs a configured program with the package path as last argument,
/// e.g. `xdg-open` or `adb install -r`.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandInstaller {
    /// Whitespace-split command line; `None` when blank
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl PackageInstaller for CommandInstaller {
    /// Starts the installer and returns; the child is reaped by a detached
    /// task. Must be called from within the tokio runtime.
    fn install(&self, package: &Path) -> AppResult<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(package)
            .spawn()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to start {}: {e}", self.program))
            })?;
        log::info!(
            "Started installer {} (pid {:?}) for {}",
            self.program,
            child.id(),
            package.display()
        );

        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => log::info!("Installer {program} finished"),
                Ok(status) => log::warn!("Installer {program} exited with {status}"),
                Err(e) => log::error!("Failed to wait for installer {program}: {e}"),
            }
        });
        Ok(())
    }
}

/// Used when no installer command is configured: the package stays on disk
#[derive(Debug, Clone, Default)]
pub struct ManualInstaller;

impl PackageInstaller for ManualInstaller {
    fn install(&self, package: &Path) -> AppResult<()> {
        log::info!(
            "Update package ready at {}; no installer configured",
            package.display()
        );
        Ok(())
    }
}

pub fn installer_from_config(cfg: &UpdateConfig) -> Arc<dyn PackageInstaller> {
    match cfg.installer_command.as_deref().and_then(CommandInstaller::parse) {
        Some(installer) => Arc::new(installer),
        None => Arc::new(ManualInstaller),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let installer = CommandInstaller::parse("adb install -r").unwrap();
        assert_eq!(installer.program(), "adb");
        assert_eq!(installer.args(), ["install", "-r"]);
        assert!(CommandInstaller::parse("   ").is_none());
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let installer = CommandInstaller::parse("definitely-not-an-installer-7f3a").unwrap();
        assert!(installer.install(Path::new("/tmp/rifas_update.apk")).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_installer_runs_with_package_path() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("installed");
        let installer = CommandInstaller::parse("touch").unwrap();
        installer.install(&marker).unwrap();

        let mut waited = 0;
        while !marker.exists() && waited < 50 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            waited += 1;
        }
        assert!(marker.exists());
    }
}
