//! Platform wiring: executors, provider selection and emitter creation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use assetscraper_exec::{CommandExecutor, ExecContext, Interpreter, ShellExecutor};
use assetscraper_inventory::registry::RegQueryReader;
use assetscraper_inventory::software::{
    DpkgProvider, PartialFailurePolicy, RegistryProvider, RpmProvider, SystemProfilerProvider,
};
use assetscraper_inventory::updates::CimUpdatesProvider;
use assetscraper_inventory::{
    FallbackProvider, InstalledSoftware, InstalledUpdate, Provider, select_provider,
};
use assetscraper_metrics::{AttributeSet, Settings};
use tracing::{Instrument, Span, info, instrument};

use crate::config::ScraperConfig;
use crate::emitter::Emitter;
use crate::error::CoreError;
use crate::scraper::AssetScraper;
use crate::{installed_software, installed_updates};

/// Operating system family, which decides the data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
    Other,
}

impl Platform {
    /// Platform this binary was built for
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// One executor per interpreter a provider may need
#[derive(Clone)]
pub struct Executors {
    pub posix: Arc<dyn CommandExecutor>,
    pub cmd: Arc<dyn CommandExecutor>,
    pub powershell: Arc<dyn CommandExecutor>,
}

impl Executors {
    /// Local shell executors bounded by `timeout` per command
    #[must_use]
    pub fn local(timeout: Duration) -> Self {
        let shell = |interpreter| -> Arc<dyn CommandExecutor> {
            Arc::new(ShellExecutor::new(interpreter).with_timeout(timeout))
        };
        Self {
            posix: shell(Interpreter::Sh),
            cmd: shell(Interpreter::Cmd),
            powershell: shell(Interpreter::PowerShell),
        }
    }
}

/// Installed software source for `platform`.
///
/// Package manager hosts probe dpkg first, then rpm.
pub async fn software_provider(
    platform: Platform,
    executors: &Executors,
    policy: PartialFailurePolicy,
    ctx: &ExecContext,
) -> Arc<dyn Provider<InstalledSoftware>> {
    match platform {
        Platform::Windows => {
            let reader = RegQueryReader::new(Arc::clone(&executors.cmd));
            Arc::new(RegistryProvider::new(Arc::new(reader)).with_policy(policy))
        }
        Platform::MacOs => Arc::new(SystemProfilerProvider::new(Arc::clone(&executors.posix))),
        Platform::Linux | Platform::Other => {
            let candidates = vec![
                DpkgProvider::candidate(Arc::clone(&executors.posix)),
                RpmProvider::candidate(Arc::clone(&executors.posix)),
            ];
            select_provider(ctx, candidates).await
        }
    }
}

/// Installed update source for `platform`; only Windows has one
pub fn updates_provider(
    platform: Platform,
    executors: &Executors,
) -> Arc<dyn Provider<InstalledUpdate>> {
    match platform {
        Platform::Windows => Arc::new(CimUpdatesProvider::new(Arc::clone(&executors.powershell))),
        _ => Arc::new(FallbackProvider::new()),
    }
}

/// Build a scraper for the local host
///
/// # Errors
/// Returns `CoreError::ConfigError` if `config` is invalid.
pub async fn build_scraper(
    config: &ScraperConfig,
    settings: Settings,
    span: Span,
    ctx: &ExecContext,
) -> Result<AssetScraper, CoreError> {
    config.validate()?;
    let executors = Executors::local(config.command_timeout());
    build_scraper_for(config, settings, Platform::current(), &executors, span, ctx).await
}

/// Build a scraper for `platform` using `executors`.
///
/// Provider selection runs once here, not per scrape.
///
/// # Errors
/// Returns `CoreError::ConfigError` if `config` is invalid.
#[instrument(skip_all, fields(platform = %platform))]
pub async fn build_scraper_for(
    config: &ScraperConfig,
    settings: Settings,
    platform: Platform,
    executors: &Executors,
    span: Span,
    ctx: &ExecContext,
) -> Result<AssetScraper, CoreError> {
    config.validate()?;

    let select_ctx = ctx.child().with_timeout(config.scrape_timeout());
    let mut emitters: Vec<Box<dyn Emitter>> = Vec::new();

    if config.metrics.installed_software.enabled {
        let provider =
            software_provider(platform, executors, config.partial_failure, &select_ctx)
                .instrument(span.clone())
                .await;
        emitters.push(Box::new(installed_software::emitter(provider)));
    }

    if config.metrics.installed_updates.enabled {
        emitters.push(Box::new(installed_updates::emitter(updates_provider(
            platform, executors,
        ))));
    }

    info!(emitters = emitters.len(), "scraper built");

    let resource: AttributeSet = config.resource_attributes.clone().into_iter().collect();
    Ok(AssetScraper::new(
        settings,
        emitters,
        resource,
        config.scrape_timeout(),
        span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_matches_target() {
        let platform = Platform::current();

        if cfg!(target_os = "linux") {
            assert_eq!(platform, Platform::Linux);
        } else if cfg!(windows) {
            assert_eq!(platform, Platform::Windows);
        }
    }

    #[test]
    fn test_updates_fallback_off_windows() {
        let executors = Executors::local(Duration::from_secs(1));

        assert_eq!(updates_provider(Platform::Linux, &executors).name(), "fallback");
        assert_eq!(updates_provider(Platform::MacOs, &executors).name(), "fallback");
        assert_eq!(updates_provider(Platform::Windows, &executors).name(), "cim");
    }

    #[tokio::test]
    async fn test_windows_software_uses_registry() {
        let executors = Executors::local(Duration::from_secs(1));

        let provider = software_provider(
            Platform::Windows,
            &executors,
            PartialFailurePolicy::Continue,
            &ExecContext::new(),
        )
        .await;

        assert_eq!(provider.name(), "registry");
    }
}
