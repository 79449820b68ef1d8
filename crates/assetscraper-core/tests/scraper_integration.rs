use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::Span;

use assetscraper_core::{
    AssetScraper, EmitError, Emitter, Executors, Platform, ScraperConfig, build_scraper_for,
    installed_software, installed_updates,
};
use assetscraper_exec::{CommandExecutor, CommandResult, ExecContext, ExecError};
use assetscraper_inventory::{InstalledSoftware, InstalledUpdate, InventoryError, Provider};
use assetscraper_metrics::{AttributeSet, Settings};

// Mock implementations

struct StaticProvider<T> {
    records: Vec<T>,
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Provider<T> for StaticProvider<T> {
    async fn get(&self, _ctx: &ExecContext) -> Result<Vec<T>, InventoryError> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

struct FailingProvider;

#[async_trait]
impl Provider<InstalledSoftware> for FailingProvider {
    async fn get(&self, _ctx: &ExecContext) -> Result<Vec<InstalledSoftware>, InventoryError> {
        Err(InventoryError::Execution(ExecError::CommandFailed {
            status: 1,
            stderr: "dpkg: error: parsing file '/var/lib/dpkg/status'".to_string(),
        }))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Answers `dpkg` invocations, everything else fails to spawn
struct DpkgHost;

#[async_trait]
impl CommandExecutor for DpkgHost {
    async fn execute(
        &self,
        _ctx: &ExecContext,
        args: &[String],
    ) -> Result<CommandResult, ExecError> {
        match args {
            [tool, flag] if tool == "dpkg" && flag == "--version" => {
                Ok(CommandResult::ok("Debian 'dpkg' package management program version 1.21.1"))
            }
            [tool, flag] if tool == "dpkg" && flag == "-l" => Ok(CommandResult::ok(
                "ii  bash  5.1-6ubuntu1  amd64  GNU Bourne Again SHell\n\
                 ii  curl  7.81.0-1  amd64  command line tool\n",
            )),
            _ => Err(ExecError::SpawnError(format!("{}: not found", args.join(" ")))),
        }
    }

    fn executor_type(&self) -> &'static str {
        "mock"
    }
}

fn software() -> Vec<InstalledSoftware> {
    vec![
        InstalledSoftware::new("bash", "5.1-6ubuntu1"),
        InstalledSoftware::new("7-Zip", "22.01")
            .with_publisher("Igor Pavlov")
            .with_install_date("2023-03-21"),
    ]
}

fn updates() -> Vec<InstalledUpdate> {
    vec![InstalledUpdate {
        caption: String::new(),
        hotfix_id: "KB5022282".to_string(),
        installed_on: "2023-3-21".to_string(),
        installed_by: "SYSTEM".to_string(),
        description: "Security Update".to_string(),
    }]
}

fn host() -> AttributeSet {
    AttributeSet::new().with_non_empty("host.name", "web-1")
}

fn scraper(emitters: Vec<Box<dyn Emitter>>) -> AssetScraper {
    AssetScraper::new(
        Settings::default(),
        emitters,
        host(),
        Duration::from_secs(5),
        Span::none(),
    )
}

#[tokio::test]
async fn test_scrape_batches_all_emitters() {
    let mut scraper = scraper(vec![
        Box::new(installed_software::emitter(Arc::new(StaticProvider {
            records: software(),
        }))),
        Box::new(installed_updates::emitter(Arc::new(StaticProvider {
            records: updates(),
        }))),
    ]);
    scraper.start().await.unwrap();

    let report = scraper.scrape(&ExecContext::new()).await;

    assert!(report.is_complete());
    assert_eq!(report.batch.resource_metrics.len(), 1);
    assert_eq!(report.batch.resource_metrics[0].resource, host());
    assert_eq!(report.batch.metric_count(), 2);
    assert_eq!(report.batch.data_point_count(), 3);

    let metric = report.batch.find(installed_software::METRIC_NAME).unwrap();
    assert_eq!(metric.description, "Installed software");
    assert!(metric.unit.is_empty());
    assert!(metric.data_points.iter().all(|p| p.int_value == 0));
    assert!(
        metric
            .data_points
            .iter()
            .all(|p| p.start_timestamp <= p.timestamp)
    );

    // bash has neither publisher nor date
    let bash = &metric.data_points[0].attributes;
    assert_eq!(bash.len(), 2);
    assert!(!bash.contains_key(installed_software::ATTR_PUBLISHER));
    assert_eq!(metric.data_points[1].attributes.len(), 4);
}

#[tokio::test]
async fn test_failing_emitter_does_not_affect_others() {
    let mut scraper = scraper(vec![
        Box::new(installed_software::emitter(Arc::new(FailingProvider))),
        Box::new(installed_updates::emitter(Arc::new(StaticProvider {
            records: updates(),
        }))),
    ]);
    scraper.start().await.unwrap();

    let report = scraper.scrape(&ExecContext::new()).await;

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].emitter(), installed_software::METRIC_NAME);
    assert!(matches!(report.errors[0], EmitError::Provider { .. }));
    assert!(report.batch.find(installed_software::METRIC_NAME).is_none());
    assert_eq!(
        report
            .batch
            .find(installed_updates::METRIC_NAME)
            .unwrap()
            .data_points
            .len(),
        1
    );
}

#[tokio::test]
async fn test_no_records_is_not_an_error() {
    let mut scraper = scraper(vec![Box::new(installed_updates::emitter(Arc::new(
        StaticProvider::<InstalledUpdate> {
            records: Vec::new(),
        },
    )))]);
    scraper.start().await.unwrap();

    let report = scraper.scrape(&ExecContext::new()).await;

    assert!(report.is_complete());
    assert!(report.batch.resource_metrics.is_empty());
}

#[tokio::test]
async fn test_emit_before_init_fails() {
    let emitter = installed_software::emitter(Arc::new(StaticProvider {
        records: software(),
    }));

    let result = emitter.emit(&ExecContext::new()).await;

    assert!(matches!(result, Err(EmitError::NotInitialized(_))));
}

#[tokio::test]
async fn test_repeated_cycles_share_start_time() {
    let fixed = Utc.with_ymd_and_hms(2023, 3, 21, 8, 0, 0).unwrap();
    let mut scraper = AssetScraper::new(
        Settings::default().with_start_time(fixed),
        vec![Box::new(installed_software::emitter(Arc::new(
            StaticProvider { records: software() },
        )))],
        host(),
        Duration::from_secs(5),
        Span::none(),
    );
    scraper.start().await.unwrap();

    let first = scraper.scrape(&ExecContext::new()).await;
    let second = scraper.scrape(&ExecContext::new()).await;

    assert_eq!(first.batch.resource_metrics[0].start_time, fixed);
    assert_eq!(second.batch.resource_metrics[0].start_time, fixed);
    assert_eq!(second.batch.data_point_count(), 2);
    assert_eq!(
        first.batch.metric_count(),
        second.batch.metric_count()
    );
}

#[tokio::test]
async fn test_cancelled_scrape_skips_emitters() {
    let mut scraper = scraper(vec![Box::new(installed_software::emitter(Arc::new(
        StaticProvider { records: software() },
    )))]);
    scraper.start().await.unwrap();

    let ctx = ExecContext::new();
    ctx.cancel();
    let report = scraper.scrape(&ctx).await;

    assert!(report.batch.resource_metrics.is_empty());
    assert!(!report.is_complete());
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        EmitError::Cancelled(name) if name == installed_software::METRIC_NAME
    ));
}

#[tokio::test]
async fn test_build_for_linux_host() {
    let dpkg_host: Arc<dyn CommandExecutor> = Arc::new(DpkgHost);
    let executors = Executors {
        posix: Arc::clone(&dpkg_host),
        cmd: Arc::clone(&dpkg_host),
        powershell: dpkg_host,
    };
    let mut config = ScraperConfig::default();
    config.metrics.installed_updates.enabled = false;
    config
        .resource_attributes
        .insert("host.name".to_string(), "web-1".to_string());

    let ctx = ExecContext::new();
    let mut scraper = build_scraper_for(
        &config,
        Settings::default(),
        Platform::Linux,
        &executors,
        Span::none(),
        &ctx,
    )
    .await
    .unwrap();

    assert_eq!(
        scraper.emitter_names().collect::<Vec<_>>(),
        vec![installed_software::METRIC_NAME]
    );

    scraper.start().await.unwrap();
    let report = scraper.scrape(&ctx).await;

    assert!(report.is_complete());
    assert_eq!(report.batch.resource_metrics[0].resource, host());
    let metric = report.batch.find(installed_software::METRIC_NAME).unwrap();
    assert_eq!(metric.data_points.len(), 2);
    assert_eq!(
        metric.data_points[1]
            .attributes
            .get(installed_software::ATTR_NAME),
        Some("curl")
    );
}

#[tokio::test]
async fn test_build_rejects_invalid_config() {
    let executors = Executors::local(Duration::from_secs(1));
    let config = ScraperConfig {
        command_timeout_secs: 0,
        ..ScraperConfig::default()
    };

    let result = build_scraper_for(
        &config,
        Settings::default(),
        Platform::Other,
        &executors,
        Span::none(),
        &ExecContext::new(),
    )
    .await;

    assert!(result.is_err());
}
