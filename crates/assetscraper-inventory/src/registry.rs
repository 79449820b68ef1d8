//! Windows registry enumeration through `reg query`

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use assetscraper_exec::{CommandExecutor, ExecContext, ExecError};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument};

/// `    <name>    <REG_TYPE>    <data>`; data is missing for empty values
#[allow(clippy::expect_used)]
static VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(.+?)\s{4}(REG_[A-Z0-9_]+)(?:\s{4}(.*))?$")
        .expect("static regex should not panic")
});

/// Switches the console to UTF-8 before `reg` runs; redirected output would
/// otherwise use the OEM code page.
const UTF8_CODE_PAGE: [&str; 3] = ["chcp", "65001>nul", "&"];

/// Which registry view to read on a 64-bit host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryView {
    /// Native 64-bit view
    Bits64,
    /// WOW64 32-bit view
    Bits32,
}

impl RegistryView {
    /// `reg.exe` switch selecting this view
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            RegistryView::Bits64 => "/reg:64",
            RegistryView::Bits32 => "/reg:32",
        }
    }
}

impl fmt::Display for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryView::Bits64 => write!(f, "64-bit"),
            RegistryView::Bits32 => write!(f, "32-bit"),
        }
    }
}

/// One subkey and its named string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryKey {
    /// Subkey name relative to the enumerated root
    pub name: String,
    /// Value name to data
    pub values: HashMap<String, String>,
}

impl RegistryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Add a value
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, data: impl Into<String>) -> Self {
        self.values.insert(name.into(), data.into());
        self
    }

    /// Value data, or `""` if the value does not exist
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }
}

/// Enumerates the immediate subkeys of a root key
#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// Read every immediate subkey of `root` in `view` with its values.
    ///
    /// # Errors
    /// Returns `ExecError` if the root cannot be opened or read.
    async fn subkeys(
        &self,
        ctx: &ExecContext,
        root: &str,
        view: RegistryView,
    ) -> Result<Vec<RegistryKey>, ExecError>;
}

/// [`RegistryReader`] backed by `reg query <root> /s`
///
/// The executor is expected to use the `Cmd` interpreter.
pub struct RegQueryReader {
    executor: Arc<dyn CommandExecutor>,
}

impl RegQueryReader {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Parse a recursive `reg query` dump into the immediate subkeys of `root`.
    ///
    /// Deeper keys and the root's own values are ignored; value lines that do
    /// not match the expected layout are skipped.
    pub(crate) fn parse_dump(root: &str, output: &str) -> Vec<RegistryKey> {
        let prefix = format!("{}\\", root.trim_end_matches('\\').to_ascii_lowercase());
        let mut keys = Vec::new();
        let mut current: Option<RegistryKey> = None;

        for line in output.lines() {
            let line = line.trim_end_matches('\r');

            if line.starts_with("HKEY_") {
                keys.extend(current.take());
                let path = line.trim_end();
                let lower = path.to_ascii_lowercase();
                current = lower
                    .strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty() && !rest.contains('\\'))
                    .map(|_| RegistryKey::new(&path[prefix.len()..]));
                continue;
            }

            let Some(key) = current.as_mut() else {
                continue;
            };
            if let Some(caps) = VALUE_LINE.captures(line) {
                let data = caps.get(3).map_or("", |m| m.as_str().trim_end());
                key.values.insert(caps[1].to_string(), data.to_string());
            }
        }
        keys.extend(current);

        keys
    }
}

#[async_trait]
impl RegistryReader for RegQueryReader {
    #[instrument(skip(self, ctx), fields(view = %view))]
    async fn subkeys(
        &self,
        ctx: &ExecContext,
        root: &str,
        view: RegistryView,
    ) -> Result<Vec<RegistryKey>, ExecError> {
        let args: Vec<String> = UTF8_CODE_PAGE
            .into_iter()
            .chain(["reg", "query", root, "/s", view.flag()])
            .map(String::from)
            .collect();
        let stdout = self.executor.execute(ctx, &args).await?.into_stdout()?;

        let keys = Self::parse_dump(root, &stdout);
        debug!(count = keys.len(), "enumerated registry subkeys");

        Ok(keys)
    }
}
