//! SDK build tools: dexer and package tool

use crate::cache::{CacheKind, DexCache, HostFileStore};
use crate::command::{CommandExecutor, CommandSpec};
use crate::config::{Config, ToolsConfig};
use crate::error::{KilnError, KilnResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Join classpath elements for display
fn classpath_display(classpath: &[PathBuf]) -> String {
    classpath
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// Build tools with a host-side dex cache
pub struct AndroidSdk {
    executor: Arc<dyn CommandExecutor>,
    tools: ToolsConfig,
    dex_cache: DexCache,
}

impl AndroidSdk {
    /// Create the SDK wrapper and its dex cache from configuration
    pub fn from_config(config: &Config, executor: Arc<dyn CommandExecutor>) -> Self {
        let dex_cache = DexCache::new(CacheKind::Dex, HostFileStore::new(&config.cache.host_dir))
            .with_enabled(config.cache.enabled);

        Self {
            executor,
            tools: config.tools.clone(),
            dex_cache,
        }
    }

    /// Cache of dexed classpaths
    pub fn dex_cache(&self) -> &DexCache {
        &self.dex_cache
    }

    /// Convert all classes on `classpath` into a dex file at `output`.
    ///
    /// Skips the dexer when the same classpath contents were dexed before.
    pub async fn dex(&self, output: &Path, classpath: &[PathBuf]) -> KilnResult<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| KilnError::io(format!("creating {}", parent.display()), e))?;
        }

        let key = self.dex_cache.make_key(classpath);
        if self.dex_cache.get_from_cache(output, key.as_ref()).await.is_hit() {
            debug!("Dex cache hit for {}", classpath_display(classpath));
            return Ok(());
        }

        info!("Dexing {}", classpath_display(classpath));

        // --core-library lets tests live in the packages they test.
        // Heap sizes match what the platform build uses for large inputs.
        let spec = CommandSpec::new(&self.tools.dx)
            .args(["-JXms16M", "-JXmx1536M", "--dex"])
            .arg(format!("--output={}", output.display()))
            .arg("--core-library")
            .args(classpath.iter().map(|p| p.to_string_lossy().to_string()));
        self.executor.execute(&spec).await?;

        self.dex_cache.insert(key.as_ref(), output).await;
        Ok(())
    }

    /// Create an APK from a manifest
    pub async fn package_apk(&self, apk: &Path, manifest: &Path) -> KilnResult<()> {
        let spec = CommandSpec::new(&self.tools.aapt)
            .args(["package", "-F"])
            .path_arg(apk)
            .arg("-M")
            .path_arg(manifest)
            .arg("-I")
            .path_arg(&self.tools.android_jar);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Add a dex file to an existing APK
    pub async fn add_to_apk(&self, apk: &Path, dex: &Path) -> KilnResult<()> {
        let spec = CommandSpec::new(&self.tools.aapt)
            .args(["add", "-k"])
            .path_arg(apk)
            .path_arg(dex);
        self.executor.execute(&spec).await?;
        Ok(())
    }
}
