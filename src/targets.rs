use crate::cache::TtlCache;
use crate::errors::AppResult;
use crate::models::{MetricTargetEntry, PersonTarget, TargetConfig};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// How long a loaded config is served before the file is re-read. Short,
/// so edits made through the settings form become visible quickly.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// File-backed target configuration with cached reads and crash-safe writes.
///
/// Reads never fail the caller: a missing or corrupt file degrades to the
/// documented defaults. Writes go through a temp file in the same directory
/// followed by an atomic rename, with the pre-save state copied to a backup
/// first, so there is no window where the canonical file is half-written.
pub struct TargetStore {
    path: PathBuf,
    backup_path: PathBuf,
    cache: TtlCache<TargetConfig>,
}

impl TargetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_ttl(path, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        let backup_path = backup_path_for(&path);
        Self {
            path,
            backup_path,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Current configuration, cache-first. Only successful parses are cached,
    /// so a corrupt file is re-probed on the next call once an operator
    /// repairs it.
    pub fn load(&self) -> TargetConfig {
        if let Some(config) = self.cache.get() {
            return config;
        }

        match self.read_file() {
            Ok(Some(config)) => {
                tracing::debug!(path = %self.path.to_string_lossy(), "loaded targets from file");
                self.cache.put(config.clone());
                config
            }
            Ok(None) => {
                tracing::info!(path = %self.path.to_string_lossy(), "targets file not found, using defaults");
                TargetConfig::default()
            }
            Err(error) => {
                tracing::error!(
                    path = %self.path.to_string_lossy(),
                    error = %error,
                    "failed to read targets file, using defaults"
                );
                TargetConfig::default()
            }
        }
    }

    /// Persist a configuration. Stamps the audit fields, backs up the
    /// previous file (best effort), writes a temp file and renames it over
    /// the canonical path, then invalidates the read cache. Returns the
    /// stamped config so callers see the audit fields they just wrote.
    pub fn save(&self, mut config: TargetConfig, updated_by: &str) -> AppResult<TargetConfig> {
        if self.path.exists() {
            if let Err(error) = fs::copy(&self.path, &self.backup_path) {
                tracing::warn!(
                    path = %self.backup_path.to_string_lossy(),
                    error = %error,
                    "failed to write targets backup"
                );
            }
        }

        config.last_updated = Some(Utc::now());
        config.updated_by = Some(updated_by.to_string());

        let temp_path = self.temp_path();
        if let Err(error) = self.write_and_swap(&temp_path, &config) {
            let _ = fs::remove_file(&temp_path);
            return Err(error);
        }

        self.cache.invalidate();
        tracing::info!(updated_by, "saved targets");
        Ok(config)
    }

    /// Copy the backup over the live file. `Ok(false)` when no backup exists.
    pub fn restore_from_backup(&self) -> AppResult<bool> {
        if !self.backup_path.exists() {
            tracing::warn!(
                path = %self.backup_path.to_string_lossy(),
                "no targets backup to restore"
            );
            return Ok(false);
        }
        fs::copy(&self.backup_path, &self.path)?;
        self.cache.invalidate();
        tracing::info!("restored targets from backup");
        Ok(true)
    }

    pub fn company_target(&self, key: &str) -> Option<f64> {
        self.load().company.get(key).copied()
    }

    pub fn metric_target(&self, key: &str) -> Option<MetricTargetEntry> {
        self.load().metric_targets.get(key).cloned()
    }

    pub fn person_target(&self, name: &str) -> Option<PersonTarget> {
        self.load().people.get(name).cloned()
    }

    pub fn update_company_target(
        &self,
        key: &str,
        value: f64,
        updated_by: &str,
    ) -> AppResult<TargetConfig> {
        let mut config = self.load();
        config.company.insert(key.to_string(), value);
        self.save(config, updated_by)
    }

    /// Set one person's target, creating the entry when absent and keeping
    /// any configured metric name and format.
    pub fn update_person_target(
        &self,
        name: &str,
        target: f64,
        updated_by: &str,
    ) -> AppResult<TargetConfig> {
        let mut config = self.load();
        config.people.entry(name.to_string()).or_default().target = target;
        self.save(config, updated_by)
    }

    pub fn update_metric_target(
        &self,
        key: &str,
        entry: MetricTargetEntry,
        updated_by: &str,
    ) -> AppResult<TargetConfig> {
        let mut config = self.load();
        config.metric_targets.insert(key.to_string(), entry);
        self.save(config, updated_by)
    }

    /// The full configuration serialized to the on-disk schema, for download.
    pub fn export_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.load())?)
    }

    fn read_file(&self) -> AppResult<Option<TargetConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let config = serde_json::from_slice(&bytes)?;
        Ok(Some(config))
    }

    fn temp_path(&self) -> PathBuf {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let short = Uuid::new_v4().simple().to_string();
        let name = format!(".targets-{}.json", &short[..8]);
        match parent {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    fn write_and_swap(&self, temp_path: &Path, config: &TargetConfig) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(config)?;
        fs::write(temp_path, bytes)?;
        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".bak");
    PathBuf::from(raw)
}
