//! Per-user settings for the front end: default city, unit symbol and the
//! last city looked up.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};
use tokio::sync::{Mutex, RwLock};

use crate::units::TemperatureSymbol;

pub type UserId = i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPrefs {
    pub city: Option<String>,
    pub unit: Option<TemperatureSymbol>,
    pub last_city: Option<String>,
}

impl UserPrefs {
    /// Both a city and a unit are set, so the rain watcher can poll for this user.
    pub fn is_watchable(&self) -> bool {
        self.city.is_some() && self.unit.is_some()
    }

    /// Overwrite only the fields present in `update`.
    pub fn apply(&mut self, update: PrefsUpdate) {
        if let Some(city) = update.city {
            self.city = Some(city);
        }
        if let Some(unit) = update.unit {
            self.unit = Some(unit);
        }
        if let Some(last_city) = update.last_city {
            self.last_city = Some(last_city);
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PrefsUpdate {
    pub city: Option<String>,
    pub unit: Option<TemperatureSymbol>,
    pub last_city: Option<String>,
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<UserPrefs>>;

    /// Create the record if missing, otherwise merge `update` into it.
    async fn upsert(&self, id: UserId, update: PrefsUpdate) -> Result<UserPrefs>;

    async fn all(&self) -> Result<Vec<(UserId, UserPrefs)>>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, UserPrefs>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<UserPrefs>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert(&self, id: UserId, update: PrefsUpdate) -> Result<UserPrefs> {
        let mut users = self.users.write().await;
        let entry = users.entry(id).or_default();
        entry.apply(update);
        Ok(entry.clone())
    }

    async fn all(&self) -> Result<Vec<(UserId, UserPrefs)>> {
        let users = self.users.read().await;
        let mut out: Vec<_> = users.iter().map(|(id, p)| (*id, p.clone())).collect();
        out.sort_by_key(|(id, _)| *id);
        Ok(out)
    }
}

/// On-disk layout. TOML table keys must be strings, hence the `String` ids.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    users: BTreeMap<String, UserPrefs>,
}

/// TOML file holding every user's record; rewritten on each upsert.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the platform data dir.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::Config::prefs_file_path()?))
    }

    async fn read(&self) -> Result<PrefsFile> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to check preferences: {}", self.path.display()))?;

        if !exists {
            return Ok(PrefsFile::default());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    async fn write(&self, file: &PrefsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(file).context("Failed to serialize preferences")?;

        tokio::fs::write(&self.path, toml)
            .await
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn get(&self, id: UserId) -> Result<Option<UserPrefs>> {
        let file = self.read().await?;
        Ok(file.users.get(&id.to_string()).cloned())
    }

    async fn upsert(&self, id: UserId, update: PrefsUpdate) -> Result<UserPrefs> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.read().await?;
        let entry = file.users.entry(id.to_string()).or_default();
        entry.apply(update);
        let updated = entry.clone();

        self.write(&file).await?;
        tracing::debug!(user = id, path = %self.path.display(), "saved preferences");

        Ok(updated)
    }

    async fn all(&self) -> Result<Vec<(UserId, UserPrefs)>> {
        let file = self.read().await?;
        let mut out = Vec::with_capacity(file.users.len());

        for (key, prefs) in file.users {
            match key.parse::<UserId>() {
                Ok(id) => out.push((id, prefs)),
                Err(_) => tracing::warn!(key = %key, "ignoring preference entry with non-numeric id"),
            }
        }

        out.sort_by_key(|(id, _)| *id);
        Ok(out)
    }
}
