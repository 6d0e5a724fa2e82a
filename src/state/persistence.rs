use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, error, info, warn};

use super::entities::AppState;

/// Fixed key the whole state is stored under. Becomes the file name on disk.
pub const STORAGE_KEY: &str = "freeflow_data_v1";

/// Interface for abstracting where the serialized state lives.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Reads back the stored state. `Ok(None)` means nothing was ever stored.
    async fn load(&self) -> Result<Option<AppState>>;

    /// Replaces the stored state with `state`.
    async fn save(&self, state: &AppState) -> Result<()>;
}

/// Stores the state as a single json document inside the application directory.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl StateStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<AppState>> {
        debug!("Loading state from {:?}", self.path);
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => Err(e)?,
        };

        file.lock_shared()?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        read?;

        Ok(Some(serde_json::from_str::<AppState>(&content)?))
    }

    async fn save(&self, state: &AppState) -> Result<()> {
        let buffer = serde_json::to_vec(state)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Truncate only once the lock is held so readers never observe a half empty file.
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.rewind().await?;
            file.write_all(&buffer).await?;
            file.flush().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        file.unlock_async().await?;
        result?;

        debug!("Saved {} bytes of state into {:?}", buffer.len(), self.path);
        Ok(())
    }
}

/// Restores the state at startup. Missing or malformed data is replaced with the default state
/// instead of failing.
pub async fn restore_state(storage: &impl StateStorage) -> AppState {
    let mut state = match storage.load().await {
        Ok(Some(state)) => state,
        Ok(None) => {
            info!("No stored state found, starting with defaults");
            AppState::default()
        }
        Err(e) => {
            error!("Failed to load state, falling back to defaults {e:?}");
            AppState::default()
        }
    };

    if state.repair_open_sessions() {
        warn!(
            "Stored sessions didn't match the active pointer, now tracking {:?}",
            state.active_session_id
        );
    }
    state
}
