// Application state module
// Holds the loaded configuration and the swappable correction table

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use super::types::Config;
use crate::correction::{CorrectionTable, TableError};
use crate::logger;

/// Application state
pub struct AppState {
    pub config: Config,
    table: RwLock<Arc<CorrectionTable>>,

    /// Fired once when the process should stop accepting connections
    pub shutdown: Arc<Notify>,
    pub shutdown_requested: Arc<AtomicBool>,
}

impl AppState {
    /// Build state with the table named in `correction.table_file`,
    /// or the built-in table when none is configured
    pub fn new(config: &Config) -> Result<Self, TableError> {
        let table = match config.correction.table_file.as_deref() {
            Some(path) => CorrectionTable::from_file(path)?,
            None => CorrectionTable::builtin(),
        };
        Ok(Self::with_table(config, table))
    }

    pub fn with_table(config: &Config, table: CorrectionTable) -> Self {
        Self {
            config: config.clone(),
            table: RwLock::new(Arc::new(table)),
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Snapshot of the active table; a concurrent reload does not affect it
    pub async fn table(&self) -> Arc<CorrectionTable> {
        Arc::clone(&*self.table.read().await)
    }

    pub async fn replace_table(&self, table: CorrectionTable) {
        *self.table.write().await = Arc::new(table);
    }

    /// Re-read the configured table file.
    ///
    /// On failure the current table stays active. Returns `Ok(false)` when
    /// no table file is configured.
    pub async fn reload_table(&self) -> Result<bool, TableError> {
        let Some(path) = self.config.correction.table_file.as_deref() else {
            return Ok(false);
        };
        let table = CorrectionTable::from_file(path)?;
        logger::log_info(&format!(
            "[Table] Reloaded {} categories from {path}",
            table.category_count()
        ));
        self.replace_table(table).await;
        Ok(true)
    }

    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}
