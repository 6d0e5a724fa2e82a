use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::utils::{clock::Clock, id::generate_id};

use super::{
    entities::{
        AppState, SettingsPatch, Transaction, TransactionType, WorkSession, WorkType,
        DEFAULT_CATEGORY,
    },
    error::SessionError,
    persistence::{restore_state, StateStorage},
};

/// Session entered by hand, usually after the fact.
#[derive(Debug, Clone)]
pub struct ManualSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub break_duration_minutes: u32,
    pub work_type: WorkType,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// Owner of [AppState]. All changes go through the operations below and every change is written
/// to the storage before the operation returns.
pub struct Store<S: StateStorage> {
    state: AppState,
    storage: S,
    clock: Box<dyn Clock>,
}

impl<S: StateStorage> Store<S> {
    /// Restores the stored state, falling back to defaults when there is nothing usable.
    pub async fn open(storage: S, clock: Box<dyn Clock>) -> Self {
        let state = restore_state(&storage).await;
        Self::with_state(state, storage, clock)
    }

    pub fn with_state(state: AppState, storage: S, clock: Box<dyn Clock>) -> Self {
        Self {
            state,
            storage,
            clock,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    pub fn active_session(&self) -> Option<&WorkSession> {
        self.state.active_session()
    }

    async fn persist(&self) -> Result<()> {
        self.storage.save(&self.state).await
    }

    #[instrument(skip(self))]
    pub async fn update_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        patch.apply_to(&mut self.state.settings);
        info!("Updated settings");
        self.persist().await
    }

    /// Starts a timed session and makes it the active one. A session that is still running gets
    /// stopped first, so there is never more than one open session.
    #[instrument(skip(self))]
    pub async fn start_session(&mut self, description: &str, work_type: WorkType) -> Result<String> {
        let description = validate_description(description)?;
        let now = self.clock.time();

        if let Some(previous) = self.close_active(now) {
            warn!("Session {previous} was still running, stopped it before starting a new one");
        }

        let session = WorkSession {
            id: generate_id(),
            start_time: now,
            end_time: None,
            break_duration_minutes: 0,
            work_type,
            hourly_rate_snapshot: Some(self.state.settings.hourly_rate),
            description,
        };
        let id = session.id.clone();
        self.state.sessions.insert(0, session);
        self.state.active_session_id = Some(id.clone());

        info!("Started session {id}");
        self.persist().await?;
        Ok(id)
    }

    /// Stops the running session. Returns its id, or `None` when nothing was running.
    #[instrument(skip(self))]
    pub async fn stop_session(&mut self) -> Result<Option<String>> {
        let now = self.clock.time();
        let Some(id) = self.close_active(now) else {
            debug!("No active session to stop");
            return Ok(None);
        };

        info!("Stopped session {id}");
        self.persist().await?;
        Ok(Some(id))
    }

    fn close_active(&mut self, now: DateTime<Utc>) -> Option<String> {
        let id = self.state.active_session_id.take()?;
        if let Some(session) = self.state.sessions.iter_mut().find(|s| s.id == id) {
            session.end_time = Some(now);
        }
        Some(id)
    }

    /// Adds an already finished session. It never becomes active.
    #[instrument(skip(self))]
    pub async fn add_manual_session(&mut self, manual: ManualSession) -> Result<String> {
        let description = validate_description(&manual.description)?;
        if manual.end_time < manual.start_time {
            return Err(SessionError::EndBeforeStart.into());
        }

        let session = WorkSession {
            id: generate_id(),
            start_time: manual.start_time,
            end_time: Some(manual.end_time),
            break_duration_minutes: manual.break_duration_minutes,
            work_type: manual.work_type,
            hourly_rate_snapshot: Some(self.state.settings.hourly_rate),
            description,
        };
        let id = session.id.clone();
        self.state.sessions.insert(0, session);

        info!("Added manual session {id}");
        self.persist().await?;
        Ok(id)
    }

    /// Removes a session. Deleting the running session also clears the active pointer.
    #[instrument(skip(self))]
    pub async fn delete_session(&mut self, id: &str) -> Result<bool> {
        let before = self.state.sessions.len();
        self.state.sessions.retain(|s| s.id != id);
        if self.state.sessions.len() == before {
            debug!("Session {id} not found");
            return Ok(false);
        }

        if self.state.active_session_id.as_deref() == Some(id) {
            self.state.active_session_id = None;
        }

        info!("Deleted session {id}");
        self.persist().await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn add_transaction(&mut self, transaction: NewTransaction) -> Result<String> {
        let category = match transaction.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            v => v.to_string(),
        };
        let transaction = Transaction {
            id: generate_id(),
            kind: transaction.kind,
            amount: transaction.amount,
            category,
            date: transaction.date,
            description: transaction.description,
        };
        let id = transaction.id.clone();
        self.state.transactions.insert(0, transaction);

        info!("Added transaction {id}");
        self.persist().await?;
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let before = self.state.transactions.len();
        self.state.transactions.retain(|t| t.id != id);
        if self.state.transactions.len() == before {
            debug!("Transaction {id} not found");
            return Ok(false);
        }

        info!("Deleted transaction {id}");
        self.persist().await?;
        Ok(true)
    }
}

fn validate_description(description: &str) -> Result<String, SessionError> {
    let description = description.trim();
    if description.is_empty() {
        Err(SessionError::EmptyDescription)
    } else {
        Ok(description.to_string())
    }
}
