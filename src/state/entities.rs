use std::fmt::Display;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Category every transaction ends up with when none was given.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Normal,
    Extra,
    Night,
    Holiday,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [
        WorkType::Normal,
        WorkType::Extra,
        WorkType::Night,
        WorkType::Holiday,
    ];
}

impl Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkType::Normal => write!(f, "normal"),
            WorkType::Extra => write!(f, "extra"),
            WorkType::Night => write!(f, "night"),
            WorkType::Holiday => write!(f, "holiday"),
        }
    }
}

/// A single span of tracked work. While `end_time` is absent the session is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub break_duration_minutes: u32,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    /// Hourly rate at the moment the session was created. Older records may not have it.
    #[serde(default)]
    pub hourly_rate_snapshot: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub normal: f64,
    pub extra: f64,
    pub night: f64,
    pub holiday: f64,
}

impl Multipliers {
    pub fn get(&self, work_type: WorkType) -> f64 {
        match work_type {
            WorkType::Normal => self.normal,
            WorkType::Extra => self.extra,
            WorkType::Night => self.night,
            WorkType::Holiday => self.holiday,
        }
    }

    pub fn set(&mut self, work_type: WorkType, value: f64) {
        match work_type {
            WorkType::Normal => self.normal = value,
            WorkType::Extra => self.extra = value,
            WorkType::Night => self.night = value,
            WorkType::Holiday => self.holiday = value,
        }
    }
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            normal: 1.,
            extra: 1.5,
            night: 1.2,
            holiday: 2.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub currency: String,
    pub hourly_rate: f64,
    pub multipliers: Multipliers,
    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: "BRL".into(),
            hourly_rate: 50.,
            multipliers: Multipliers::default(),
            dark_mode: false,
        }
    }
}

/// Partial update of [AppSettings]. Only the fields that are `Some` get changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub currency: Option<String>,
    pub hourly_rate: Option<f64>,
    pub multipliers: Vec<(WorkType, f64)>,
    pub dark_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.hourly_rate.is_none()
            && self.multipliers.is_empty()
            && self.dark_mode.is_none()
    }

    pub fn apply_to(self, settings: &mut AppSettings) {
        if let Some(currency) = self.currency {
            settings.currency = currency;
        }
        if let Some(rate) = self.hourly_rate {
            settings.hourly_rate = rate;
        }
        for (work_type, value) in self.multipliers {
            settings.multipliers.set(work_type, value);
        }
        if let Some(dark_mode) = self.dark_mode {
            settings.dark_mode = dark_mode;
        }
    }
}

/// The aggregate root that gets persisted as a whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Newest first.
    pub sessions: Vec<WorkSession>,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub settings: AppSettings,
    #[serde(default)]
    pub active_session_id: Option<String>,
}

impl AppState {
    pub fn active_session(&self) -> Option<&WorkSession> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Brings the stored state back to at most one open session, referenced by the active pointer.
    ///
    /// The pointed-to session is kept when it is open, otherwise the most recently started open
    /// session becomes active. Every other open session is closed at the start of the kept one,
    /// or at its own start if it began later. Returns true if anything changed.
    pub fn repair_open_sessions(&mut self) -> bool {
        let pointed = self
            .active_session()
            .filter(|s| s.is_open())
            .map(|s| (s.id.clone(), s.start_time));
        let kept = pointed.or_else(|| {
            self.sessions
                .iter()
                .filter(|s| s.is_open())
                .max_by_key(|s| s.start_time)
                .map(|s| (s.id.clone(), s.start_time))
        });

        let kept_id = kept.as_ref().map(|(id, _)| id.clone());
        let mut changed = self.active_session_id != kept_id;
        self.active_session_id = kept_id;

        if let Some((id, kept_start)) = kept {
            for session in self.sessions.iter_mut() {
                if session.is_open() && session.id != id {
                    session.end_time = Some(session.start_time.max(kept_start));
                    changed = true;
                }
            }
        }
        changed
    }
}
