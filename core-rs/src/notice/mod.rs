//! User-facing denial notices
//!
//! The noisy decision path hands a [`Notice`] to a [`NoticeSink`] and moves
//! on; nothing is returned or acknowledged.

use crate::rbac::model::{Action, Module};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

/// Default time a notice stays on screen
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 4000;

const DENIAL_DESCRIPTION: &str = "يرجى التواصل مع المشرف أو مدير النظام للحصول على الصلاحية";

/// Transient message for the end user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    pub description: String,
    pub duration_ms: u64,
    pub issued_at: DateTime<Utc>,
}

/// Notice settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

fn default_duration_ms() -> u64 {
    DEFAULT_NOTICE_DURATION_MS
}

impl Default for NoticeConfig {
    fn default() -> Self {
        NoticeConfig {
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }
}

impl Notice {
    /// Denial notice naming the attempted action and module
    pub fn permission_denied(module: Module, action: Action, config: &NoticeConfig) -> Self {
        Notice {
            message: format!(
                "ليس لديك صلاحية {} في {}",
                action.display_name(),
                module.display_name()
            ),
            description: DENIAL_DESCRIPTION.to_string(),
            duration_ms: config.duration_ms,
            issued_at: Utc::now(),
        }
    }
}

/// Fire-and-forget notice destination
pub trait NoticeSink {
    fn notify(&self, notice: Notice);
}

impl<S: NoticeSink + ?Sized> NoticeSink for &S {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Keeps every notice in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl NoticeSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}

/// Writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn notify(&self, notice: Notice) {
        info!(
            text = %notice.message,
            description = %notice.description,
            duration_ms = notice.duration_ms,
            "notice"
        );
    }
}
