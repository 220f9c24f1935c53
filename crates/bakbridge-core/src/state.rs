use bakbridge_protocol::{BackupOutcome, NoticeLevel};

/// Backup lifecycle as observed from the UI side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackupPhase {
    #[default]
    Idle,
    Running,
    /// Set only by an explicit finished push, never inferred.
    Finished(BackupOutcome),
}

/// A message for the user that is not status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Scalar UI state. Owned by the UI side; the backend only pushes
/// replacement values.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    destination: String,
    overwrite: bool,
    progress: i64,
    status: String,
    backup_enabled: bool,
    phase: BackupPhase,
    notices: Vec<Notice>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            destination: String::new(),
            overwrite: false,
            progress: 0,
            status: String::new(),
            backup_enabled: true,
            phase: BackupPhase::Idle,
            notices: Vec::new(),
        }
    }
}

impl UiState {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn progress(&self) -> i64 {
        self.progress
    }

    /// Width of the progress indicator as a fraction of the full bar.
    ///
    /// Follows `progress` proportionally and unclamped: 150 renders as 1.5.
    pub fn progress_ratio(&self) -> f64 {
        self.progress as f64 / 100.0
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn backup_enabled(&self) -> bool {
        self.backup_enabled
    }

    pub fn phase(&self) -> &BackupPhase {
        &self.phase
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices, e.g. once they have been shown.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn set_destination(&mut self, text: String) {
        self.destination = text;
    }

    pub(crate) fn set_overwrite(&mut self, value: bool) {
        self.overwrite = value;
    }

    pub(crate) fn set_progress(&mut self, value: i64) {
        self.progress = value;
    }

    pub(crate) fn set_status(&mut self, text: String) {
        self.status = text;
    }

    pub(crate) fn set_backup_disabled(&mut self, disabled: bool) {
        self.backup_enabled = !disabled;
        // Legacy completion signal: a re-enabled button ends a running backup
        // with no known outcome.
        if !disabled && self.phase == BackupPhase::Running {
            self.phase = BackupPhase::Idle;
        }
    }

    pub(crate) fn begin_backup(&mut self) {
        self.progress = 0;
        self.status.clear();
        self.phase = BackupPhase::Running;
    }

    pub(crate) fn finish_backup(&mut self, outcome: BackupOutcome) {
        self.phase = BackupPhase::Finished(outcome);
    }

    pub(crate) fn push_notice(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }
}
