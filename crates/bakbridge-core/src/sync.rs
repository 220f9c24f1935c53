//! Keeps the UI-side list and scalar state consistent with the backend.
//!
//! Inbound pushes replace state wholesale and never fail. Outbound intents
//! apply their local effect first, then cross the bridge; the only error an
//! intent can report is that the backend is unreachable.

use bakbridge_protocol::{BackupOutcome, NoticeLevel, UiCall};

use crate::backend::{Backend, Reply};
use crate::error::Result;
use crate::list::{EntryId, SelectionList};
use crate::state::{Notice, UiState};

/// Something the user did on the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    AddBackup,
    RemoveBackup,
    ToggleEntry(EntryId),
    ChooseDestination,
    SetOverwrite(bool),
    StartBackup,
}

pub struct Synchronizer<B> {
    list: SelectionList,
    state: UiState,
    backend: B,
}

impl<B: Backend> Synchronizer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            list: SelectionList::new(),
            state: UiState::default(),
            backend,
        }
    }

    pub fn list(&self) -> &SelectionList {
        &self.list
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    pub fn into_parts(self) -> (SelectionList, UiState, B) {
        (self.list, self.state, self.backend)
    }

    /// Ask the backend to push its current state.
    pub fn connect(&self) -> Result<()> {
        self.backend.init()
    }

    // ── Inbound (backend → UI) ─────────────────────────────────────────

    pub fn apply(&mut self, call: UiCall) {
        tracing::debug!(function = call.name(), "applying push");
        match call {
            UiCall::AddListItem(text) => {
                self.add_list_item(text);
            }
            UiCall::ResetList => self.reset_list(),
            UiCall::SetDestination(text) => self.set_destination(text),
            UiCall::SetOverwrite(value) => self.set_overwrite(value),
            UiCall::SetProgress(value) => self.set_progress(value),
            UiCall::SetStatusText(text) => self.set_status_text(text),
            UiCall::BackupDisabled(value) => self.backup_disabled(value),
            UiCall::BackupFinished(outcome) => self.backup_finished(outcome),
            UiCall::Notify { level, message } => self.notify(level, message),
        }
    }

    pub fn add_list_item(&mut self, text: impl Into<String>) -> EntryId {
        self.list.add(text)
    }

    pub fn reset_list(&mut self) {
        self.list.reset();
    }

    pub fn set_destination(&mut self, text: impl Into<String>) {
        self.state.set_destination(text.into());
    }

    pub fn set_overwrite(&mut self, value: bool) {
        self.state.set_overwrite(value);
    }

    /// Applied as-is; out-of-range values are the sender's problem.
    pub fn set_progress(&mut self, value: i64) {
        self.state.set_progress(value);
    }

    pub fn set_status_text(&mut self, text: impl Into<String>) {
        self.state.set_status(text.into());
    }

    pub fn backup_disabled(&mut self, value: bool) {
        self.state.set_backup_disabled(value);
    }

    pub fn backup_finished(&mut self, outcome: BackupOutcome) {
        if let BackupOutcome::Failed { reason } = &outcome {
            tracing::warn!(%reason, "backend reported failed backup");
        }
        self.state.finish_backup(outcome);
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.push_notice(level, message.into());
    }

    // ── Outbound (UI → backend) ────────────────────────────────────────

    /// The chosen folder arrives later as an `add_list_item` push.
    pub fn add_backup(&self) -> Result<()> {
        self.backend.add_location()
    }

    pub fn toggle_selection(&mut self, path: &str) -> bool {
        self.list.toggle_selection(path)
    }

    pub fn toggle_entry(&mut self, id: EntryId) -> bool {
        self.list.toggle_entry(id)
    }

    /// Drop the selected entries from the list, then tell the backend about
    /// each removed path in display order.
    ///
    /// Every intent is attempted; the first failure is returned.
    pub fn remove_backup(&mut self) -> Result<Vec<String>> {
        let removed = self.list.remove_selected();
        let mut first_err = None;
        for path in &removed {
            if let Err(e) = self.backend.remove_location(path) {
                tracing::warn!(%path, "remove intent not delivered: {e}");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    /// Send the destination query without waiting for its answer.
    pub fn request_destination(&self) -> Result<Reply<String>> {
        self.backend.ask_destination()
    }

    /// Query the backend for a destination and apply its answer.
    pub async fn choose_destination(&mut self) -> Result<String> {
        let path = self.request_destination()?.await?;
        self.set_destination(path.clone());
        Ok(path)
    }

    /// The checkbox already shows `value`; keep the state in step and forward it.
    pub fn toggle_overwrite(&mut self, value: bool) -> Result<()> {
        self.state.set_overwrite(value);
        self.backend.set_overwrite(value)
    }

    /// Reset progress and status locally, then ask the backend to start.
    pub fn start_backup(&mut self) -> Result<()> {
        self.state.begin_backup();
        self.backend.backup()
    }

    /// Route a user action to its operation.
    ///
    /// A `StartBackup` while the button is disabled is swallowed, the way a
    /// disabled button swallows clicks. `ChooseDestination` hands back the
    /// pending reply for the caller to await.
    pub fn dispatch(&mut self, action: UserAction) -> Result<Option<Reply<String>>> {
        match action {
            UserAction::AddBackup => self.add_backup()?,
            UserAction::RemoveBackup => {
                self.remove_backup()?;
            }
            UserAction::ToggleEntry(id) => {
                self.toggle_entry(id);
            }
            UserAction::ChooseDestination => return self.request_destination().map(Some),
            UserAction::SetOverwrite(value) => self.toggle_overwrite(value)?,
            UserAction::StartBackup => {
                if !self.state.backup_enabled() {
                    tracing::debug!("backup button disabled; ignoring click");
                } else {
                    self.start_backup()?;
                }
            }
        }
        Ok(None)
    }
}
