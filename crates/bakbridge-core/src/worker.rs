//! Reference backend: serves UI intents from a [`LocationBook`] on its own
//! thread and pushes the resulting updates back to the UI.
//!
//! Picking folders and copying files are left to the [`FolderPicker`] and
//! [`BackupRunner`] the worker is built with.

use std::path::{Component, Path, PathBuf};
use std::thread::{self, JoinHandle};

use bakbridge_protocol::{BackupOutcome, NoticeLevel, UiCall};
use crossbeam_channel::Receiver;

use crate::channel::{BackendCommand, ChannelBackend, UiReceiver, UiSender};
use crate::error::Result;
use crate::store::LocationBook;

pub const ADD_LOCATION_TITLE: &str = "Add backup folder";
pub const DESTINATION_TITLE: &str = "Choose backup destination";

const STATUS_VALIDATING: &str = "Validating paths ...";
const STATUS_SUCCEEDED: &str = "Backup successful.";

/// Interactive folder chooser. `None` means the user cancelled.
pub trait FolderPicker: Send {
    fn pick_folder(&mut self, title: &str) -> Option<PathBuf>;
}

/// Snapshot of the book taken when a backup starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupJob {
    pub locations: Vec<String>,
    pub destination: String,
    pub overwrite: bool,
}

/// Where a running backup reports to.
pub trait ProgressSink {
    fn progress(&mut self, percent: i64);
    fn status(&mut self, text: &str);
}

/// The engine that performs a backup.
pub trait BackupRunner: Send {
    fn run(&mut self, job: &BackupJob, sink: &mut dyn ProgressSink) -> Result<()>;
}

struct UiSink<'a> {
    ui_tx: &'a UiSender,
}

impl ProgressSink for UiSink<'_> {
    fn progress(&mut self, percent: i64) {
        send_ui(self.ui_tx, UiCall::SetProgress(percent));
    }

    fn status(&mut self, text: &str) {
        send_ui(self.ui_tx, UiCall::SetStatusText(text.to_string()));
    }
}

fn send_ui(ui_tx: &UiSender, call: UiCall) {
    let _ = ui_tx.send(call);
}

fn send_notice(ui_tx: &UiSender, level: NoticeLevel, message: impl Into<String>) {
    send_ui(
        ui_tx,
        UiCall::Notify {
            level,
            message: message.into(),
        },
    );
}

struct Failure {
    title: &'static str,
    detail: String,
}

impl Failure {
    fn validation(detail: String) -> Self {
        Self {
            title: "Validation error",
            detail,
        }
    }

    fn message(&self) -> String {
        format!("{}. {}", self.title, self.detail)
    }
}

pub struct Worker<P, R> {
    book: LocationBook,
    picker: P,
    runner: R,
    ui_tx: UiSender,
}

impl<P: FolderPicker, R: BackupRunner> Worker<P, R> {
    pub fn new(book: LocationBook, picker: P, runner: R, ui_tx: UiSender) -> Self {
        Self {
            book,
            picker,
            runner,
            ui_tx,
        }
    }

    pub fn book(&self) -> &LocationBook {
        &self.book
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Serve commands until every sender is gone; hands back the book.
    pub fn run(mut self, cmd_rx: Receiver<BackendCommand>) -> LocationBook {
        while let Ok(cmd) = cmd_rx.recv() {
            self.handle(cmd);
        }
        tracing::debug!("command channel closed; worker exiting");
        self.book
    }

    pub fn handle(&mut self, cmd: BackendCommand) {
        tracing::debug!(function = cmd.call().name(), "handling intent");
        match cmd {
            BackendCommand::Init => self.push_state(),
            BackendCommand::GetLocations { reply } => {
                if reply.send(self.book.locations().to_vec()).is_err() {
                    tracing::debug!("locations reply dropped by UI");
                }
            }
            BackendCommand::AddLocation => self.add_location(),
            BackendCommand::RemoveLocation { path } => self.remove_location(&path),
            BackendCommand::AskDestination { reply } => {
                let destination = self.ask_destination();
                if reply.send(destination).is_err() {
                    tracing::debug!("destination reply dropped by UI");
                }
            }
            BackendCommand::SetDestination { path, reply } => {
                let accepted = self.set_destination(&path);
                if reply.send(accepted).is_err() {
                    tracing::debug!("destination reply dropped by UI");
                }
            }
            BackendCommand::SetOverwrite { value } => {
                if let Err(e) = self.book.set_overwrite(value) {
                    self.report_save_error(e);
                }
            }
            BackendCommand::Backup => self.backup(),
        }
    }

    fn push_state(&self) {
        send_ui(&self.ui_tx, UiCall::ResetList);
        for location in self.book.locations() {
            send_ui(&self.ui_tx, UiCall::AddListItem(location.clone()));
        }
        send_ui(
            &self.ui_tx,
            UiCall::SetDestination(self.book.destination().to_string()),
        );
        send_ui(&self.ui_tx, UiCall::SetOverwrite(self.book.overwrite()));
    }

    fn add_location(&mut self) {
        let Some(picked) = self.picker.pick_folder(ADD_LOCATION_TITLE) else {
            tracing::debug!("add location cancelled");
            return;
        };
        let location = picked.to_string_lossy().to_string();
        match self.book.add_location(&location) {
            Ok(true) => {
                tracing::info!(%location, "location added");
                send_ui(&self.ui_tx, UiCall::AddListItem(location));
            }
            Ok(false) => {}
            Err(e) => self.report_save_error(e),
        }
    }

    fn remove_location(&mut self, location: &str) {
        match self.book.remove_location(location) {
            Ok(true) => tracing::info!(%location, "location removed"),
            Ok(false) => tracing::warn!(%location, "remove requested for unknown location"),
            Err(e) => self.report_save_error(e),
        }
    }

    /// A picked directory becomes the destination; anything else keeps the
    /// current one.
    fn ask_destination(&mut self) -> String {
        if let Some(picked) = self.picker.pick_folder(DESTINATION_TITLE) {
            let candidate = picked.to_string_lossy().to_string();
            match self.book.set_destination(&candidate) {
                Ok(true) => {
                    tracing::info!(destination = %candidate, "destination set");
                    return candidate;
                }
                Ok(false) => tracing::info!(%candidate, "destination rejected"),
                Err(e) => self.report_save_error(e),
            }
        }
        self.book.destination().to_string()
    }

    fn set_destination(&mut self, destination: &str) -> bool {
        match self.book.set_destination(destination) {
            Ok(accepted) => {
                tracing::info!(%destination, accepted, "destination set directly");
                accepted
            }
            Err(e) => {
                self.report_save_error(e);
                false
            }
        }
    }

    fn backup(&mut self) {
        send_ui(&self.ui_tx, UiCall::BackupDisabled(true));
        send_ui(&self.ui_tx, UiCall::SetStatusText(STATUS_VALIDATING.to_string()));
        send_ui(&self.ui_tx, UiCall::SetProgress(1));

        let job = BackupJob {
            locations: self.book.locations().to_vec(),
            destination: self.book.destination().to_string(),
            overwrite: self.book.overwrite(),
        };
        tracing::info!(
            sources = job.locations.len(),
            destination = %job.destination,
            overwrite = job.overwrite,
            "backup starting"
        );

        let result = self.validate(&job).and_then(|()| {
            let mut sink = UiSink { ui_tx: &self.ui_tx };
            self.runner.run(&job, &mut sink).map_err(|e| Failure {
                title: "Backup error",
                detail: e.to_string(),
            })
        });

        match result {
            Ok(()) => {
                tracing::info!("backup finished");
                send_ui(&self.ui_tx, UiCall::SetStatusText(STATUS_SUCCEEDED.to_string()));
                send_ui(&self.ui_tx, UiCall::SetProgress(100));
                send_ui(&self.ui_tx, UiCall::BackupFinished(BackupOutcome::Succeeded));
            }
            Err(failure) => {
                let message = failure.message();
                tracing::warn!("backup failed: {message}");
                send_ui(&self.ui_tx, UiCall::SetStatusText(message.clone()));
                send_notice(&self.ui_tx, NoticeLevel::Error, message);
                send_ui(
                    &self.ui_tx,
                    UiCall::BackupFinished(BackupOutcome::Failed {
                        reason: failure.detail,
                    }),
                );
            }
        }

        send_ui(&self.ui_tx, UiCall::BackupDisabled(false));
    }

    /// Sources first, then the destination.
    fn validate(&self, job: &BackupJob) -> std::result::Result<(), Failure> {
        if let Some(invalid) = self.book.invalid_locations().first() {
            return Err(Failure::validation(invalid.to_string()));
        }
        validate_destination(&job.destination).map_err(Failure::validation)
    }

    fn report_save_error(&self, e: crate::error::BridgeError) {
        tracing::warn!("failed to save location book: {e}");
        send_notice(
            &self.ui_tx,
            NoticeLevel::Error,
            format!("Could not save backup settings: {e}"),
        );
    }
}

/// The destination must be an existing directory. A missing destination
/// whose drive or root is also missing is reported as such.
fn validate_destination(destination: &str) -> std::result::Result<(), String> {
    if destination.is_empty() {
        return Err("No destination set.".to_string());
    }
    let path = Path::new(destination);
    if !path.exists() {
        if let Some(root @ (Component::Prefix(_) | Component::RootDir)) = path.components().next() {
            let root = Path::new(root.as_os_str());
            if !root.exists() {
                return Err(format!("Drive \"{}\" not found.", root.display()));
            }
        }
    }
    if !path.is_dir() {
        return Err(destination.to_string());
    }
    Ok(())
}

/// Start a worker thread and return the UI's handles to it.
///
/// The worker exits once every clone of the returned backend is dropped.
pub fn spawn_worker<P, R>(
    book: LocationBook,
    picker: P,
    runner: R,
) -> Result<(ChannelBackend, UiReceiver, JoinHandle<LocationBook>)>
where
    P: FolderPicker + 'static,
    R: BackupRunner + 'static,
{
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<BackendCommand>();
    let (ui_tx, ui_rx) = tokio::sync::mpsc::unbounded_channel::<UiCall>();

    let worker = Worker::new(book, picker, runner, ui_tx);
    let handle = thread::Builder::new()
        .name("bakbridge-worker".into())
        .spawn(move || worker.run(cmd_rx))?;

    Ok((ChannelBackend::new(cmd_tx), ui_rx, handle))
}
