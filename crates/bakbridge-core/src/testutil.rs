use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use bakbridge_protocol::{
    ASK_DESTINATION, BACKEND_SET_DESTINATION, BackendCall, GET_LOCATIONS, UiCall,
};
use tokio::sync::oneshot;

use crate::backend::{Backend, Reply};
use crate::error::{BridgeError, Result};
use crate::worker::{BackupJob, BackupRunner, FolderPicker, ProgressSink};

/// Backend that records every intent. Thread-safe via Mutex.
///
/// Destination queries are answered immediately when an answer is set,
/// otherwise they stay open until [`RecordingBackend::resolve_destination`].
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    answer: Mutex<Option<String>>,
    open_replies: Mutex<VecDeque<oneshot::Sender<String>>>,
    disconnected: Mutex<bool>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(path: &str) -> Self {
        let backend = Self::default();
        *backend.answer.lock().unwrap() = Some(path.to_string());
        backend
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn disconnect(&self) {
        *self.disconnected.lock().unwrap() = true;
    }

    /// Answer the oldest open destination query. Returns false if none is open.
    pub fn resolve_destination(&self, path: &str) -> bool {
        match self.open_replies.lock().unwrap().pop_front() {
            Some(tx) => tx.send(path.to_string()).is_ok(),
            None => false,
        }
    }

    /// Drop the oldest open destination query unanswered.
    pub fn drop_destination(&self) -> bool {
        self.open_replies.lock().unwrap().pop_front().is_some()
    }

    fn record(&self, call: BackendCall) -> Result<()> {
        if *self.disconnected.lock().unwrap() {
            return Err(BridgeError::Disconnected);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn init(&self) -> Result<()> {
        self.record(BackendCall::Init)
    }

    fn get_locations(&self) -> Result<Reply<Vec<String>>> {
        self.record(BackendCall::GetLocations)?;
        Ok(Reply::ready(GET_LOCATIONS, Vec::new()))
    }

    fn add_location(&self) -> Result<()> {
        self.record(BackendCall::AddLocation)
    }

    fn remove_location(&self, path: &str) -> Result<()> {
        self.record(BackendCall::RemoveLocation(path.to_string()))
    }

    fn ask_destination(&self) -> Result<Reply<String>> {
        self.record(BackendCall::AskDestination)?;
        if let Some(path) = self.answer.lock().unwrap().clone() {
            return Ok(Reply::ready(ASK_DESTINATION, path));
        }
        let (tx, reply) = Reply::channel(ASK_DESTINATION);
        self.open_replies.lock().unwrap().push_back(tx);
        Ok(reply)
    }

    fn set_destination(&self, path: &str) -> Result<Reply<bool>> {
        self.record(BackendCall::SetDestination(path.to_string()))?;
        Ok(Reply::ready(BACKEND_SET_DESTINATION, !path.is_empty()))
    }

    fn set_overwrite(&self, value: bool) -> Result<()> {
        self.record(BackendCall::SetOverwrite(value))
    }

    fn backup(&self) -> Result<()> {
        self.record(BackendCall::Backup)
    }
}

/// Picker returning queued answers in order, then cancelling.
pub struct ScriptedPicker {
    answers: VecDeque<Option<PathBuf>>,
    pub titles: Vec<String>,
}

impl ScriptedPicker {
    pub fn new(answers: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            titles: Vec::new(),
        }
    }
}

impl FolderPicker for ScriptedPicker {
    fn pick_folder(&mut self, title: &str) -> Option<PathBuf> {
        self.titles.push(title.to_string());
        self.answers.pop_front().flatten()
    }
}

/// Runner that reports a fixed progress script and then succeeds or fails.
#[derive(Default)]
pub struct ScriptedRunner {
    pub steps: Vec<(i64, String)>,
    pub fail_with: Option<String>,
    pub jobs: Vec<BackupJob>,
}

impl BackupRunner for ScriptedRunner {
    fn run(&mut self, job: &BackupJob, sink: &mut dyn ProgressSink) -> Result<()> {
        self.jobs.push(job.clone());
        for (percent, text) in &self.steps {
            sink.progress(*percent);
            sink.status(text);
        }
        match &self.fail_with {
            Some(reason) => Err(BridgeError::Backup(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Collect every push currently queued on `rx`.
pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<UiCall>) -> Vec<UiCall> {
    let mut out = Vec::new();
    while let Ok(call) = rx.try_recv() {
        out.push(call);
    }
    out
}
