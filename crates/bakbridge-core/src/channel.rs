use bakbridge_protocol::{
    ASK_DESTINATION, BACKEND_SET_DESTINATION, BackendCall, CallMessage, GET_LOCATIONS, UiCall,
};
use crossbeam_channel::Sender;
use tokio::sync::oneshot;

use crate::backend::{Backend, Reply};
use crate::error::{BridgeError, Result};

/// Sending half of the backend → UI push channel.
pub type UiSender = tokio::sync::mpsc::UnboundedSender<UiCall>;

/// Receiving half of the backend → UI push channel, drained by the event loop.
pub type UiReceiver = tokio::sync::mpsc::UnboundedReceiver<UiCall>;

/// An intent queued for the backend worker.
#[derive(Debug)]
pub enum BackendCommand {
    Init,
    GetLocations { reply: oneshot::Sender<Vec<String>> },
    AddLocation,
    RemoveLocation { path: String },
    AskDestination { reply: oneshot::Sender<String> },
    SetDestination { path: String, reply: oneshot::Sender<bool> },
    SetOverwrite { value: bool },
    Backup,
}

impl BackendCommand {
    /// The named call this command stands for on the bridge.
    pub fn call(&self) -> BackendCall {
        match self {
            BackendCommand::Init => BackendCall::Init,
            BackendCommand::GetLocations { .. } => BackendCall::GetLocations,
            BackendCommand::AddLocation => BackendCall::AddLocation,
            BackendCommand::RemoveLocation { path } => BackendCall::RemoveLocation(path.clone()),
            BackendCommand::AskDestination { .. } => BackendCall::AskDestination,
            BackendCommand::SetDestination { path, .. } => {
                BackendCall::SetDestination(path.clone())
            }
            BackendCommand::SetOverwrite { value } => BackendCall::SetOverwrite(*value),
            BackendCommand::Backup => BackendCall::Backup,
        }
    }
}

/// [`Backend`] that queues commands for a worker thread.
#[derive(Debug, Clone)]
pub struct ChannelBackend {
    tx: Sender<BackendCommand>,
}

impl ChannelBackend {
    pub fn new(tx: Sender<BackendCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, cmd: BackendCommand) -> Result<()> {
        tracing::info!(function = cmd.call().name(), "sending intent");
        self.tx.send(cmd)?;
        Ok(())
    }
}

impl Backend for ChannelBackend {
    fn init(&self) -> Result<()> {
        self.send(BackendCommand::Init)
    }

    fn get_locations(&self) -> Result<Reply<Vec<String>>> {
        let (reply, pending) = Reply::channel(GET_LOCATIONS);
        self.send(BackendCommand::GetLocations { reply })?;
        Ok(pending)
    }

    fn add_location(&self) -> Result<()> {
        self.send(BackendCommand::AddLocation)
    }

    fn remove_location(&self, path: &str) -> Result<()> {
        self.send(BackendCommand::RemoveLocation {
            path: path.to_string(),
        })
    }

    fn ask_destination(&self) -> Result<Reply<String>> {
        let (reply, pending) = Reply::channel(ASK_DESTINATION);
        self.send(BackendCommand::AskDestination { reply })?;
        Ok(pending)
    }

    fn set_destination(&self, path: &str) -> Result<Reply<bool>> {
        let (reply, pending) = Reply::channel(BACKEND_SET_DESTINATION);
        self.send(BackendCommand::SetDestination {
            path: path.to_string(),
            reply,
        })?;
        Ok(pending)
    }

    fn set_overwrite(&self, value: bool) -> Result<()> {
        self.send(BackendCommand::SetOverwrite { value })
    }

    fn backup(&self) -> Result<()> {
        self.send(BackendCommand::Backup)
    }
}

/// Decode one JSON named-call message pushed by a backend.
pub fn parse_ui_call(json: &str) -> Result<UiCall> {
    let msg: CallMessage = serde_json::from_str(json)?;
    UiCall::from_message(&msg).map_err(BridgeError::Protocol)
}
