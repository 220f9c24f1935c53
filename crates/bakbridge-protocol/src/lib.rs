//! Shared named-call vocabulary for the bakbridge UI ↔ backend bridge.
//!
//! Function names, the call/return message envelope and argument
//! validation. No transport, no UI state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Function names ─────────────────────────────────────────────────────────

pub const ADD_LIST_ITEM: &str = "add_list_item";
pub const RESET_LIST: &str = "reset_list";
pub const SET_DESTINATION: &str = "set_destination";
pub const SET_OVERWRITE: &str = "set_overwrite";
pub const SET_PROGRESS: &str = "set_progress";
pub const SET_STATUS_TEXT: &str = "set_status_text";
pub const BACKUP_DISABLED: &str = "backup_disabled";
pub const BACKUP_FINISHED: &str = "backup_finished";
pub const NOTIFY: &str = "notify";

/// Functions the UI exposes for the backend to invoke.
pub const UI_FUNCTIONS: &[&str] = &[
    ADD_LIST_ITEM,
    RESET_LIST,
    SET_DESTINATION,
    SET_OVERWRITE,
    SET_PROGRESS,
    SET_STATUS_TEXT,
    BACKUP_DISABLED,
    BACKUP_FINISHED,
    NOTIFY,
];

pub const GET_LOCATIONS: &str = "getLocations";
pub const ADD_LOCATION: &str = "addLocation";
pub const REMOVE_LOCATION: &str = "removeLocation";
pub const ASK_DESTINATION: &str = "askDestination";
pub const BACKEND_SET_DESTINATION: &str = "setDestination";
pub const BACKEND_SET_OVERWRITE: &str = "setOverwrite";
pub const BACKUP: &str = "backup";
pub const INIT: &str = "init";

/// Functions the backend exposes for the UI to invoke.
pub const BACKEND_FUNCTIONS: &[&str] = &[
    GET_LOCATIONS,
    ADD_LOCATION,
    REMOVE_LOCATION,
    ASK_DESTINATION,
    BACKEND_SET_DESTINATION,
    BACKEND_SET_OVERWRITE,
    BACKUP,
    INIT,
];

// ── Message envelope ───────────────────────────────────────────────────────

/// A named function invocation crossing the bridge.
///
/// `call` is set only for request/response calls; the peer answers with a
/// [`ReturnMessage`] carrying the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMessage {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<u64>,
}

impl CallMessage {
    pub fn new(name: &str, args: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            args,
            call: None,
        }
    }
}

/// Answer to a request/response [`CallMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMessage {
    #[serde(rename = "return")]
    pub call: u64,
    pub value: Value,
}

impl ReturnMessage {
    pub fn into_string(self) -> Result<String, String> {
        match self.value {
            Value::String(s) => Ok(s),
            ref other => Err(self.mismatch("a string", other)),
        }
    }

    pub fn into_bool(self) -> Result<bool, String> {
        match self.value {
            Value::Bool(b) => Ok(b),
            ref other => Err(self.mismatch("a boolean", other)),
        }
    }

    /// Answer to `getLocations`: an array of paths.
    pub fn into_string_list(self) -> Result<Vec<String>, String> {
        let Value::Array(items) = &self.value else {
            return Err(self.mismatch("an array", &self.value));
        };
        items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.mismatch("an array of strings", &self.value))
    }

    fn mismatch(&self, expected: &str, got: &Value) -> String {
        format!("return {} expected {expected} value, got {got}", self.call)
    }
}

// ── Shared value types ─────────────────────────────────────────────────────

/// Terminal result of a backup run, pushed once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupOutcome {
    Succeeded,
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

// ── UI-exposed calls ───────────────────────────────────────────────────────

/// A backend → UI push.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    AddListItem(String),
    ResetList,
    SetDestination(String),
    SetOverwrite(bool),
    /// Percentage, nominally 0..=100. Not range-checked.
    SetProgress(i64),
    SetStatusText(String),
    /// `true` disables the backup button.
    BackupDisabled(bool),
    BackupFinished(BackupOutcome),
    Notify { level: NoticeLevel, message: String },
}

impl UiCall {
    pub fn name(&self) -> &'static str {
        match self {
            UiCall::AddListItem(_) => ADD_LIST_ITEM,
            UiCall::ResetList => RESET_LIST,
            UiCall::SetDestination(_) => SET_DESTINATION,
            UiCall::SetOverwrite(_) => SET_OVERWRITE,
            UiCall::SetProgress(_) => SET_PROGRESS,
            UiCall::SetStatusText(_) => SET_STATUS_TEXT,
            UiCall::BackupDisabled(_) => BACKUP_DISABLED,
            UiCall::BackupFinished(_) => BACKUP_FINISHED,
            UiCall::Notify { .. } => NOTIFY,
        }
    }

    pub fn to_message(&self) -> CallMessage {
        let args = match self {
            UiCall::AddListItem(text) | UiCall::SetDestination(text) | UiCall::SetStatusText(text) => {
                vec![Value::from(text.as_str())]
            }
            UiCall::ResetList => Vec::new(),
            UiCall::SetOverwrite(value) | UiCall::BackupDisabled(value) => vec![Value::from(*value)],
            UiCall::SetProgress(value) => vec![Value::from(*value)],
            UiCall::BackupFinished(outcome) => {
                vec![serde_json::to_value(outcome).unwrap_or(Value::Null)]
            }
            UiCall::Notify { level, message } => vec![
                serde_json::to_value(level).unwrap_or(Value::Null),
                Value::from(message.as_str()),
            ],
        };
        CallMessage::new(self.name(), args)
    }

    pub fn from_message(msg: &CallMessage) -> Result<Self, String> {
        let name = msg.name.as_str();
        match name {
            ADD_LIST_ITEM => Ok(UiCall::AddListItem(string_arg(msg, 1, 0)?)),
            RESET_LIST => {
                expect_arity(msg, 0)?;
                Ok(UiCall::ResetList)
            }
            SET_DESTINATION => Ok(UiCall::SetDestination(string_arg(msg, 1, 0)?)),
            SET_OVERWRITE => Ok(UiCall::SetOverwrite(bool_arg(msg, 1, 0)?)),
            SET_PROGRESS => Ok(UiCall::SetProgress(progress_arg(msg)?)),
            SET_STATUS_TEXT => Ok(UiCall::SetStatusText(string_arg(msg, 1, 0)?)),
            BACKUP_DISABLED => Ok(UiCall::BackupDisabled(bool_arg(msg, 1, 0)?)),
            BACKUP_FINISHED => {
                let args = expect_arity(msg, 1)?;
                let outcome = serde_json::from_value(args[0].clone())
                    .map_err(|e| format!("{name}: invalid outcome: {e}"))?;
                Ok(UiCall::BackupFinished(outcome))
            }
            NOTIFY => {
                let args = expect_arity(msg, 2)?;
                let level = serde_json::from_value(args[0].clone())
                    .map_err(|e| format!("{name}: invalid notice level: {e}"))?;
                let message = string_arg(msg, 2, 1)?;
                Ok(UiCall::Notify { level, message })
            }
            _ => Err(format!("unknown UI function '{name}'")),
        }
    }
}

// ── Backend-exposed calls ──────────────────────────────────────────────────

/// A UI → backend intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// Request/response: the backend returns its saved locations.
    GetLocations,
    AddLocation,
    RemoveLocation(String),
    /// Request/response: the backend returns the chosen destination path.
    AskDestination,
    /// Request/response: the backend returns whether it accepted the path.
    SetDestination(String),
    SetOverwrite(bool),
    Backup,
    /// Ask the backend to push its current state to the UI.
    Init,
}

impl BackendCall {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCall::GetLocations => GET_LOCATIONS,
            BackendCall::AddLocation => ADD_LOCATION,
            BackendCall::RemoveLocation(_) => REMOVE_LOCATION,
            BackendCall::AskDestination => ASK_DESTINATION,
            BackendCall::SetDestination(_) => BACKEND_SET_DESTINATION,
            BackendCall::SetOverwrite(_) => BACKEND_SET_OVERWRITE,
            BackendCall::Backup => BACKUP,
            BackendCall::Init => INIT,
        }
    }

    /// Whether the caller awaits a [`ReturnMessage`] for this call.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            BackendCall::GetLocations | BackendCall::AskDestination | BackendCall::SetDestination(_)
        )
    }

    pub fn to_message(&self, call: Option<u64>) -> CallMessage {
        let args = match self {
            BackendCall::RemoveLocation(path) | BackendCall::SetDestination(path) => {
                vec![Value::from(path.as_str())]
            }
            BackendCall::SetOverwrite(value) => vec![Value::from(*value)],
            BackendCall::GetLocations
            | BackendCall::AddLocation
            | BackendCall::AskDestination
            | BackendCall::Backup
            | BackendCall::Init => Vec::new(),
        };
        CallMessage {
            call,
            ..CallMessage::new(self.name(), args)
        }
    }

    pub fn from_message(msg: &CallMessage) -> Result<Self, String> {
        let name = msg.name.as_str();
        let call = match name {
            GET_LOCATIONS => {
                expect_arity(msg, 0)?;
                BackendCall::GetLocations
            }
            ADD_LOCATION => {
                expect_arity(msg, 0)?;
                BackendCall::AddLocation
            }
            REMOVE_LOCATION => BackendCall::RemoveLocation(string_arg(msg, 1, 0)?),
            ASK_DESTINATION => {
                expect_arity(msg, 0)?;
                BackendCall::AskDestination
            }
            BACKEND_SET_DESTINATION => BackendCall::SetDestination(string_arg(msg, 1, 0)?),
            BACKEND_SET_OVERWRITE => BackendCall::SetOverwrite(bool_arg(msg, 1, 0)?),
            BACKUP => {
                expect_arity(msg, 0)?;
                BackendCall::Backup
            }
            INIT => {
                expect_arity(msg, 0)?;
                BackendCall::Init
            }
            _ => return Err(format!("unknown backend function '{name}'")),
        };
        if call.expects_reply() && msg.call.is_none() {
            return Err(format!("{name} requires a call id"));
        }
        Ok(call)
    }
}

// ── Argument validation ────────────────────────────────────────────────────

fn expect_arity(msg: &CallMessage, count: usize) -> Result<&[Value], String> {
    if msg.args.len() != count {
        return Err(format!(
            "{} expects {count} argument(s), got {}",
            msg.name,
            msg.args.len()
        ));
    }
    Ok(&msg.args)
}

fn string_arg(msg: &CallMessage, arity: usize, index: usize) -> Result<String, String> {
    let args = expect_arity(msg, arity)?;
    args[index]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{} argument {index} must be a string", msg.name))
}

fn bool_arg(msg: &CallMessage, arity: usize, index: usize) -> Result<bool, String> {
    let args = expect_arity(msg, arity)?;
    args[index]
        .as_bool()
        .ok_or_else(|| format!("{} argument {index} must be a boolean", msg.name))
}

/// Integers pass through; fractional numbers are floored.
fn progress_arg(msg: &CallMessage) -> Result<i64, String> {
    let args = expect_arity(msg, 1)?;
    let value = &args[0];
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
        .ok_or_else(|| format!("{} argument 0 must be a number", msg.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ui(json: &str) -> Result<UiCall, String> {
        let msg: CallMessage = serde_json::from_str(json).unwrap();
        UiCall::from_message(&msg)
    }

    fn decode_backend(json: &str) -> Result<BackendCall, String> {
        let msg: CallMessage = serde_json::from_str(json).unwrap();
        BackendCall::from_message(&msg)
    }

    // ── Envelope ───────────────────────────────────────────────────────

    #[test]
    fn call_message_defaults_without_args_or_id() {
        let msg: CallMessage = serde_json::from_str(r#"{"name":"reset_list"}"#).unwrap();
        assert!(msg.args.is_empty());
        assert_eq!(msg.call, None);
    }

    #[test]
    fn call_id_omitted_when_absent() {
        let json = serde_json::to_string(&UiCall::ResetList.to_message()).unwrap();
        assert_eq!(json, r#"{"name":"reset_list","args":[]}"#);
    }

    #[test]
    fn return_message_uses_return_key() {
        let ret: ReturnMessage =
            serde_json::from_str(r#"{"return":7,"value":"/mnt/backup"}"#).unwrap();
        assert_eq!(ret.call, 7);
        assert_eq!(ret.into_string().unwrap(), "/mnt/backup");
    }

    #[test]
    fn return_message_rejects_non_string_value() {
        let ret = ReturnMessage {
            call: 3,
            value: Value::from(42),
        };
        let err = ret.into_string().unwrap_err();
        assert!(err.contains("expected a string"));
    }

    // ── UI calls ───────────────────────────────────────────────────────

    #[test]
    fn ui_calls_decode_by_name() {
        assert_eq!(
            decode_ui(r#"{"name":"add_list_item","args":["/home/a"]}"#).unwrap(),
            UiCall::AddListItem("/home/a".into())
        );
        assert_eq!(
            decode_ui(r#"{"name":"backup_disabled","args":[true]}"#).unwrap(),
            UiCall::BackupDisabled(true)
        );
        assert_eq!(
            decode_ui(r#"{"name":"set_status_text","args":[""]}"#).unwrap(),
            UiCall::SetStatusText(String::new())
        );
    }

    #[test]
    fn progress_out_of_range_is_not_rejected() {
        assert_eq!(
            decode_ui(r#"{"name":"set_progress","args":[150]}"#).unwrap(),
            UiCall::SetProgress(150)
        );
        assert_eq!(
            decode_ui(r#"{"name":"set_progress","args":[-5]}"#).unwrap(),
            UiCall::SetProgress(-5)
        );
    }

    #[test]
    fn fractional_progress_is_floored() {
        assert_eq!(
            decode_ui(r#"{"name":"set_progress","args":[45.9]}"#).unwrap(),
            UiCall::SetProgress(45)
        );
    }

    #[test]
    fn progress_rejects_non_number() {
        let err = decode_ui(r#"{"name":"set_progress","args":["45"]}"#).unwrap_err();
        assert!(err.contains("must be a number"));
    }

    #[test]
    fn ui_call_wrong_arity_rejected() {
        let err = decode_ui(r#"{"name":"reset_list","args":[1]}"#).unwrap_err();
        assert!(err.contains("expects 0 argument(s), got 1"));
        let err = decode_ui(r#"{"name":"add_list_item","args":[]}"#).unwrap_err();
        assert!(err.contains("expects 1 argument(s), got 0"));
    }

    #[test]
    fn ui_call_wrong_type_rejected() {
        let err = decode_ui(r#"{"name":"set_overwrite","args":["yes"]}"#).unwrap_err();
        assert!(err.contains("must be a boolean"));
    }

    #[test]
    fn unknown_ui_function_rejected() {
        let err = decode_ui(r#"{"name":"set_colour","args":[]}"#).unwrap_err();
        assert!(err.contains("unknown UI function 'set_colour'"));
    }

    #[test]
    fn backup_finished_carries_failure_reason() {
        let call = UiCall::BackupFinished(BackupOutcome::Failed {
            reason: "disk full".into(),
        });
        let msg = call.to_message();
        assert_eq!(
            msg.args[0],
            serde_json::json!({"status": "failed", "reason": "disk full"})
        );
        assert_eq!(UiCall::from_message(&msg).unwrap(), call);
    }

    #[test]
    fn notify_encodes_level_then_message() {
        let msg = UiCall::Notify {
            level: NoticeLevel::Warning,
            message: "slow disk".into(),
        }
        .to_message();
        assert_eq!(msg.name, NOTIFY);
        assert_eq!(msg.args, vec![Value::from("warning"), Value::from("slow disk")]);
    }

    #[test]
    fn every_ui_function_name_is_listed() {
        let samples = [
            UiCall::AddListItem(String::new()),
            UiCall::ResetList,
            UiCall::SetDestination(String::new()),
            UiCall::SetOverwrite(false),
            UiCall::SetProgress(0),
            UiCall::SetStatusText(String::new()),
            UiCall::BackupDisabled(false),
            UiCall::BackupFinished(BackupOutcome::Succeeded),
            UiCall::Notify {
                level: NoticeLevel::Info,
                message: String::new(),
            },
        ];
        for call in &samples {
            assert!(UI_FUNCTIONS.contains(&call.name()), "{} not listed", call.name());
        }
        assert_eq!(samples.len(), UI_FUNCTIONS.len());
    }

    // ── Backend calls ──────────────────────────────────────────────────

    #[test]
    fn backend_calls_use_camel_case_names() {
        assert_eq!(
            BackendCall::RemoveLocation("/home/a".into()).to_message(None),
            CallMessage::new("removeLocation", vec![Value::from("/home/a")])
        );
        assert_eq!(BackendCall::SetOverwrite(true).name(), "setOverwrite");
    }

    #[test]
    fn ask_destination_requires_call_id() {
        let err = decode_backend(r#"{"name":"askDestination","args":[]}"#).unwrap_err();
        assert!(err.contains("requires a call id"));
        assert_eq!(
            decode_backend(r#"{"name":"askDestination","args":[],"call":4}"#).unwrap(),
            BackendCall::AskDestination
        );
    }

    #[test]
    fn queries_expect_reply() {
        for call in [
            BackendCall::AddLocation,
            BackendCall::RemoveLocation("/x".into()),
            BackendCall::SetOverwrite(false),
            BackendCall::Backup,
            BackendCall::Init,
        ] {
            assert!(!call.expects_reply(), "{} should be fire-and-forget", call.name());
        }
        for call in [
            BackendCall::GetLocations,
            BackendCall::AskDestination,
            BackendCall::SetDestination("/x".into()),
        ] {
            assert!(call.expects_reply(), "{} should expect a reply", call.name());
        }
    }

    #[test]
    fn location_queries_decode() {
        assert_eq!(
            decode_backend(r#"{"name":"getLocations","call":1}"#).unwrap(),
            BackendCall::GetLocations
        );
        assert_eq!(
            decode_backend(r#"{"name":"setDestination","args":["/mnt/b"],"call":2}"#).unwrap(),
            BackendCall::SetDestination("/mnt/b".into())
        );
        let err = decode_backend(r#"{"name":"setDestination","args":["/mnt/b"]}"#).unwrap_err();
        assert!(err.contains("requires a call id"));
    }

    #[test]
    fn every_backend_function_name_is_listed() {
        let samples = [
            BackendCall::GetLocations,
            BackendCall::AddLocation,
            BackendCall::RemoveLocation(String::new()),
            BackendCall::AskDestination,
            BackendCall::SetDestination(String::new()),
            BackendCall::SetOverwrite(false),
            BackendCall::Backup,
            BackendCall::Init,
        ];
        for call in &samples {
            assert!(BACKEND_FUNCTIONS.contains(&call.name()), "{} not listed", call.name());
        }
        assert_eq!(samples.len(), BACKEND_FUNCTIONS.len());
    }

    #[test]
    fn unknown_backend_function_rejected() {
        let err = decode_backend(r#"{"name":"eprint","args":["x"]}"#).unwrap_err();
        assert!(err.contains("unknown backend function 'eprint'"));
    }

    #[test]
    fn string_list_return_is_checked() {
        let ret: ReturnMessage =
            serde_json::from_str(r#"{"return":1,"value":["/home/a","/home/b"]}"#).unwrap();
        assert_eq!(ret.into_string_list().unwrap(), vec!["/home/a", "/home/b"]);

        let ret: ReturnMessage = serde_json::from_str(r#"{"return":2,"value":["/home/a",3]}"#).unwrap();
        assert!(ret.into_string_list().unwrap_err().contains("array of strings"));

        let ret: ReturnMessage = serde_json::from_str(r#"{"return":3,"value":true}"#).unwrap();
        assert!(ret.into_bool().unwrap());
    }
}
