use bakbridge_protocol::{NoticeLevel, UiCall};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::backend::{Backend, Reply};
use crate::list::SelectionList;
use crate::state::UiState;
use crate::sync::{Synchronizer, UserAction};

/// Renders list and state after every event-loop turn.
pub trait View {
    fn refresh(&mut self, list: &SelectionList, state: &UiState);
}

impl<F> View for F
where
    F: FnMut(&SelectionList, &UiState),
{
    fn refresh(&mut self, list: &SelectionList, state: &UiState) {
        self(list, state)
    }
}

/// Drive `sync` from backend pushes and user actions on one task.
///
/// Each push, action or destination answer is one turn; turns never
/// overlap. A destination query only parks its own continuation, so pushes
/// keep flowing while the picker is open. Returns once both channels are
/// closed and no destination answer is outstanding.
pub async fn run_event_loop<B, V>(
    sync: &mut Synchronizer<B>,
    mut pushes: UnboundedReceiver<UiCall>,
    mut actions: UnboundedReceiver<UserAction>,
    view: &mut V,
) where
    B: Backend,
    V: View,
{
    let mut pending: FuturesUnordered<Reply<String>> = FuturesUnordered::new();
    let mut pushes_open = true;
    let mut actions_open = true;

    view.refresh(sync.list(), sync.state());

    while pushes_open || actions_open || !pending.is_empty() {
        tokio::select! {
            push = pushes.recv(), if pushes_open => match push {
                Some(call) => sync.apply(call),
                None => {
                    tracing::debug!("backend push channel closed");
                    pushes_open = false;
                    continue;
                }
            },
            Some(answer) = pending.next(), if !pending.is_empty() => match answer {
                Ok(path) => sync.set_destination(path),
                Err(e) => {
                    tracing::warn!("destination query failed: {e}");
                    sync.notify(NoticeLevel::Error, e.to_string());
                }
            },
            action = actions.recv(), if actions_open => match action {
                Some(action) => match sync.dispatch(action) {
                    Ok(Some(reply)) => pending.push(reply),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("user intent not delivered: {e}");
                        sync.notify(NoticeLevel::Error, e.to_string());
                    }
                },
                None => {
                    tracing::debug!("user action channel closed");
                    actions_open = false;
                    continue;
                }
            },
            else => break,
        }

        view.refresh(sync.list(), sync.state());
    }
}
