use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{BridgeError, Result};

/// Backend-exposed functions as seen from the UI side.
///
/// Calls returning a [`Reply`] are queries; every other call is
/// fire-and-forget: `Ok` only means the intent left the UI, not that the
/// backend acted on it.
pub trait Backend {
    /// Ask the backend to push its current state (list, destination, overwrite).
    fn init(&self) -> Result<()>;

    /// The locations the backend has saved, in insertion order.
    fn get_locations(&self) -> Result<Reply<Vec<String>>>;

    /// Ask the backend to pick a source folder; it answers with `add_list_item`.
    fn add_location(&self) -> Result<()>;

    fn remove_location(&self, path: &str) -> Result<()>;

    /// Request/response: resolves to the destination the backend settled on.
    fn ask_destination(&self) -> Result<Reply<String>>;

    /// Set the destination without a picker; resolves to whether it was accepted.
    fn set_destination(&self, path: &str) -> Result<Reply<bool>>;

    fn set_overwrite(&self, value: bool) -> Result<()>;

    fn backup(&self) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn init(&self) -> Result<()> {
        (**self).init()
    }

    fn get_locations(&self) -> Result<Reply<Vec<String>>> {
        (**self).get_locations()
    }

    fn add_location(&self) -> Result<()> {
        (**self).add_location()
    }

    fn remove_location(&self, path: &str) -> Result<()> {
        (**self).remove_location(path)
    }

    fn ask_destination(&self) -> Result<Reply<String>> {
        (**self).ask_destination()
    }

    fn set_destination(&self, path: &str) -> Result<Reply<bool>> {
        (**self).set_destination(path)
    }

    fn set_overwrite(&self, value: bool) -> Result<()> {
        (**self).set_overwrite(value)
    }

    fn backup(&self) -> Result<()> {
        (**self).backup()
    }
}

/// Pending answer to a request/response call.
///
/// Owns its channel end, so awaiting it borrows nothing from the backend.
#[derive(Debug)]
pub struct Reply<T> {
    call: &'static str,
    rx: oneshot::Receiver<T>,
}

impl<T> Reply<T> {
    /// A reply plus the sender the answering side completes it with.
    pub fn channel(call: &'static str) -> (oneshot::Sender<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { call, rx })
    }

    /// An already-answered reply, for backends that answer in-process.
    pub fn ready(call: &'static str, value: T) -> Self {
        let (tx, reply) = Self::channel(call);
        let _ = tx.send(value);
        reply
    }

    pub fn call(&self) -> &'static str {
        self.call
    }
}

impl<T> Future for Reply<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let call = this.call;
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| BridgeError::ReplyDropped(call)))
    }
}
