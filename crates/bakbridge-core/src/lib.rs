pub mod backend;
pub mod channel;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod list;
pub mod platform;
pub mod state;
pub mod store;
pub mod sync;
pub mod worker;

pub use bakbridge_protocol as protocol;

#[cfg(test)]
mod testutil;
