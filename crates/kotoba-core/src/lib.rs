//! Diary operations: pairing resolution, the message relay, advice
//! annotation and the event dispatcher that ties them together.
//!
//! Every operation takes a [`Context`] carrying the store, translator and
//! identity provider handles.

pub mod advice;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod identity;
pub mod pairing;
pub mod profile;
pub mod relay;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use context::Context;
pub use dispatcher::{Dispatcher, Outcome};
pub use error::DiaryError;
