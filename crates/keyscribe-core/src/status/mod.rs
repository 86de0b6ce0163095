//! Host → extension status mirror and one-shot insertion payload.

mod observer;
mod publisher;

pub use {observer::StatusObserver, publisher::StatusPublisher};
