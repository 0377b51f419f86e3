//! Shared byte counter and the background observer that renders it.
//!
//! The transfer engine is the only writer of the counter; the observer thread is
//! the only reader. Both go through the counter's mutex.

mod counter;
mod observer;
pub mod render;

pub use counter::{ProgressCounter, ProgressSnapshot};
pub use observer::{ObserverHandle, ObserverOptions, ObserverReport, ProgressObserver};
