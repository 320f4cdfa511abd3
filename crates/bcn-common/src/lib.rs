//! Shared event-loop primitives for the Beacon Console state core.
//!
//! Everything in the state core runs on a single UI thread. This crate provides
//! the pieces that stand in for that thread's event loop:
//!
//! - [`Scheduler`] - virtual-clock timer queue advanced by the host loop
//! - [`TimerHandle`] - cancel-on-drop handle for a scheduled callback
//! - [`Debouncer`] - trailing-edge debounce built on the scheduler
//! - [`Listeners`] / [`Subscription`] - synchronous observer lists
//!
//! None of these types are `Send`; they are meant to live on the UI thread.

mod debounce;
mod listeners;
mod scheduler;

pub use debounce::Debouncer;
pub use listeners::{Listeners, Subscription};
pub use scheduler::{Scheduler, TimerHandle, TimerId};
