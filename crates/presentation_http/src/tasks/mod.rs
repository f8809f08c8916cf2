//! Background tasks

pub mod event_forwarding;

pub use event_forwarding::spawn_event_forwarding_task;
