pub mod api;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod queue;
pub mod registry;
pub mod service;
pub mod shutdown;
pub mod state_machine;
pub mod types;
pub mod ui;
pub mod worker;

pub use error::{Result, WorkerError};
pub use service::{JobService, WorkerHandle};
