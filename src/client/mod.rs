pub mod client;
pub mod error;

pub use client::WorkerClient;
pub use error::ClientError;
