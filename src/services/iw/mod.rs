pub mod client;
pub mod config;
pub mod transport;

pub use client::DesireClient;
pub use config::ClientConfig;
pub use transport::{HttpTransport, IwTransport};
