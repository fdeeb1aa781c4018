pub mod desire;
pub mod error;
pub mod services;

pub use desire::{Ack, Desire, DesireParams, DesireRequest, IdGenerator};
pub use error::{IwError, Result};
pub use services::iw::{ClientConfig, DesireClient, HttpTransport, IwTransport};
