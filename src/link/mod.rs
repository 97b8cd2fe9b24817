mod client;
mod fake;
mod model;
mod serial;
mod transport;

pub(crate) use self::client::{LinkBackend, link_client_from_backend};
pub use self::client::{LinkClient, LinkSession};
pub(crate) use self::fake::{FakeLinkConfig, HexPayload};
pub use self::fake::WriteLog;
pub use self::model::{ListenStopReason, ListenSummary};
pub use self::serial::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, LinkConfig};
pub use self::transport::Transport;
