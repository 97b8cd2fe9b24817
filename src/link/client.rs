use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::fake::{FakeLinkConfig, FakeTransport};
use super::serial::{LinkConfig, SerialTransport};
use super::transport::Transport;
use crate::error::LinkError;

/// Runtime link selection.
#[derive(Debug)]
pub(crate) enum LinkBackend {
    Serial(LinkConfig),
    Fake(FakeLinkConfig),
}

/// Builds an injected link client for the selected backend.
pub(crate) fn link_client_from_backend(backend: LinkBackend) -> Box<dyn LinkClient> {
    match backend {
        LinkBackend::Serial(config) => Box::new(SerialLinkClient { config }),
        LinkBackend::Fake(config) => {
            info!("using fake link");
            Box::new(FakeLinkClient { config })
        }
    }
}

/// Opens link sessions. Consumed on open.
#[async_trait]
pub trait LinkClient: Send + Sync {
    /// Opens the link and returns a session ready for frame traffic.
    async fn open(self: Box<Self>) -> Result<LinkSession, LinkError>;
}

#[derive(Debug)]
struct SerialLinkClient {
    config: LinkConfig,
}

#[async_trait]
impl LinkClient for SerialLinkClient {
    async fn open(self: Box<Self>) -> Result<LinkSession, LinkError> {
        let Self { config } = *self;
        let transport = SerialTransport::open(config).await?;
        Ok(LinkSession::new(Box::new(transport)))
    }
}

#[derive(Debug)]
struct FakeLinkClient {
    config: FakeLinkConfig,
}

#[async_trait]
impl LinkClient for FakeLinkClient {
    async fn open(self: Box<Self>) -> Result<LinkSession, LinkError> {
        let Self { config } = *self;
        Ok(LinkSession::new(Box::new(FakeTransport::new(config))))
    }
}

/// An open link to the LCD unit.
#[derive(Debug)]
pub struct LinkSession {
    transport: Box<dyn Transport>,
    frames_sent: usize,
}

impl LinkSession {
    /// Wraps an already-open transport.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            frames_sent: 0,
        }
    }

    /// Writes one encoded frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport write fails.
    #[instrument(skip(self, bytes), level = "debug", fields(len = bytes.len()))]
    pub async fn send_frame(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.transport.write(bytes).await?;
        self.frames_sent += 1;
        debug!(frames_sent = self.frames_sent, "frame written");
        Ok(())
    }

    /// Reads one inbound payload of up to `len` bytes.
    ///
    /// Returns `Ok(None)` when nothing arrived before the read timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport read fails or the stream closed.
    #[instrument(skip(self), level = "trace")]
    pub async fn poll_frame(&mut self, len: usize) -> Result<Option<Vec<u8>>, LinkError> {
        self.transport.read(len).await
    }

    /// Number of frames written through this session.
    #[must_use]
    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    /// Describes the underlying link.
    #[must_use]
    pub fn describe(&self) -> String {
        self.transport.describe()
    }

    /// Closes the session, releasing the transport.
    #[instrument(skip(self), level = "debug", fields(link = %self.describe(), frames_sent = self.frames_sent))]
    pub fn close(self) {
        debug!("link session closed");
    }
}
