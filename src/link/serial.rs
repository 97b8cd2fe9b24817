use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use serialport::SerialPort;
use tracing::{debug, instrument};

use super::transport::Transport;
use crate::error::LinkError;

/// Baud rate used by the LCD unit's serial transfer library.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Read timeout matching the LCD unit's 100 ms status cadence.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Settings for opening a serial link.
///
/// ```
/// use isbed_mock::LinkConfig;
///
/// let config = LinkConfig::builder().port("/dev/ttyUSB0").build();
/// assert_eq!(115_200, config.baud_rate());
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Builder)]
pub struct LinkConfig {
    #[builder(into)]
    port: String,
    #[builder(default = DEFAULT_BAUD_RATE)]
    baud_rate: u32,
    #[builder(default = DEFAULT_READ_TIMEOUT)]
    read_timeout: Duration,
}

impl LinkConfig {
    /// Serial device path.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    #[must_use]
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

/// Transport over a local serial port.
///
/// Payloads are written and read unframed, so a reader expecting framed
/// packets cannot consume them. After a short read the next read can start
/// mid-frame and stay misaligned.
///
/// The port is blocking, so every call moves it onto the blocking pool and
/// takes it back once the call returns.
pub(crate) struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    port: Option<Box<dyn SerialPort>>,
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port_name", &self.port_name)
            .field("baud_rate", &self.baud_rate)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialTransport {
    #[instrument(level = "debug", fields(port = %config.port, baud_rate = config.baud_rate))]
    pub(crate) async fn open(config: LinkConfig) -> Result<Self, LinkError> {
        let LinkConfig {
            port,
            baud_rate,
            read_timeout,
        } = config;
        let path = port.clone();
        let opened = tokio::task::spawn_blocking(move || {
            serialport::new(path, baud_rate)
                .timeout(read_timeout)
                .open()
        })
        .await?
        .map_err(|source| LinkError::OpenPort {
            port: port.clone(),
            source,
        })?;
        debug!("serial port opened");

        Ok(Self {
            port_name: port,
            baud_rate,
            port: Some(opened),
        })
    }

    fn take_port(&mut self) -> Result<Box<dyn SerialPort>, LinkError> {
        self.port.take().ok_or(LinkError::SessionClosed)
    }

    fn io_error(&self, source: io::Error) -> LinkError {
        LinkError::Io {
            port: self.port_name.clone(),
            source,
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let mut port = self.take_port()?;
        let payload = bytes.to_vec();
        let (port, result) = tokio::task::spawn_blocking(move || {
            let result = port.write_all(&payload).and_then(|()| port.flush());
            (port, result)
        })
        .await?;
        self.port = Some(port);
        result.map_err(|source| self.io_error(source))
    }

    async fn read(&mut self, len: usize) -> Result<Option<Vec<u8>>, LinkError> {
        let mut port = self.take_port()?;
        let (port, result) = tokio::task::spawn_blocking(move || {
            let result = read_up_to(port.as_mut(), len);
            (port, result)
        })
        .await?;
        self.port = Some(port);
        match result {
            Ok(ReadOutcome::Bytes(bytes)) => Ok(Some(bytes)),
            Ok(ReadOutcome::TimedOut) => Ok(None),
            Ok(ReadOutcome::Closed) => Err(LinkError::StreamClosed),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.port_name, self.baud_rate)
    }
}

enum ReadOutcome {
    Bytes(Vec<u8>),
    TimedOut,
    Closed,
}

fn read_up_to(port: &mut dyn SerialPort, len: usize) -> io::Result<ReadOutcome> {
    let mut buffer = vec![0u8; len];
    let mut filled = 0usize;
    while filled < len {
        match port.read(&mut buffer[filled..]) {
            Ok(0) if filled == 0 => return Ok(ReadOutcome::Closed),
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(error) if error.kind() == io::ErrorKind::TimedOut => break,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }

    if filled == 0 {
        return Ok(ReadOutcome::TimedOut);
    }
    buffer.truncate(filled);
    Ok(ReadOutcome::Bytes(buffer))
}
