use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::time::sleep;

use super::transport::Transport;
use crate::error::{FixtureError, LinkError};

/// Status frames replayed when no fake replies are configured: the LCD sits
/// on pattern 0 with full brightness, then the user selects pattern 2.
const DEFAULT_REPLIES: [[u8; 10]; 2] = [
    [0x00, 0x00, 0x64, 0x64, 0x64, 0x64, 0xFF, 0x00, 0x00, 0x0A],
    [0x02, 0x02, 0x64, 0x32, 0x32, 0x64, 0x00, 0x00, 0xFF, 0x14],
];

/// Shared record of every payload written to a fake link.
///
/// Clones share the same log, so a caller can keep one handle and inspect
/// what a command sent after it finishes.
#[derive(Debug, Clone, Default)]
pub struct WriteLog {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl WriteLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every payload written so far, in write order.
    #[must_use]
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of payloads written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, bytes: &[u8]) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bytes.to_vec());
    }
}

/// Parsed fake reply payload.
#[derive(Debug, Clone, Eq, PartialEq, derive_more::Into)]
pub(crate) struct HexPayload {
    payload: Vec<u8>,
}

impl FromStr for HexPayload {
    type Err = FixtureError;

    /// Parses hexadecimal bytes; whitespace between digits is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let cleaned: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(FixtureError::EmptyReply);
        }
        let payload = hex::decode(&cleaned).map_err(|_error| FixtureError::InvalidHex {
            value: value.to_string(),
        })?;
        Ok(Self { payload })
    }
}

/// Settings for constructing a fake link.
#[derive(Debug, Builder)]
pub(crate) struct FakeLinkConfig {
    replies: Option<Vec<HexPayload>>,
    #[builder(default)]
    write_log: WriteLog,
    #[builder(default)]
    reply_delay: Duration,
}

/// In-memory transport used in tests and without hardware.
#[derive(Debug)]
pub(crate) struct FakeTransport {
    replies: VecDeque<Vec<u8>>,
    write_log: WriteLog,
    reply_delay: Duration,
}

impl FakeTransport {
    pub(crate) fn new(config: FakeLinkConfig) -> Self {
        let FakeLinkConfig {
            replies,
            write_log,
            reply_delay,
        } = config;
        let replies = replies.map_or_else(
            || DEFAULT_REPLIES.map(Vec::from).into_iter().collect(),
            |replies| replies.into_iter().map(Into::into).collect(),
        );

        Self {
            replies,
            write_log,
            reply_delay,
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.write_log.record(bytes);
        Ok(())
    }

    /// Replays the next fixture whole, whatever `len` asks for.
    async fn read(&mut self, _len: usize) -> Result<Option<Vec<u8>>, LinkError> {
        if !self.reply_delay.is_zero() {
            sleep(self.reply_delay).await;
        }
        self.replies
            .pop_front()
            .map(Some)
            .ok_or(LinkError::StreamClosed)
    }

    fn describe(&self) -> String {
        "fake link".to_string()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0102ff", vec![0x01, 0x02, 0xFF])]
    #[case("01 02 FF", vec![0x01, 0x02, 0xFF])]
    fn parses_hex_payloads(#[case] input: &str, #[case] expected: Vec<u8>) {
        let parsed: HexPayload = input.parse().expect("valid payload should parse");
        assert_eq!(expected, Vec::from(parsed));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_empty_payloads(#[case] input: &str) {
        assert_matches!(input.parse::<HexPayload>(), Err(FixtureError::EmptyReply));
    }

    #[rstest]
    #[case("abc")]
    #[case("zz")]
    fn rejects_invalid_hex(#[case] input: &str) {
        assert_matches!(
            input.parse::<HexPayload>(),
            Err(FixtureError::InvalidHex { value }) if value == input
        );
    }

    #[tokio::test]
    async fn records_writes_in_order() {
        let write_log = WriteLog::new();
        let mut transport =
            FakeTransport::new(FakeLinkConfig::builder().write_log(write_log.clone()).build());

        transport.write(&[1, 2]).await.expect("fake write succeeds");
        transport.write(&[3]).await.expect("fake write succeeds");

        assert_eq!(vec![vec![1, 2], vec![3]], write_log.frames());
        assert_eq!(2, write_log.len());
    }

    #[tokio::test]
    async fn replays_configured_replies_then_closes() {
        let reply: HexPayload = "0a0b".parse().expect("valid payload");
        let mut transport =
            FakeTransport::new(FakeLinkConfig::builder().replies(vec![reply]).build());

        assert_eq!(
            Some(vec![0x0A, 0x0B]),
            transport.read(10).await.expect("first read succeeds")
        );
        assert_matches!(transport.read(10).await, Err(LinkError::StreamClosed));
    }

    #[tokio::test]
    async fn default_replies_are_two_status_frames() {
        let mut transport = FakeTransport::new(FakeLinkConfig::builder().build());

        for expected in DEFAULT_REPLIES {
            let bytes = transport
                .read(10)
                .await
                .expect("default reply is available")
                .expect("fake reads never time out");
            assert_eq!(expected.to_vec(), bytes);
        }
        assert_matches!(transport.read(10).await, Err(LinkError::StreamClosed));
    }
}
