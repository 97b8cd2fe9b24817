use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;

use isbed_mock::{
    ColourPreset, ColourUpdate, ColourUpdateHandler, EnumerationRequest, LinkError, LinkSession,
    ListenStopReason, PatternEnumerationHandler, PatternType, ProtocolError, ProtocolRevision,
    StatusEvent, StatusHandler, Transport,
};

/// Transport scripted per test: reads replay `reads`, writes fail once
/// `fail_after_writes` frames went through.
#[derive(Debug, Default)]
struct ScriptedTransport {
    reads: VecDeque<Option<Vec<u8>>>,
    written: Vec<Vec<u8>>,
    fail_after_writes: Option<usize>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if let Some(limit) = self.fail_after_writes
            && self.written.len() >= limit
        {
            return Err(LinkError::Io {
                port: "scripted".to_string(),
                source: io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"),
            });
        }
        self.written.push(bytes.to_vec());
        Ok(())
    }

    async fn read(&mut self, _len: usize) -> Result<Option<Vec<u8>>, LinkError> {
        self.reads.pop_front().ok_or(LinkError::StreamClosed)
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[tokio::test]
async fn enumeration_stops_at_first_failed_write() {
    let mut session = LinkSession::new(Box::new(ScriptedTransport {
        fail_after_writes: Some(3),
        ..ScriptedTransport::default()
    }));
    let request = EnumerationRequest::builder()
        .revision(ProtocolRevision::V2)
        .delay(Duration::ZERO)
        .build();

    let result = PatternEnumerationHandler::enumerate(&mut session, request).await;

    assert_matches!(result, Err(ProtocolError::Link(error)) if matches!(*error, LinkError::Io { .. }));
    assert_eq!(3, session.frames_sent());
}

#[tokio::test]
async fn enumeration_with_custom_mapping_changes_only_mode_bytes() {
    let mut session = LinkSession::new(Box::new(ScriptedTransport::default()));
    let request = EnumerationRequest::builder()
        .revision(ProtocolRevision::V2)
        .delay(Duration::ZERO)
        .build();
    let mapping = |index: u8| {
        if index % 2 == 0 {
            PatternType::Rotate
        } else {
            PatternType::Fade
        }
    };

    let receipt = PatternEnumerationHandler::enumerate_with_mapping(&mut session, request, &mapping)
        .await
        .expect("enumeration succeeds");

    let mode_bytes: Vec<u8> = receipt.frames().iter().map(|frame| frame.mode_byte()).collect();
    assert_eq!(vec![3, 4, 3, 4, 3, 4, 3, 4, 3, 4], mode_bytes);
    assert_eq!("Strobe", receipt.frames()[2].pattern_name());
}

#[tokio::test]
async fn colour_update_reports_encoded_bytes() {
    let mut session = LinkSession::new(Box::new(ScriptedTransport::default()));
    let update = ColourUpdate::new(ProtocolRevision::V2, 1, ColourPreset::Blue.zone_colours());

    let sent = ColourUpdateHandler::send(&mut session, update)
        .await
        .expect("colour update succeeds");

    assert_eq!(1, sent.bytes()[0]);
    assert_eq!(b"Static", &sent.bytes()[1..7]);
    assert_eq!(1, sent.mode_byte());
    assert_eq!([0x00, 0x00, 0xFF], sent.bytes()[27..30]);
    assert_eq!(1, session.frames_sent());
}

#[tokio::test]
async fn listener_skips_empty_reads_and_counts_decode_errors() {
    let mut session = LinkSession::new(Box::new(ScriptedTransport {
        reads: VecDeque::from([
            None,
            Some(vec![0x01, 0x02, 0x03]),
            None,
            Some(vec![5, 5, 10, 20, 30, 40, 0, 255, 0, 7]),
        ]),
        ..ScriptedTransport::default()
    }));
    let mut events = Vec::new();

    let summary = StatusHandler::listen(&mut session, None, |index, event| {
        events.push((index, event));
    })
    .await
    .expect("listen finishes when the stream closes");

    assert_eq!(ListenStopReason::StreamClosed, *summary.stop_reason());
    assert_eq!(1, summary.received_frames());
    assert_eq!(1, summary.decode_errors());
    assert_eq!("scripted", summary.link());
    assert_matches!(&events[0], (0, StatusEvent::DecodeFailed { bytes, .. }) if bytes.len() == 3);
    assert_matches!(&events[1], (1, StatusEvent::Status(status)) if status.displayed_pattern_index() == 5);
}

#[tokio::test]
async fn poll_surfaces_short_frames_as_codec_errors() {
    let mut session = LinkSession::new(Box::new(ScriptedTransport {
        reads: VecDeque::from([Some(vec![0x00; 4])]),
        ..ScriptedTransport::default()
    }));

    let result = StatusHandler::poll(&mut session).await;

    assert_matches!(result, Err(ProtocolError::FrameCodec(_)));
}
