use tracing::{debug, instrument, warn};

use super::{FrameCodec, FrameCodecError, LcdToControllerFrame};
use crate::error::{LinkError, ProtocolError};
use crate::link::{LinkSession, ListenStopReason, ListenSummary};
use crate::protocol::LCD_FRAME_LEN;

/// One inbound payload as seen by a listener.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StatusEvent {
    /// A status frame decoded successfully.
    Status(LcdToControllerFrame),
    /// The payload could not be decoded; listening continues.
    DecodeFailed {
        bytes: Vec<u8>,
        error: FrameCodecError,
    },
}

/// Reads LCD status frames from the link.
pub struct StatusHandler;

impl StatusHandler {
    /// Reads and decodes one status frame.
    ///
    /// Returns `Ok(None)` when the read timed out without data.
    ///
    /// ```
    /// # async fn demo(session: &mut isbed_mock::LinkSession) -> Result<(), isbed_mock::ProtocolError> {
    /// use isbed_mock::StatusHandler;
    ///
    /// if let Some(status) = StatusHandler::poll(session).await? {
    ///     println!("LCD shows pattern {}", status.displayed_pattern_index());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the link read fails or the payload is not a
    /// well-formed status frame.
    pub async fn poll(
        session: &mut LinkSession,
    ) -> Result<Option<LcdToControllerFrame>, ProtocolError> {
        let Some(bytes) = session.poll_frame(LCD_FRAME_LEN).await? else {
            return Ok(None);
        };
        let frame = FrameCodec::decode_lcd_frame(&bytes)?;
        Ok(Some(frame))
    }

    /// Polls status frames until `max_frames` decoded frames arrived, the
    /// stream closed, or the user pressed Ctrl+C.
    ///
    /// Payloads that fail to decode are reported through `on_event` and do
    /// not count towards `max_frames`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link read fails or waiting for Ctrl+C fails.
    #[instrument(skip(session, on_event), level = "debug", fields(?max_frames))]
    pub async fn listen<F>(
        session: &mut LinkSession,
        max_frames: Option<usize>,
        mut on_event: F,
    ) -> Result<ListenSummary, ProtocolError>
    where
        F: FnMut(usize, StatusEvent),
    {
        let link = session.describe();
        if max_frames == Some(0) {
            return Ok(ListenSummary::new(
                link,
                0,
                0,
                ListenStopReason::ReachedLimit(0),
            ));
        }

        let mut received = 0usize;
        let mut decode_errors = 0usize;
        let stop_reason = loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.map_err(|source| LinkError::CtrlC { source })?;
                    break ListenStopReason::Interrupted;
                }
                polled = session.poll_frame(LCD_FRAME_LEN) => {
                    let bytes = match polled {
                        Ok(Some(bytes)) => bytes,
                        Ok(None) => continue,
                        Err(LinkError::StreamClosed) => break ListenStopReason::StreamClosed,
                        Err(error) => return Err(error.into()),
                    };

                    match FrameCodec::decode_lcd_frame(&bytes) {
                        Ok(frame) => {
                            received += 1;
                            debug!(received, "status frame decoded");
                            on_event(received, StatusEvent::Status(frame));
                            if let Some(limit) = max_frames && received >= limit {
                                break ListenStopReason::ReachedLimit(limit);
                            }
                        }
                        Err(error) => {
                            decode_errors += 1;
                            warn!(%error, "dropping undecodable status payload");
                            on_event(received, StatusEvent::DecodeFailed { bytes, error });
                        }
                    }
                }
            }
        };

        Ok(ListenSummary::new(
            link,
            received,
            decode_errors,
            stop_reason,
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::{FakeLinkConfig, LinkBackend, link_client_from_backend};

    async fn fake_session(replies: &[&str]) -> LinkSession {
        let replies = replies
            .iter()
            .map(|reply| reply.parse().expect("valid fixture"))
            .collect();
        link_client_from_backend(LinkBackend::Fake(
            FakeLinkConfig::builder().replies(replies).build(),
        ))
        .open()
        .await
        .expect("fake link opens")
    }

    #[tokio::test]
    async fn poll_decodes_one_status_frame() {
        let mut session = fake_session(&["0102646464640000FF19"]).await;
        let frame = StatusHandler::poll(&mut session)
            .await
            .expect("poll succeeds")
            .expect("a frame was queued");
        assert_eq!(1, frame.selected_pattern_index());
        assert_eq!(2, frame.displayed_pattern_index());
        assert_eq!(25, frame.frequency());
    }

    #[tokio::test]
    async fn poll_rejects_short_payload() {
        let mut session = fake_session(&["0102"]).await;
        let result = StatusHandler::poll(&mut session).await;
        assert_matches!(result, Err(ProtocolError::FrameCodec(error)) if matches!(
            *error,
            FrameCodecError::InvalidFrameSize { expected: 10, actual: 2 }
        ));
    }

    #[tokio::test]
    async fn listen_reports_decode_errors_and_keeps_going() {
        let mut session = fake_session(&[
            "00006464646400FF0000",
            "0001",
            "0303000000000000FF0A",
        ])
        .await;
        let mut events = Vec::new();

        let summary = StatusHandler::listen(&mut session, None, |count, event| {
            events.push((count, event));
        })
        .await
        .expect("listen succeeds");

        assert_eq!(2, summary.received_frames());
        assert_eq!(1, summary.decode_errors());
        assert_eq!(&ListenStopReason::StreamClosed, summary.stop_reason());
        assert_eq!(3, events.len());
        assert_matches!(&events[1], (1, StatusEvent::DecodeFailed { bytes, .. }) if bytes == &vec![0x00, 0x01]);
    }

    #[tokio::test]
    async fn listen_stops_at_max_frames() {
        let mut session = fake_session(&["00006464646400FF0000", "0303000000000000FF0A"]).await;

        let summary = StatusHandler::listen(&mut session, Some(1), |_count, _event| {})
            .await
            .expect("listen succeeds");

        assert_eq!(1, summary.received_frames());
        assert_eq!(&ListenStopReason::ReachedLimit(1), summary.stop_reason());
    }

    #[tokio::test]
    async fn listen_with_zero_limit_reads_nothing() {
        let mut session = fake_session(&["00006464646400FF0000"]).await;

        let summary = StatusHandler::listen(&mut session, Some(0), |_count, _event| {})
            .await
            .expect("listen succeeds");

        assert_eq!(0, summary.received_frames());
        assert_eq!(&ListenStopReason::ReachedLimit(0), summary.stop_reason());
        assert_eq!(
            Some(vec![0x00, 0x00, 0x64, 0x64, 0x64, 0x64, 0x00, 0xFF, 0x00, 0x00]),
            session.poll_frame(10).await.expect("fixture still queued")
        );
    }
}
