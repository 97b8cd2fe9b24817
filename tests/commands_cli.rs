use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::Value;

use isbed_mock::{Args, LinkArgs, RunOptions, WriteLog};

#[derive(Debug, Default)]
struct FakeTerminalClient;

impl isbed_mock::TerminalClient for FakeTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        false
    }

    fn stderr_is_terminal(&self) -> bool {
        false
    }
}

struct CommandRun {
    stdout: String,
    written: Vec<Vec<u8>>,
}

impl CommandRun {
    fn json_lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .map(|line| serde_json::from_str(line).expect("each stdout line is JSON"))
            .collect()
    }
}

async fn run_with_argv<const N: usize>(argv: [&str; N]) -> anyhow::Result<CommandRun> {
    let args = Args::try_parse_from(argv)?;
    let options = RunOptions::builder()
        .revision(args.revision())
        .output_format(args.output_format().unwrap_or_default())
        .maybe_log_level(args.log_level())
        .build();
    let (command, link) = args.into_command_and_link()?;
    let write_log = match &link {
        LinkArgs::Fake(fake) => fake.write_log().clone(),
        LinkArgs::Serial(_config) => WriteLog::new(),
    };

    let mut output = Vec::new();
    isbed_mock::run_with_clients_and_options(
        command,
        &mut output,
        &FakeTerminalClient,
        isbed_mock::link_client(link),
        options,
    )
    .await?;

    Ok(CommandRun {
        stdout: String::from_utf8(output)?,
        written: write_log.frames(),
    })
}

#[tokio::test]
async fn patterns_command_does_not_touch_the_link() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--revision",
        "v1",
        "--output-format",
        "json",
        "patterns",
    ])
    .await?;

    assert!(run.written.is_empty());
    let lines = run.json_lines();
    assert_eq!(1, lines.len());
    assert_eq!("Fade", lines[0]["patterns"][2]["name"]);
    Ok(())
}

#[tokio::test]
async fn send_command_wraps_pattern_name_and_writes_one_frame() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--revision",
        "v1",
        "send",
        "--pattern",
        "12",
        "--preset",
        "red",
    ])
    .await?;

    assert_eq!(1, run.written.len());
    let frame = &run.written[0];
    assert_eq!(30, frame.len());
    assert_eq!(12, frame[0]);
    assert_eq!(b"Fade\0\0\0\0\0\0\0\0\0\0\0\0", &frame[1..17]);
    assert_eq!(0x00, frame[17]);
    assert_eq!([0xFF, 0x00, 0x00].repeat(4), frame[18..].to_vec());
    assert!(run.stdout.contains("12 (Fade)"));
    Ok(())
}

#[tokio::test]
async fn send_command_accepts_explicit_zone_colours() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--output-format",
        "json",
        "send",
        "--pattern",
        "2",
        "--colour",
        "010203",
        "040506",
        "070809",
        "0A0B0C",
    ])
    .await?;

    let frame = &run.written[0];
    assert_eq!(0x02, frame[17]);
    assert_eq!((1..=12).collect::<Vec<u8>>(), frame[18..].to_vec());

    let lines = run.json_lines();
    assert_eq!("sent", lines[0]["event"]);
    assert_eq!("Strobe", lines[0]["frame"]["pattern_name"]);
    assert_eq!("strobe", lines[0]["frame"]["mode"]);
    Ok(())
}

#[tokio::test]
async fn enumerate_command_announces_every_pattern_in_black() -> anyhow::Result<()> {
    let run = run_with_argv(["isbed-mock", "--fake", "enumerate", "--delay", "1ms"]).await?;

    assert_eq!(10, run.written.len());
    let indices: Vec<u8> = run.written.iter().map(|frame| frame[0]).collect();
    assert_eq!((0..10).collect::<Vec<u8>>(), indices);
    let mode_bytes: Vec<u8> = run.written.iter().map(|frame| frame[17]).collect();
    assert_eq!(vec![6, 1, 2, 6, 6, 6, 6, 6, 6, 6], mode_bytes);
    assert!(run.written.iter().all(|frame| frame[18..].iter().all(|byte| *byte == 0)));
    assert!(run.stdout.starts_with("Enumerated 10 pattern(s) for revision v2:"));
    Ok(())
}

#[tokio::test]
async fn enumerate_command_flags_only_first_pattern_for_revision_one() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--revision",
        "v1",
        "enumerate",
        "--delay",
        "1ms",
    ])
    .await?;

    let mode_bytes: Vec<u8> = run.written.iter().map(|frame| frame[17]).collect();
    assert_eq!(vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0], mode_bytes);
    Ok(())
}

#[tokio::test]
async fn demo_command_stops_at_frame_limit() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--output-format",
        "json",
        "demo",
        "--interval",
        "1ms",
        "--max-frames",
        "3",
        "--start-pattern",
        "4",
    ])
    .await?;

    assert_eq!(3, run.written.len());
    assert!(run.written.iter().all(|frame| frame[0] == 4));
    let lines = run.json_lines();
    let events: Vec<&str> = lines
        .iter()
        .filter_map(|line| line["event"].as_str())
        .collect();
    assert_eq!(
        vec!["demo_frame", "demo_frame", "demo_frame", "demo_finished"],
        events
    );
    assert_eq!(3, lines[3]["frames_sent"]);
    assert_eq!("reached max frames (3)", lines[3]["stop_reason"]);
    Ok(())
}

#[tokio::test]
async fn listen_command_prints_default_fake_status_frames() -> anyhow::Result<()> {
    let run = run_with_argv(["isbed-mock", "--fake", "listen"]).await?;

    assert!(run.written.is_empty());
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(
        "Listening on fake link (revision v2, Ctrl+C to stop)",
        lines[0]
    );
    assert!(lines[1].starts_with("[0001] displayed=0 (Rotate)"));
    assert!(lines[2].contains("displayed=2 (Strobe) selected=2 (Strobe) colour=#0000FF"));
    assert_eq!(
        Some(&"Stopped: link stream closed - received 2 status frame(s), 0 decode error(s)"),
        lines.last()
    );
    Ok(())
}

#[tokio::test]
async fn listen_command_reports_decode_errors_and_keeps_going() -> anyhow::Result<()> {
    let run = run_with_argv([
        "isbed-mock",
        "--fake",
        "--fake-reply",
        "ABCD",
        "--fake-reply",
        "01 03 0A 14 1E 28 FF 80 00 32",
        "--fake-reply",
        "00000000000000000000",
        "--output-format",
        "json",
        "listen",
        "--max-frames",
        "1",
    ])
    .await?;

    let lines = run.json_lines();
    let events: Vec<&str> = lines
        .iter()
        .filter_map(|line| line["event"].as_str())
        .collect();
    assert_eq!(
        vec!["listen_started", "decode_error", "status", "listen_finished"],
        events
    );
    assert_eq!("AB CD", lines[1]["bytes"]);
    assert_eq!("Blink", lines[2]["displayed_pattern"]);
    assert_eq!("Static", lines[2]["selected_pattern"]);
    assert_eq!(1, lines[3]["received_frames"]);
    assert_eq!(1, lines[3]["decode_errors"]);
    assert_eq!("reached max frames (1)", lines[3]["stop_reason"]);
    Ok(())
}

#[tokio::test]
async fn listen_command_rejects_revision_one() {
    let result = run_with_argv(["isbed-mock", "--fake", "--revision", "v1", "listen"]).await;

    let error = result.err().expect("revision 1 has no status frames");
    assert_eq!(
        "revision v1 has no LCD status frames; use --revision v2 to listen",
        error.to_string()
    );
}

#[tokio::test]
async fn serial_mode_without_port_fails_before_running() {
    let result = run_with_argv(["isbed-mock", "send", "--pattern", "0", "--preset", "red"]).await;

    let error = result.err().expect("--port is required");
    assert_eq!("--port is required unless --fake is set", error.to_string());
}
