use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;

use isbed_mock::{Args, OutputFormat, RunOptions, link_client, run_with_options};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mut stdout = std::io::stdout();

    let run_result = async {
        let output_format = args.output_format().unwrap_or(if stdout.is_terminal() {
            OutputFormat::Pretty
        } else {
            OutputFormat::Json
        });
        let options = RunOptions::builder()
            .revision(args.revision())
            .output_format(output_format)
            .maybe_log_level(args.log_level())
            .build();
        let (command, link) = args.into_command_and_link()?;

        run_with_options(command, &mut stdout, link_client(link), options).await
    }
    .await;

    match run_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
