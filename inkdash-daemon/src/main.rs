//! inkdashd entry point.

use clap::Parser;
use inkdash_daemon::app::CaptureTarget;
use inkdash_daemon::telemetry::{init_tracer, TelemetryConfig};
use inkdash_daemon::{app, config, Cli, Command, DaemonError};

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    let cli = Cli::parse();
    init_tracer(&TelemetryConfig::default())?;
    let config = config::load(cli.config.as_deref())?;

    match cli.command_or_default() {
        Command::Run { capture, output } => {
            let target = capture
                .zip(output)
                .map(|(capture, output)| CaptureTarget { capture, output });
            app::run(config, target).await
        }
        Command::Snapshot => {
            let json = app::snapshot_once(&config).await?;
            println!("{}", json);
            Ok(())
        }
        Command::Process { input, output } => app::process_file(&config, &input, &output).await,
    }
}
