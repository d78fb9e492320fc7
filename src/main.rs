use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen::configuration;
use lumen::device::http::HttpDevice;
use lumen::device::model::{Action, Color};
use lumen::device::stubs::JustLog;
use lumen::runtime::TokioRuntime;
use lumen::sequencer::{Pattern, PatternChange, PlayOutcome, Sequencer, SequencerDevice};
use lumen::telemetry::poller::{PollerSource, TelemetryPoller};
use lumen::telemetry::realtime_db::RealtimeDbSource;
use lumen::telemetry::stubs::Absent;

#[derive(Parser)]
#[command(about = "Drive the Lumen board LEDs and watch its sensor readings.")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, default_value = "lumen.yaml")]
    config: PathBuf,

    /// Log device commands instead of sending them.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Switch a single LED.
    Toggle { color: Color, action: Action },
    /// Run one pattern and wait until all LEDs are off again.
    Play {
        #[arg(short, long, value_enum)]
        pattern: Option<Pattern>,
    },
    /// Print sensor readings as they are polled.
    Telemetry {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = configuration::load_from_yaml(&cli.config)?;
    let runtime = Arc::new(TokioRuntime::current());

    match cli.command {
        Command::Toggle { color, action } => {
            let device = device(&config, cli.dry_run)?;
            let sequencer = Sequencer::start(device, runtime, (&config.sequence).into());
            sequencer.toggle(color, action.is_on()).await?;
            println!("{:?}", sequencer.snapshot().leds);
        }
        Command::Play { pattern } => {
            let device = device(&config, cli.dry_run)?;
            let sequencer = Sequencer::start(device, runtime, (&config.sequence).into());
            if let Some(pattern) = pattern {
                if sequencer.set_pattern(pattern).await? == PatternChange::Ignored {
                    tracing::warn!(?pattern, "Pattern not applied.");
                }
            }
            if sequencer.play().await? == PlayOutcome::Started {
                let snapshot = sequencer.wait_idle().await?;
                println!("{:?}", snapshot.leds);
            }
        }
        Command::Telemetry { count } => {
            let source: PollerSource = match &config.telemetry.database_url {
                Some(database_url) => {
                    let source = RealtimeDbSource::new(
                        database_url,
                        &config.telemetry.path,
                        config.telemetry.auth.clone(),
                        config.telemetry.request_timeout(),
                    )?;
                    tracing::info!(url = source.url(), "Polling telemetry.");
                    Arc::new(source)
                }
                None => {
                    tracing::warn!("No telemetry database configured, showing defaults.");
                    Arc::new(Absent)
                }
            };
            let telemetry = TelemetryPoller::start(source, runtime, (&config.telemetry).into());
            let mut readings = telemetry.subscribe();
            let mut printed = 0;
            while count.map_or(true, |count| printed < count) {
                readings.changed().await?;
                let reading = *readings.borrow_and_update();
                println!("temperature: {} °C, humidity: {} %", reading.temp, reading.humid);
                printed += 1;
            }
        }
    }

    Ok(())
}

fn device(config: &configuration::LumenConfig, dry_run: bool) -> anyhow::Result<SequencerDevice> {
    if dry_run {
        return Ok(Arc::new(JustLog));
    }
    Ok(Arc::new(HttpDevice::new(
        &config.device.base_url,
        config.device.request_timeout(),
    )?))
}
