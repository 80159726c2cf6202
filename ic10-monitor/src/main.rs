//! IC-10 CAT monitor
//!
//! Prints the state of an IC-10 rig over its serial port and follows its
//! transceive pushes.

mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ic10_link::{Ic10Rig, RigError, SerialTransport, Transport};
use ic10_protocol::{RigDatabase, Transceive};
use settings::MonitorSettings;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ic10mon")]
#[command(about = "Status monitor for IC-10 CAT transceivers")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $XDG_CONFIG_HOME/ic10/monitor.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port, overriding the settings file
    #[arg(short, long)]
    port: Option<String>,

    /// Rig model, overriding the settings file
    #[arg(short, long)]
    model: Option<String>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Print one status frame (default)
    Status,
    /// Enable transceive and print every pushed change
    Follow,
    /// Query the model code
    Identify,
    /// Dump a memory channel
    Channel {
        /// Channel number
        number: u8,
    },
    /// List known rig models
    Models,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ic10_monitor=info,ic10_link=info,ic10_protocol=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Status);
    let mut out = std::io::stdout().lock();

    if command == Commands::Models {
        return list_models(&mut out);
    }

    let mut settings = MonitorSettings::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        settings.serial.port = port;
    }
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if cli.save {
        let path = settings.save()?;
        info!("Saved settings to {}", path.display());
    }
    anyhow::ensure!(
        !settings.serial.port.is_empty(),
        "No serial port configured; pass --port or set serial.port in the settings file"
    );

    let config = settings.rig_config()?;
    info!(
        "Opening {} for {} ({} baud)",
        settings.serial.port, settings.model, settings.serial.baud_rate
    );
    let transport = SerialTransport::open(&settings.serial)
        .with_context(|| format!("Failed to open {}", settings.serial.port))?;
    let mut rig = Ic10Rig::new(transport, config)?;

    run(&mut rig, command, &settings, &mut out)
}

fn list_models(out: &mut impl Write) -> anyhow::Result<()> {
    for model in RigDatabase::all() {
        writeln!(
            out,
            "{:<8} frame width {:>2}, {:>3} channels{}",
            model.model,
            model.frame_width,
            model.channel_count,
            if model.id_code.is_some() { ", ID" } else { "" }
        )?;
    }
    Ok(())
}

fn run<T: Transport>(
    rig: &mut Ic10Rig<T>,
    command: Commands,
    settings: &MonitorSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Status => print_status(rig, out),
        Commands::Identify => {
            let identity = rig.identify()?;
            writeln!(out, "{} (code {})", identity.name(), identity.code as char)?;
            Ok(())
        }
        Commands::Channel { number } => {
            let record = rig.read_channel(number)?;
            write!(
                out,
                "CH {:02}  RX {} {}",
                record.channel,
                format_frequency(record.rx.frequency_hz),
                record.rx.mode
            )?;
            match record.tx {
                Some(tx) => writeln!(out, "  TX {} {}", format_frequency(tx.frequency_hz), tx.mode)?,
                None => writeln!(out)?,
            }
            Ok(())
        }
        Commands::Follow => follow(rig, settings, out),
        Commands::Models => list_models(out),
    }
}

fn print_status<T: Transport>(rig: &mut Ic10Rig<T>, out: &mut impl Write) -> anyhow::Result<()> {
    let status = rig.status()?;
    writeln!(
        out,
        "{}  {}  {}{}{}",
        status.vfo,
        format_frequency(status.frequency_hz),
        status.mode,
        if status.split_active { "  SPLIT" } else { "" },
        if status.ptt_active { "  TX" } else { "" }
    )?;
    Ok(())
}

fn follow<T: Transport>(
    rig: &mut Ic10Rig<T>,
    settings: &MonitorSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    print_status(rig, out)?;
    rig.set_transceive(Transceive::Rig)?;
    info!("Following transceive pushes, Ctrl-C to stop");

    let interval = Duration::from_millis(settings.poll_interval_ms);
    loop {
        if !follow_step(rig, out)? {
            std::thread::sleep(interval);
        }
    }
}

/// Handle one pending push; false when the line was idle
///
/// Frames the rig cannot decode are logged and skipped. Only link failures end
/// the follow loop.
fn follow_step<T: Transport>(rig: &mut Ic10Rig<T>, out: &mut impl Write) -> anyhow::Result<bool> {
    match rig.poll_event() {
        Ok(Some(event)) => {
            for change in event.events() {
                write!(out, "{}  ", change)?;
            }
            writeln!(out)?;
            Ok(true)
        }
        Ok(None) => Ok(false),
        Err(e @ (RigError::NotImplemented(_) | RigError::Protocol(_))) => {
            warn!("Skipping push: {}", e);
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

/// `14.074.000` style, as on the rig's display
fn format_frequency(hz: u64) -> String {
    let mhz = hz / 1_000_000;
    let khz = hz / 1_000 % 1_000;
    let rest = hz % 1_000;
    format!("{}.{:03}.{:03}", mhz, khz, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic10_link::RigConfig;
    use ic10_protocol::{ChannelEntry, MemoryChannel, Mode};
    use ic10_sim::VirtualRig;

    fn sim_rig() -> Ic10Rig<VirtualRig> {
        Ic10Rig::new(VirtualRig::new("sim", "TS-440S"), RigConfig::default()).unwrap()
    }

    fn run_to_string(rig: &mut Ic10Rig<VirtualRig>, command: Commands) -> String {
        let mut out = Vec::new();
        run(rig, command, &MonitorSettings::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(14_074_000), "14.074.000");
        assert_eq!(format_frequency(7_030_050), "7.030.050");
    }

    #[test]
    fn test_status_output() {
        let mut rig = sim_rig();
        assert_eq!(run_to_string(&mut rig, Commands::Status), "VFO A  14.074.000  USB\n");
    }

    #[test]
    fn test_identify_output() {
        let mut rig = sim_rig();
        assert_eq!(run_to_string(&mut rig, Commands::Identify), "TS-440S (code 4)\n");
    }

    #[test]
    fn test_channel_output() {
        let mut rig = sim_rig();
        rig.transport_mut().store_channel(MemoryChannel::split(
            9,
            ChannelEntry::new(7_074_000, Mode::Lsb),
            ChannelEntry::new(7_076_000, Mode::Lsb),
        ));
        assert_eq!(
            run_to_string(&mut rig, Commands::Channel { number: 9 }),
            "CH 09  RX 7.074.000 LSB  TX 7.076.000 LSB\n"
        );
    }

    #[test]
    fn test_follow_skips_unsupported_push() {
        let mut rig = sim_rig();
        rig.set_transceive(Transceive::Rig).unwrap();
        rig.transport_mut().inject_noise(b"IF0001;");
        rig.transport_mut().turn_dial(7_074_000);

        let mut out = Vec::new();
        assert!(follow_step(&mut rig, &mut out).unwrap());
        assert!(out.is_empty());

        assert!(follow_step(&mut rig, &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("frequency 7074000 Hz"));

        let mut idle = Vec::new();
        assert!(!follow_step(&mut rig, &mut idle).unwrap());
        assert!(idle.is_empty());
    }

    #[test]
    fn test_follow_stops_on_link_failure() {
        let mut rig = sim_rig();
        // a partial frame with nothing behind it times out
        rig.transport_mut().inject_noise(b"IF000");
        assert!(follow_step(&mut rig, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_models_output() {
        let mut out = Vec::new();
        list_models(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), RigDatabase::all().len());
        assert!(text.contains("R-5000"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["ic10mon", "--port", "/dev/ttyS0", "channel", "12"]).unwrap();
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyS0"));
        assert!(!cli.save);
        assert_eq!(cli.command, Some(Commands::Channel { number: 12 }));
    }
}
