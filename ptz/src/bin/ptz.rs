use clap::{Parser, Subcommand};
use ptz::{Camera, Position, Result, DEFAULT_PORT};
use std::{process::ExitCode, time::Duration};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Query pan/tilt/zoom positions from a VISCA over IP camera.
#[derive(Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct CliParser {
    /// TCP port the camera listens for VISCA on.
    #[clap(short, long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Timeout, in seconds, for connecting and for each read or write.
    #[clap(short, long, global = true, default_value_t = 10)]
    timeout: u64,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Query camera for current P/T/Z positions
    Query {
        /// Hostname or IP address of the camera.
        host: String,
    },

    /// Generate preset URLs for current P/T/Z positions
    Preset {
        /// Hostname or IP address of the camera.
        host: String,

        /// Pan speed to put in the URL.
        #[clap(long, default_value_t = 0)]
        pan_speed: u8,

        /// Tilt speed to put in the URL.
        #[clap(long, default_value_t = 0)]
        tilt_speed: u8,

        /// Zoom speed to put in the URL.
        #[clap(long, default_value_t = 0)]
        zoom_speed: u8,
    },
}

/// HTTP-CGI URLs which move a camera at `host` to `position`.
fn preset_urls(
    host: &str,
    position: &Position,
    pan_speed: u8,
    tilt_speed: u8,
    zoom_speed: u8,
) -> [String; 2] {
    [
        format!(
            "Pan/Tilt: http://{host}/cgi-bin/ptzctrl.cgi?ptzcmd&abs&{pan_speed}&{tilt_speed}&{:04x}&{:04x}",
            position.pan, position.tilt,
        ),
        format!(
            "    Zoom: http://{host}/cgi-bin/ptzctrl.cgi?ptzcmd&zoomto&{zoom_speed}&{:04x}",
            position.zoom,
        ),
    ]
}

async fn run(opts: CliParser) -> Result {
    let timeout = Duration::from_secs(opts.timeout);
    match opts.command {
        Command::Query { host } => {
            let camera = Camera::new(host).with_port(opts.port).with_timeout(timeout);
            let position = camera.query().await?;
            println!("{position}");
        }

        Command::Preset {
            host,
            pan_speed,
            tilt_speed,
            zoom_speed,
        } => {
            let camera = Camera::new(host.as_str())
                .with_port(opts.port)
                .with_timeout(timeout);
            let position = camera.query().await?;
            for url in preset_urls(&host, &position, pan_speed, tilt_speed, zoom_speed) {
                println!("{url}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
    let opts = CliParser::parse();

    match run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
