use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use messagebox::processing::{PicturePipeline, rle};
use messagebox::error::classify;
use messagebox::{
    AppConfig, FitPreset, HasRecoverySuggestion, HttpBridgeTransport, Inbound, PictureFraming,
    PipelineError, Reassembler, SendSession, StdoutTransport, Transport,
};
use tracing_subscriber::EnvFilter;

/// Send a text message or a monochrome picture to a message box display.
#[derive(Parser, Debug)]
#[command(name = "mbox")]
#[command(about = "📨 Send text or 128×128 monochrome pictures over a pub/sub broker")]
#[command(long_about = "Send text or pictures to a remote display.
Pictures are scaled to 128×128, thresholded to black and white, run-length encoded
and published as two chunks. Text is published with a '$&#' terminator.")]
struct Args {
    /// JSON config file ({ \"send\": {...}, \"broker\": {...} })
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Broker HTTP publish URL (overrides the config file)
    #[arg(long, global = true)]
    broker: Option<String>,

    /// Topic to publish on (overrides the config file)
    #[arg(short, long, global = true)]
    topic: Option<String>,

    /// Broker username
    #[arg(long, global = true)]
    user: Option<String>,

    /// Broker password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Print payloads instead of publishing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a text message
    Text {
        /// Message body
        message: String,
    },
    /// Send a picture
    Picture {
        /// Image file (PNG, JPEG, ...)
        path: PathBuf,

        /// How the photo is mapped onto the grid
        #[arg(long, value_enum)]
        fit: Option<FitPreset>,

        /// Two publishes (split) or one (single)
        #[arg(long, value_enum)]
        framing: Option<PictureFraming>,

        /// Print an ASCII preview of the bitmap that was sent
        #[arg(long)]
        preview: bool,
    },
    /// Encode a picture and print its payload without sending
    Encode {
        /// Image file (PNG, JPEG, ...)
        path: PathBuf,

        #[arg(long, value_enum, default_value = "stretch")]
        fit: FitPreset,
    },
    /// Reassemble received payloads and render the picture
    Decode {
        /// Received payloads in arrival order (e.g. first chunk, second chunk)
        #[arg(required = true)]
        payloads: Vec<String>,

        /// Write the decoded picture as an image file instead of ASCII
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Some(hint) = err.downcast_ref::<PipelineError>().and_then(exit_hint) {
                eprintln!("hint: {}", hint);
            }
            Err(err)
        }
    }
}

/// Hint printed next to a failed command.
///
/// A suggestion attached to the error wins; otherwise the error class decides.
fn exit_hint(error: &PipelineError) -> Option<&str> {
    if let Some(suggestion) = error.recovery_suggestion() {
        return Some(suggestion);
    }
    if classify::is_delivery_error(error) {
        Some("check the broker URL and credentials, or retry with --dry-run")
    } else if classify::requires_user_intervention(error) {
        Some("fix the config file or the command-line flags")
    } else if classify::is_input_error(error) {
        Some("the input cannot be encoded as given; try another file or payload")
    } else {
        None
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;

    match args.command {
        Command::Text { message } => {
            let session = build_session(&config, args.dry_run)?;
            let report = session.send_text(message).await?;
            println!("sent {} ({} bytes)", report.mode, report.total_bytes());
        }
        Command::Picture {
            path,
            fit,
            framing,
            preview,
        } => {
            if let Some(fit) = fit {
                config.send.fit = fit;
            }
            if let Some(framing) = framing {
                config.send.framing = framing;
            }
            let image = messagebox::load_image(&path)?;
            let session = build_session(&config, args.dry_run)?;
            let report = session.send_picture(image).await?;
            if let Some(bitmap) = report.bitmap.as_ref().filter(|_| preview) {
                print!("{}", bitmap.to_ascii()?);
            }
            println!(
                "sent {} in {} publish(es), {} bytes",
                report.mode,
                report.publishes(),
                report.total_bytes()
            );
        }
        Command::Encode { path, fit } => {
            let image = messagebox::load_image(&path)?;
            let encoded = PicturePipeline::new(fit.to_aspect())?.encode(&image)?;
            let (first, second) = encoded.chunks();
            println!("payload: {}", encoded.payload);
            println!("chunk 1: {}", first);
            println!("chunk 2: {}", second);
            println!(
                "runs: {}, ones: {}/{}, ratio: {:.4}",
                rle::runs(&encoded.bitmap).len(),
                encoded.bitmap.count_ones(),
                encoded.bitmap.len(),
                encoded.compression_ratio()
            );
        }
        Command::Decode { payloads, out } => decode(&payloads, out)?,
    }
    Ok(())
}

/// Merge the config file (if any) with command-line overrides.
///
/// Only the send section is checked here; broker settings are validated when
/// a publishing transport is built, so offline commands ignore them.
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(url) = &args.broker {
        config.broker.url = url.clone();
    }
    if let Some(topic) = &args.topic {
        config.send.topic = topic.clone();
    }
    if let Some(user) = &args.user {
        config.broker.username = Some(user.clone());
    }
    if let Some(password) = &args.password {
        config.broker.password = Some(password.clone());
    }
    config.send.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn build_session(config: &AppConfig, dry_run: bool) -> Result<SendSession> {
    let transport: std::sync::Arc<dyn Transport> = if dry_run {
        std::sync::Arc::new(StdoutTransport)
    } else {
        std::sync::Arc::new(HttpBridgeTransport::new(config.broker.clone())?)
    };
    Ok(SendSession::builder()
        .with_shared_transport(transport)
        .with_config(config.send.clone())
        .build()?)
}

fn decode(payloads: &[String], out: Option<PathBuf>) -> Result<()> {
    let mut rx = Reassembler::new();
    let mut last = None;
    for payload in payloads {
        if let Some(inbound) = rx.accept(payload)? {
            last = Some(inbound);
        }
    }

    match last {
        Some(Inbound::Text(text)) => println!("{}", text),
        Some(Inbound::Picture(bitmap)) => match out {
            Some(path) => {
                bitmap
                    .to_gray_image()?
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            None => print!("{}", bitmap.to_ascii()?),
        },
        None => {
            return Err(anyhow!(
                "incomplete picture: {} payload(s) given, second chunk missing",
                payloads.len()
            ));
        }
    }
    Ok(())
}
