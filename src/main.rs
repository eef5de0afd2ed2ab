use swapstream::adapters::ReqwestHttpClient;
use swapstream::{CancelHandle, SessionConfig, StreamEvent, StreamSession, SubjectImage, SwapUpload};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use futures::StreamExt;
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "usage: swapstream <image-path> <item-id> [--device <device-id>] [--verbose]

Environment:
  SWAPSTREAM_API_URL       API base URL (default http://localhost:8000)
  SWAPSTREAM_TOKEN         bearer token
  SWAPSTREAM_ROLE          caller role
  SWAPSTREAM_TIMEOUT_SECS  overall request timeout
  RUST_LOG                 log filter (with --verbose)";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct CliArgs {
    image_path: String,
    item_id: String,
    device_id: Option<String>,
    verbose: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> std::result::Result<Self, String> {
        let mut positional = Vec::new();
        let mut device_id = None;
        let mut verbose = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--device" => {
                    device_id = Some(args.next().ok_or("--device needs a value")?);
                }
                "--verbose" | "-v" => verbose = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
                _ => positional.push(arg),
            }
        }

        match <[String; 2]>::try_from(positional) {
            Ok([image_path, item_id]) => Ok(Self {
                image_path,
                item_id,
                device_id,
                verbose,
            }),
            Err(_) => Err("expected <image-path> and <item-id>".to_string()),
        }
    }
}

fn init_tracing(verbose: bool) {
    // Quiet by default so stdout stays a clean JSON-lines feed; RUST_LOG
    // is honoured only with --verbose.
    let filter = if verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// One stdout line per event.
#[derive(Debug, Serialize)]
struct EventLine<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> EventLine<'a> {
    fn from_event(event: &'a StreamEvent) -> Self {
        match event {
            StreamEvent::Message { event, payload } => Self {
                event,
                payload: Some(payload),
                error: None,
            },
            StreamEvent::Completed { payload } => Self {
                event: "completed",
                payload: Some(payload),
                error: None,
            },
            StreamEvent::Failed(err) => Self {
                event: "failed",
                payload: None,
                error: Some(err.to_string()),
            },
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = SessionConfig::from_env();
    let client = ReqwestHttpClient::from_config(&config)
        .map_err(|e| eyre!("failed to build HTTP client: {}", e))?;

    let session = StreamSession::new(client, config);

    let image = SubjectImage::from_path(&args.image_path)
        .await
        .wrap_err_with(|| format!("failed to read image {}", args.image_path))?;
    let mut upload = SwapUpload::new(image, args.item_id);
    if let Some(device_id) = args.device_id {
        upload = upload.for_device(device_id);
    }

    let cancel = CancelHandle::new();
    cancel.cancel_on_interrupt();

    let mut events = session.open_with_cancel(&upload, cancel.clone()).await;
    let mut completed = false;
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&EventLine::from_event(&event))?);
        match event {
            StreamEvent::Completed { .. } => completed = true,
            StreamEvent::Failed(err) => return Err(eyre!("{} ({})", err.user_message(), err)),
            StreamEvent::Message { .. } => {}
        }
    }

    if cancel.is_cancelled() {
        return Err(eyre!("cancelled"));
    }
    if !completed {
        return Err(eyre!("stream ended before the swap completed"));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Handle --version flag before any initialization
    if std::env::args().any(|arg| arg == "--version") {
        println!("swapstream {}", VERSION);
        std::process::exit(0);
    }

    if std::env::args().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        std::process::exit(0);
    }

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    color_eyre::install()?;
    init_tracing(args.verbose);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args))
}
