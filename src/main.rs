use clap::{ArgAction, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lightframe::models::config::CONFIG_FILE_ENV;
use lightframe::models::{AppConfig, EnhanceOptions, Operation, OutputFormat, ProcessingOptions};
use lightframe::rendering::{Download, PageView};
use lightframe::server;
use lightframe::services::{sniff_mime, Dispatcher, LightFrameClient, SessionHandle};

#[derive(Parser)]
#[command(name = "lightframe")]
#[command(about = "LightFrame - compress and enhance images with the LightFrame API")]
struct Cli {
    /// Base URL of the LightFrame API (overrides config and LIGHTFRAME_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// YAML config file (overrides LIGHTFRAME_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the local web UI
    Serve {
        /// Address to listen on (overrides config and LIGHTFRAME_BIND)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Compress an image and save the result
    Compress {
        /// Image to compress
        input: PathBuf,

        /// Number of colors in the palette (1-256)
        #[arg(short, long, default_value_t = 16)]
        colors: u32,

        /// Output format: auto, JPG or png
        #[arg(short, long, default_value = "auto")]
        format: OutputFormat,

        /// Let the backend downscale large images
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        reduce_resolution: bool,

        /// JPG quality (30-95), used with --format JPG
        #[arg(long, default_value_t = 85)]
        jpg_quality: u32,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Enhance an image and save the result
    Enhance {
        /// Image to enhance
        input: PathBuf,

        /// Filter neighbourhood diameter
        #[arg(long)]
        diameter: Option<i32>,

        /// Filter sigma in color space
        #[arg(long)]
        sigma_color: Option<u32>,

        /// Filter sigma in coordinate space
        #[arg(long)]
        sigma_space: Option<u32>,

        /// Scale factor applied before filtering
        #[arg(long)]
        upsample: Option<f32>,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { bind }) => {
            init_tracing("lightframe=info,tower_http=info", true);
            let mut config = load_config(cli.config.as_deref(), cli.api_url)?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            run_server(config).await
        }
        Some(Commands::Compress {
            input,
            colors,
            format,
            reduce_resolution,
            jpg_quality,
            output,
        }) => {
            init_tracing("lightframe=warn", false);
            let config = load_config(cli.config.as_deref(), cli.api_url)?;
            let options = ProcessingOptions {
                color_count: colors,
                output_format: format,
                reduce_resolution,
                jpg_quality,
            };
            options.validate()?;
            run_process_command(
                config,
                Operation::Compress,
                &input,
                output,
                options,
                EnhanceOptions::default(),
            )
            .await
        }
        Some(Commands::Enhance {
            input,
            diameter,
            sigma_color,
            sigma_space,
            upsample,
            output,
        }) => {
            init_tracing("lightframe=warn", false);
            let config = load_config(cli.config.as_deref(), cli.api_url)?;
            let enhance = EnhanceOptions {
                diameter,
                sigma_color,
                sigma_space,
                upsample,
            };
            enhance.validate()?;
            run_process_command(
                config,
                Operation::Enhance,
                &input,
                output,
                ProcessingOptions::default(),
                enhance,
            )
            .await
        }
        None => {
            init_tracing("lightframe=warn", false);
            let config = load_config(cli.config.as_deref(), cli.api_url)?;
            run_status_command(&config).await;
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str, with_time: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if with_time {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        // Minimal logging for CLI
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

/// Config from file/env, with command-line flags applied last
fn load_config(config_file: Option<&Path>, api_url: Option<String>) -> anyhow::Result<AppConfig> {
    let mut config = match config_file {
        Some(path) => {
            let mut config = AppConfig::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            config
        }
        None => AppConfig::load()?,
    };
    if let Some(url) = api_url {
        config.api_url = url;
    }
    Ok(config)
}

/// Run one request without the web UI and save the result
async fn run_process_command(
    config: AppConfig,
    operation: Operation,
    input: &Path,
    output: Option<PathBuf>,
    options: ProcessingOptions,
    enhance: EnhanceOptions,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let mime = sniff_mime(&bytes, None);

    let client = LightFrameClient::new(&config)?;
    let session = SessionHandle::new();
    let dispatcher = Dispatcher::new(session.clone(), Arc::new(client));

    {
        let mut session = session.lock();
        session.select_file(name, bytes.into(), mime);
        session.state.apply_options(options)?;
        session.state.set_enhance_options(enhance)?;
    }

    println!("{} via {} ...", operation_verb(operation), config.api_url);
    let outcome = dispatcher.run(operation).await;

    print!("{}", PageView::from_state(&session.snapshot()).render_text());
    outcome?;

    let download = Download::from_session(&session.lock(), &config.download_filename)?;
    let target = match output {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let path = download.save(&target).await?;
    println!("Saved {} ({} bytes)", path.display(), download.bytes.len());

    Ok(())
}

fn operation_verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Compress => "Compressing",
        Operation::Enhance => "Enhancing",
    }
}

/// Display configuration and backend reachability
async fn run_status_command(config: &AppConfig) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("LightFrame v{VERSION}");
    println!("Client for the LightFrame image compression API\n");

    println!("Configuration:");
    println!(
        "  {CONFIG_FILE_ENV} = {}",
        std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| "(not set)".to_string())
    );
    println!("  API URL           = {}", config.api_url);
    println!("  Bind address      = {}", config.bind);
    println!("  Request timeout   = {}s", config.request_timeout_secs);
    println!("  Download filename = {}", config.download_filename);
    println!(
        "  Assets            = {}",
        config
            .assets_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    );

    println!("\nBackend:");
    match LightFrameClient::new(config) {
        Ok(client) => match client.health().await {
            Ok(message) => println!("  reachable: {message}"),
            Err(e) => println!("  unreachable: {e}"),
        },
        Err(e) => println!("  client error: {e}"),
    }

    println!("\nCommands:");
    println!("  lightframe serve      Start the local web UI");
    println!("  lightframe compress   Compress an image file");
    println!("  lightframe enhance    Enhance an image file");
    println!("\nRun 'lightframe --help' for more details.");
}

/// Run the local web UI
async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind;

    tracing::info!(
        api_url = %config.api_url,
        assets = ?config.assets_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Configuration loaded"
    );

    let state = server::create_app_state(config)?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "LightFrame UI listening");

    axum::serve(listener, app).await?;

    Ok(())
}
