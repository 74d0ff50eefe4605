use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use recolor::api;
use recolor::models::{AppConfig, ColorInput, ImageSource, SessionInfo};
use recolor::server;
use recolor::services::Viewport;

#[derive(Parser)]
#[command(name = "recolor")]
#[command(about = "Recolor - color quantization and exact color substitution")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recolor API",
        description = "Color quantization and exact color substitution on uploaded images",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_create_session,
        api::handle_get_session,
        api::handle_delete_session,
        api::handle_reset,
        api::handle_quantize,
        api::handle_substitute,
        api::handle_pixel,
        api::handle_eyedropper,
        api::handle_viewport,
        api::handle_image,
        api::handle_preview,
    ),
    components(schemas(
        SessionInfo,
        ImageSource,
        ColorInput,
        Viewport,
        api::QuantizeBody,
        api::QuantizeResponse,
        api::SubstituteBody,
        api::SubstituteResponse,
        api::PixelResponse,
        api::EyedropperResponse,
    )),
    tags(
        (name = "Sessions", description = "Image upload and session lifecycle"),
        (name = "Editing", description = "Quantization and color substitution"),
        (name = "Sampling", description = "Pixel reads and eyedropper"),
        (name = "Output", description = "Encoded image download and previews")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var("CONFIG_FILE").ok().map(PathBuf::from)
}

/// Show configuration when no command is given
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    // Header
    println!("Recolor v{VERSION}");
    println!("Color quantization and exact color substitution\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfiguration ({config_source}):");

    let config = AppConfig::load(config_path().as_deref());
    println!(
        "  Quantize defaults: {} colors, {}",
        config.default_color_count, config.default_method
    );
    println!(
        "  Canvas:            {}x{}",
        config.canvas.width, config.canvas.height
    );
    println!("  Preview max size:  {}", config.preview_max_size);
    println!(
        "  Upload limit:      {} MiB",
        config.max_upload_bytes / (1024 * 1024)
    );
    println!(
        "  PNG optimization:  {}",
        if config.optimize_png { "on" } else { "off" }
    );
    println!("  JPEG quality:      {}", config.jpeg_quality);
    println!(
        "  Sessions:          up to {}, idle expiry {}s",
        config.max_sessions, config.session_ttl_secs
    );

    println!("\nMethods: kmeans, quantize (median cut), threshold");

    // Usage hints
    println!("\nCommands:");
    println!("  recolor serve    Start the HTTP server");
    println!("  recolor --help   Show all options");
}

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recolor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = config_path();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = AppConfig::load(config_file.as_deref());
    tracing::info!(
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
        default_method = %config.default_method,
        default_color_count = config.default_color_count,
        "Configuration loaded"
    );

    // Create application state using shared server module
    let state = server::create_app_state(config);

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Recolor server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
