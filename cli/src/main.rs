//! CLI entrypoint for neetchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Context, Result};
use clap::Parser;
use neetchat_application::{
    AccessGate, CompletionBackend, NoVerificationService, SessionController, VerificationService,
};
use neetchat_domain::{AccessMode, ApiKey};
use neetchat_infrastructure::{
    ChatCompletionsBackend, ConfigLoader, FileAuthFlag, HttpVerificationService,
};
use neetchat_presentation::{ChatRepl, Cli, ConsoleRenderer, TypingIndicator};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting neetchat");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    if let Some(choice) = cli.provider {
        config.provider.preset = choice.as_preset().to_string();
    }

    let provider = config
        .provider
        .to_provider_config()
        .context("invalid provider configuration")?;

    // Key resolution: the command line beats the config file, which beats
    // the environment.
    let configured_key = cli
        .api_key
        .clone()
        .or_else(|| config.access.resolve_api_key())
        .and_then(ApiKey::try_new);

    // === Dependency Injection ===
    let backend: Arc<dyn CompletionBackend> = Arc::new(ChatCompletionsBackend::new(provider));

    let verification: Arc<dyn VerificationService> = match config.verification.endpoints() {
        Some((send_url, verify_url)) => {
            Arc::new(HttpVerificationService::new(send_url, verify_url))
        }
        None => Arc::new(NoVerificationService),
    };

    let flag_path = config
        .access
        .auth_flag_path
        .clone()
        .unwrap_or_else(FileAuthFlag::default_path);
    let flags = Arc::new(FileAuthFlag::new(flag_path));

    let gate = Arc::new(AccessGate::new(verification, flags, configured_key));
    let session = Arc::new(SessionController::new(gate.clone(), backend));

    // Single question mode
    if let Some(question) = cli.question {
        if gate.mode() != AccessMode::Unlocked {
            bail!("chat is locked; pass --api-key or run interactively to unlock");
        }

        let indicator = (!cli.quiet).then(TypingIndicator::start);
        let result = session.submit(&question, None).await;
        if let Some(indicator) = indicator {
            indicator.finish();
        }
        result.context("submission rejected")?;

        ConsoleRenderer::print_new_entries(&session.transcript(), 0);
        return Ok(());
    }

    // Chat mode
    ChatRepl::new(gate, session)
        .with_progress(!cli.quiet)
        .run()
        .await?;

    Ok(())
}
