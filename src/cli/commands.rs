//! CLI subcommands — serve, speak, config, and config loading.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::channels::RelayService;
use crate::channels::telegram::TelegramAgent;
use crate::config::Config;
use crate::tts::{ConversionError, ConversionJob, SpeechSynthesizer, TtsClient};

/// Load configuration from file or defaults
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path.display());
        Config::load_from_path(path)
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()
    }
}

/// Run the bot until Ctrl-C
pub(crate) async fn cmd_serve(config: &Config) -> Result<()> {
    // Refuse to start without both settings; nothing is accepted before this.
    config.validate_for_bot()?;
    let token = config.bot_token()?.clone();

    let relay = Arc::new(RelayService::start(config).await?);
    let dispatcher = TelegramAgent::new(relay.clone()).start(token);
    tracing::info!("Bot started successfully");

    dispatcher
        .await
        .context("Telegram dispatcher task failed")?;

    relay.shutdown().await;
    Ok(())
}

/// One conversion against the configured endpoint, written to `output`
pub(crate) async fn cmd_speak(config: &Config, text: &str, output: &Path) -> Result<()> {
    let api_url = config.tts_api_url()?;

    println!("Converting text: \"{}\"", text);
    println!("Using API URL: {}", api_url);

    let client = TtsClient::new(api_url, config.request_timeout())?;
    let mut job = ConversionJob::new(text, output);

    println!("Sending request to TTS API...");
    match client.convert(&mut job).await {
        Ok(path) => {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            println!("✅ Audio file saved to: {} ({} bytes)", path.display(), size);
            println!("Test completed successfully!");
            Ok(())
        }
        Err(e) => {
            println!("❌ Error converting text to speech:");
            match &e {
                ConversionError::Status { status, body } => {
                    println!("   Status: {}", status);
                    println!("   Response data: {}", body);
                }
                other => println!("   {}", other),
            }
            Err(e).context("Test failed")
        }
    }
}

/// Show configuration
pub(crate) fn cmd_config(config: &Config) -> Result<()> {
    println!("tts-relay configuration\n");

    println!(
        "Telegram bot token: {}",
        if config.bot_token().is_ok() {
            "[SET]"
        } else {
            "[NOT SET]"
        }
    );
    println!("TTS API URL:        {}", tts_url_status(config));
    println!("Scratch directory:  {}", config.tts.temp_dir().display());
    match config.request_timeout() {
        Some(timeout) => println!("Request timeout:    {}s", timeout.as_secs()),
        None => println!("Request timeout:    none"),
    }

    if let Some(path) = Config::system_config_path() {
        println!(
            "\nSystem config: {} ({})",
            path.display(),
            if path.exists() { "found" } else { "not found" }
        );
    }

    Ok(())
}

/// How `cmd_config` shows the TTS endpoint: the URL, `[NOT SET]`, or
/// `[INVALID]` with the reason.
fn tts_url_status(config: &Config) -> String {
    let unset = config
        .tts
        .api_url
        .as_deref()
        .is_none_or(|u| u.trim().is_empty());
    if unset {
        return "[NOT SET]".to_string();
    }
    match config.tts_api_url() {
        Ok(url) => url.to_string(),
        Err(e) => format!("[INVALID] {}", e),
    }
}
