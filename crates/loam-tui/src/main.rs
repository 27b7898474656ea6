mod action;
mod app;
mod component;
mod components;
mod controller;
mod focus;
mod layout;
mod navigation;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use loam_proto::chat::{BedrockChat, ChatRequest, ChatService, UnavailableChat};
use loam_proto::config::Config;
use loam_proto::fetch::{parse_resource_url, Fetcher};
use loam_proto::listing::{chat_context, parse_listing};
use loam_proto::platform;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "loam")]
#[command(version, about = "Browse IIIF collections and manifests in the terminal")]
struct Args {
    /// Collection or manifest URL to load at start-up
    url: Option<String>,

    /// Batch mode: IIIF URL to fetch (used together with --prompt)
    #[arg(long)]
    manifest: Option<String>,

    /// Batch mode: question to ask about the listing (used together with --manifest)
    #[arg(long)]
    prompt: Option<String>,

    /// Named chat profile from the config file
    #[arg(long)]
    profile: Option<String>,
}

impl Args {
    /// `(manifest, prompt)` when both are given; anything less runs the TUI.
    fn batch(&self) -> Option<(&str, &str)> {
        self.manifest.as_deref().zip(self.prompt.as_deref())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join("loam.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("config load failed, using defaults: {:#}", e);
        Config::default()
    });

    if let Some((manifest, prompt)) = args.batch() {
        info!("batch mode: {}", manifest);
        return run_batch(&config, manifest, prompt, args.profile.as_deref()).await;
    }

    eprintln!("loam log: {}", log_path.display());
    info!("loam starting…");

    let chat_config = config.chat.resolve(args.profile.as_deref())?;
    let chat: Arc<dyn ChatService> = match BedrockChat::from_config(&chat_config) {
        Ok(chat) => {
            info!("chat model: {}", chat.model_id());
            Arc::new(chat)
        }
        Err(e) => {
            warn!("chat disabled: {}", e);
            Arc::new(UnavailableChat::new(e.to_string()))
        }
    };
    let fetcher = Fetcher::new(&config.fetch)?;

    let start_url = args.url.or_else(|| config.ui.start_url.clone());
    let controller = controller::Controller::new(start_url.as_deref());
    app::App::new(controller, fetcher, chat).run().await
}

/// Fetch one document, ask one question about it, print the answer.
async fn run_batch(
    config: &Config,
    manifest: &str,
    prompt: &str,
    profile: Option<&str>,
) -> anyhow::Result<()> {
    let url = parse_resource_url(manifest).context("invalid --manifest URL")?;
    let fetcher = Fetcher::new(&config.fetch)?;
    let body = fetcher
        .fetch(url.as_str())
        .await
        .with_context(|| format!("failed to fetch {}", url))?;
    let entries = parse_listing(&body).context("failed to read IIIF listing")?;
    info!("batch: {} entries from {}", entries.len(), url);

    let chat = BedrockChat::from_config(&config.chat.resolve(profile)?)?;
    let reply = chat
        .send(ChatRequest::new(chat_context(&entries), prompt))
        .await
        .context("chat request failed")?;
    println!("{}", reply.trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_needs_both_flags() {
        let args = Args::try_parse_from(["loam", "--manifest", "https://x.org/m", "--prompt", "why?"])
            .unwrap();
        assert_eq!(args.batch(), Some(("https://x.org/m", "why?")));

        let args = Args::try_parse_from(["loam", "--manifest", "https://x.org/m"]).unwrap();
        assert_eq!(args.batch(), None);

        let args = Args::try_parse_from(["loam", "--prompt", "why?", "--profile", "work"]).unwrap();
        assert_eq!(args.batch(), None);
        assert_eq!(args.profile.as_deref(), Some("work"));
    }
}
