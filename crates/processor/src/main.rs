use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passport_core::form::FormPhase;
use passport_events::{EventBus, ToastCenter};
use passport_processor::{ApiClient, PassportProcessor, ProcessorConfig};

const USAGE: &str = "usage: passport-processor <file> [--suggest]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passport_processor=info,passport_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut path: Option<PathBuf> = None;
    let mut suggest = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--suggest" => suggest = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
        }
    }
    let path = path.context(USAGE)?;

    // --- Configuration ---
    let config = ProcessorConfig::from_env();
    let client = ApiClient::new(&config).context("failed to build HTTP client")?;
    let convention = match config.date_convention {
        Some(convention) => convention,
        None => client
            .date_convention()
            .await
            .with_context(|| format!("failed to read form config from {}", config.api_url))?,
    };
    tracing::info!(api_url = %config.api_url, date_format = %convention, "Loaded processor configuration");

    // --- Notifications ---
    let events = Arc::new(EventBus::default());
    let toasts = Arc::new(ToastCenter::default());
    let toast_handle = tokio::spawn(Arc::clone(&toasts).run(events.subscribe()));

    // --- Session ---
    let processor = PassportProcessor::new(Arc::new(client), convention, Arc::clone(&events));

    processor.select_file(&path).await?;
    let form = processor.form();
    if form.phase() != FormPhase::Extracted {
        bail!(
            "{}",
            form.error().unwrap_or("extraction did not complete")
        );
    }
    println!("{}", serde_json::to_string_pretty(form.fields())?);

    if suggest {
        processor.suggest_corrections().await?;
        match processor.form().suggestions() {
            Some(set) => println!("{}", serde_json::to_string_pretty(set)?),
            None => bail!("no suggestions were returned"),
        }
    }

    processor.reset();

    drop(processor);
    drop(events);
    let _ = tokio::time::timeout(Duration::from_secs(2), toast_handle).await;

    Ok(())
}
