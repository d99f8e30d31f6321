use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopmunim::config::Config;
use shopmunim::i18n;
use shopmunim::models::{PreferenceKey, ShopCategory, ShopDraft};
use shopmunim::services::notifications::FeedView;
use shopmunim::{HttpApiClient, NotificationFeed, PreferenceStore, ShopForm, ShopMunimApi};

#[derive(Parser, Debug)]
#[command(name = "shopmunim")]
#[command(about = "ShopMunim ledger client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show recent notifications
    Notifications {
        /// Print the full message of this notification
        #[arg(long)]
        expand: Option<String>,
    },
    /// Show or change notification preferences
    Preferences {
        #[command(subcommand)]
        action: Option<PreferencesAction>,
    },
    /// Create a new shop
    CreateShop {
        #[arg(long)]
        name: String,
        /// grocery, medical, electronics, clothing, restaurant or other
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: String,
    },
}

#[derive(Subcommand, Debug)]
enum PreferencesAction {
    /// Turn one switch (or all of them) on or off
    Set {
        /// push, payment-alerts, promotions or all
        key: String,
        value: Toggle,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(config.logging.json);

    let lang = config.locale.lang.clone();
    if !i18n::is_supported_language(&lang) {
        tracing::warn!(
            "{}",
            i18n::tr(None, "error.unsupported_language", Some(&[("lang", lang.as_str())]))
        );
    }

    let api: Arc<dyn ShopMunimApi> = Arc::new(HttpApiClient::new(&config.api)?);
    tracing::debug!(base_url = %config.api.base_url, "Using ShopMunim backend");

    match cli.command {
        Command::Notifications { expand } => show_notifications(api, lang, expand).await,
        Command::Preferences { action } => preferences(api, &lang, action).await,
        Command::CreateShop {
            name,
            category,
            location,
        } => create_shop(api, lang, name, category, location).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopmunim=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output on stdout stays clean.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn show_notifications(
    api: Arc<dyn ShopMunimApi>,
    lang: String,
    expand: Option<String>,
) -> anyhow::Result<()> {
    let feed = NotificationFeed::new(api, Some(lang));
    feed.fetch().await.context("failed to fetch notifications")?;
    if let Some(id) = expand {
        feed.toggle_expand(&id).await;
    }

    match feed.view(Utc::now()).await {
        FeedView::Empty(empty) => {
            println!("{}", empty.title);
            println!("{}", empty.subtitle);
        }
        FeedView::List { header, cards } => {
            println!("{}", header);
            for card in cards {
                println!();
                println!("[{}] {}  ({})", card.id, card.title, card.time_label);
                if !card.shop_name.is_empty() {
                    println!("    {}", card.shop_name);
                }
                println!("    {}", card.body);
            }
        }
    }

    Ok(())
}

async fn preferences(
    api: Arc<dyn ShopMunimApi>,
    lang: &str,
    action: Option<PreferencesAction>,
) -> anyhow::Result<()> {
    let store = PreferenceStore::new(api);
    if let Err(e) = store.load().await {
        tracing::warn!(error = %e, "Continuing with default notification preferences");
    }

    if let Some(PreferencesAction::Set { key, value }) = action {
        let value = matches!(value, Toggle::On);
        let sync = if key.eq_ignore_ascii_case("all") {
            store.set_all(value).await
        } else {
            let key: PreferenceKey = key.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            store.set_one(key, value).await
        };
        // Wait for the write so the process does not exit mid-request.
        sync.await?;
    }

    let prefs = store.preferences().await;
    for key in PreferenceKey::ALL {
        println!(
            "{:<24} {}",
            i18n::tr(Some(lang), key.label_key(), None),
            on_off(prefs.get(key))
        );
    }
    println!(
        "{:<24} {}",
        i18n::tr(Some(lang), "preferences.all", None),
        on_off(prefs.all_enabled())
    );

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

async fn create_shop(
    api: Arc<dyn ShopMunimApi>,
    lang: String,
    name: String,
    category: Option<String>,
    location: String,
) -> anyhow::Result<()> {
    let category = category
        .map(|c| c.parse::<ShopCategory>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let form = ShopForm::new(api, Some(lang.clone()));
    let shop = form
        .submit(&ShopDraft {
            name,
            category,
            location,
        })
        .await?;

    println!("{}", i18n::tr(Some(lang.as_str()), "shop.created", None));
    println!("id: {}", shop.id);
    if let Some(code) = shop.shop_code {
        println!("code: {}", code);
    }

    Ok(())
}
