use clap::{Parser, Subcommand};
use std::sync::Arc;

use langtag_i18n::app::{self, AppState};
use langtag_i18n::config::Config;
use langtag_i18n::models::LocaleResponse;
use langtag_i18n::services::{DbMessageLoader, params_from_pairs};
use langtag_i18n::utils::init_logging;
use langtag_i18n::LocaleTag;

#[derive(Parser, Debug)]
#[command(name = "langtag-i18n", version, about = "BCP 47 locale parsing and message translation")]
struct Cli {
    /// Path to config.toml (default: conf/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a locale tag and print its subtags as JSON
    Parse { tag: String },
    /// Print the fallback chain of a locale tag
    Fallback { tag: String },
    /// Translate a message
    Translate {
        category: String,
        message: String,
        /// Target language (default: translator.default_language)
        #[arg(short, long)]
        language: Option<String>,
        /// Message parameters as key=value
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Print the message catalog of a category as JSON
    Messages { category: String, language: String },
    /// Create the message tables in the configured database
    Migrate,
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        Command::Parse { tag } => {
            let tag = LocaleTag::try_from(tag.as_str())?;
            println!("{}", serde_json::to_string_pretty(&LocaleResponse::from(&tag))?);
        }
        Command::Fallback { tag } => {
            let tag = LocaleTag::try_from(tag.as_str())?;
            for fallback in tag.fallback_chain() {
                println!("{}", fallback);
            }
        }
        Command::Translate { category, message, language, params } => {
            let translator = translator(&config).await?;
            let language = language.unwrap_or_else(|| config.translator.default_language.clone());
            let language = LocaleTag::try_from(language.as_str())?.to_string();
            let params = params_from_pairs(&params);
            println!("{}", translator.translate(&category, &message, &params, &language).await);
        }
        Command::Messages { category, language } => {
            let translator = translator(&config).await?;
            let language = LocaleTag::try_from(language.as_str())?.to_string();
            let catalog = translator.get_messages(&category, &language).await?;
            let messages: std::collections::BTreeMap<_, _> = catalog.messages().into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::Migrate => {
            let pool = app::connect_database(&config.database.url).await?;
            DbMessageLoader::new(pool).migrate().await?;
            tracing::info!("Database migrations applied");
        }
        Command::Serve => {
            let translator = Arc::new(translator(&config).await?);
            let default_locale = LocaleTag::try_from(config.translator.default_language.as_str())?;
            let state = Arc::new(AppState::new(translator, default_locale));
            app::serve(&config, state).await?;
        }
    }

    Ok(())
}

async fn translator(config: &Config) -> anyhow::Result<langtag_i18n::Translator> {
    let pool = if config.uses_database() {
        let pool = app::connect_database(&config.database.url).await?;
        DbMessageLoader::new(pool.clone()).migrate().await?;
        Some(pool)
    } else {
        None
    };
    Ok(app::build_translator(config, pool.as_ref())?)
}
