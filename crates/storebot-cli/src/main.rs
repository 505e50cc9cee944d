//! 🛒 storebot CLI — chat with your store, onboarding, and status commands.
//!
//! Usage:
//!   storebot chat             — Start an interactive chat session
//!   storebot ask <message>    — Answer a single message
//!   storebot classify <msg>   — Show how a message would be routed
//!   storebot describe         — Draft a product description and category
//!   storebot onboard          — Create a default configuration
//!   storebot status           — Show current configuration and health

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use storebot_core::assistant::{
    AiRouter, Assistant, AssistantMessage, GenerationSettings, IntentDetector, ProductCopywriter,
    RouteContext,
};
use storebot_core::config::Config;
use storebot_core::conversation::Conversation;
use storebot_core::provider::openai::OpenAiProvider;
use storebot_core::provider::LlmProvider;
use storebot_core::store::file::QueryLimits;
use storebot_core::store::FileStore;

/// Pause before following a navigation action, so the reply is read first.
const NAVIGATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Parser)]
#[command(
    name = "storebot",
    version,
    about = "A storefront assistant for small online sellers",
    long_about = "🛒 storebot — ask about sales, stock, orders and customers in plain language.\n\nStore questions are answered from your store data. Everything else goes to a text-generation API."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Store to answer questions about (overrides config)
        #[arg(short, long)]
        store: Option<String>,

        /// Your first name (overrides config)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Answer a single message and exit
    Ask {
        /// The message to answer
        message: String,

        /// Store to answer questions about (overrides config)
        #[arg(short, long)]
        store: Option<String>,

        /// Print the full reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the intent and route for a message without answering it
    Classify {
        /// The message to classify
        message: String,
    },

    /// Draft a description and category for a product
    Describe {
        /// Product name
        #[arg(short, long)]
        product: String,

        /// Price in naira
        #[arg(long)]
        price: f64,
    },

    /// Create or reset the default configuration
    Onboard,

    /// Show configuration status and health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat { store, name }) => cmd_chat(store, name).await?,
        Some(Commands::Ask {
            message,
            store,
            json,
        }) => cmd_ask(&message, store, json).await?,
        Some(Commands::Classify { message }) => cmd_classify(&message)?,
        Some(Commands::Describe { product, price }) => cmd_describe(&product, price).await?,
        Some(Commands::Onboard) => cmd_onboard()?,
        Some(Commands::Status) => cmd_status()?,
        None => cmd_chat(None, None).await?,
    }

    Ok(())
}

// ── Shared Setup ────────────────────────────────────────────────────

fn validate_config(config: &Config) -> Result<()> {
    if let Err(errors) = config.validate() {
        eprintln!("\n  \x1b[31m❌ Configuration errors:\x1b[0m");
        for e in &errors {
            eprintln!("     • {}", e);
        }
        eprintln!();
        anyhow::bail!("Fix the above {} error(s) in config.json", errors.len());
    }
    Ok(())
}

/// Build the text provider from the first usable entry in the config.
fn setup_provider(config: &Config) -> Result<(String, Arc<dyn LlmProvider>)> {
    let Some((name, entry)) = config.providers.find_active() else {
        anyhow::bail!(
            "No text-generation provider configured with a real API key. \
             Run `storebot onboard` first, then edit config.json"
        );
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.assistant.request_timeout_secs))
        .build()?;

    let provider = OpenAiProvider::new(
        name,
        &entry.api_key,
        entry.api_base.as_deref(),
        config.active_model(),
        client,
    );
    Ok((name.to_string(), Arc::new(provider)))
}

fn setup_store(config: &Config) -> FileStore {
    let limits = QueryLimits {
        low_stock_threshold: config.store.low_stock_threshold,
        best_sellers: config.store.best_sellers_limit,
        recent_customers: config.store.recent_customers_limit,
    };
    FileStore::new(config.store_data_dir(), limits)
}

/// Returns the provider name and the model it will actually call.
fn setup_assistant(config: &Config) -> Result<(String, String, Assistant)> {
    let (provider_name, provider) = setup_provider(config)?;
    let model = provider.default_model().to_string();
    let settings = GenerationSettings {
        model: None,
        max_tokens: config.assistant.max_tokens,
        temperature: config.assistant.temperature,
    };
    let assistant = Assistant::new(Arc::new(setup_store(config)), provider, settings);
    Ok((provider_name, model, assistant))
}

fn print_reply(reply: &AssistantMessage) {
    println!("  \x1b[32m{}\x1b[0m", reply.content.replace('\n', "\n  "));
    if let Some(chips) = &reply.quick_replies {
        let chips: Vec<String> = chips.iter().map(|c| format!("[{c}]")).collect();
        println!("  \x1b[2m{}\x1b[0m", chips.join(" "));
    }
    println!();
}

// ── Chat Command ────────────────────────────────────────────────────

async fn cmd_chat(store_override: Option<String>, name_override: Option<String>) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let store_id = store_override.unwrap_or_else(|| config.store.id.clone());
    let first_name = name_override.unwrap_or_else(|| config.user.first_name.clone());
    let (provider_name, model, assistant) = setup_assistant(&config)?;
    let new_store = !setup_store(&config).list_stores().contains(&store_id);
    let conversation = Conversation::with_greeting(Arc::new(assistant), &first_name, new_store);

    // Print header
    println!();
    println!("  🛒 storebot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Provider: {} | Model: {}", provider_name, model);
    println!(
        "  Store: {} | Data: {}",
        store_id,
        config.store_data_dir().display()
    );
    println!();
    println!("  Type /quit to exit, /clear to start over.");
    println!("  ─────────────────────────────────────");
    println!();
    for greeting in conversation.messages() {
        print_reply(&greeting);
    }

    // Interactive loop
    let stdin = io::stdin();
    loop {
        print!("  \x1b[36m>\x1b[0m ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" | "/q" => {
                println!("  Goodbye! 👋");
                break;
            }
            "/clear" => {
                conversation.clear();
                println!("  Conversation cleared.");
                continue;
            }
            "/status" => {
                cmd_status()?;
                continue;
            }
            _ => {}
        }

        println!();
        let Some(reply) = conversation.submit(input, &first_name, &store_id).await else {
            continue;
        };
        print_reply(&reply);

        if let Some(path) = reply.navigation_target() {
            tokio::time::sleep(NAVIGATION_DELAY).await;
            println!("  \x1b[33m→ Opening {path}\x1b[0m\n");
        }
    }

    tracing::debug!(messages = conversation.len(), "Chat session ended");
    Ok(())
}

// ── Ask Command ─────────────────────────────────────────────────────

async fn cmd_ask(message: &str, store_override: Option<String>, json: bool) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let store_id = store_override.unwrap_or_else(|| config.store.id.clone());
    let (_, _, assistant) = setup_assistant(&config)?;
    let reply = assistant
        .process(message, &config.user.first_name, &store_id)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!();
        print_reply(&reply);
        if let Some(path) = reply.navigation_target() {
            println!("  → Open {path}\n");
        }
    }
    Ok(())
}

// ── Classify Command ────────────────────────────────────────────────

fn cmd_classify(message: &str) -> Result<()> {
    let config = Config::load()?;
    let intent = IntentDetector::detect(message);
    let decision = AiRouter::route(message, &RouteContext::new(&config.user.first_name));

    let report = serde_json::json!({
        "intent": intent,
        "category": decision.category(),
        "handler": decision.handler(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ── Describe Command ────────────────────────────────────────────────

async fn cmd_describe(product: &str, price: f64) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let (_, provider) = setup_provider(&config)?;
    let settings = GenerationSettings {
        model: None,
        max_tokens: config.assistant.copy_max_tokens,
        temperature: config.assistant.temperature,
    };
    let copy = ProductCopywriter::new(provider, settings)
        .generate(product, price)
        .await;

    if copy.description.is_empty() && copy.category.is_empty() {
        eprintln!("  ⚠️ Could not generate copy for {product}. Try again later.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&copy)?);
    Ok(())
}

// ── Onboard Command ─────────────────────────────────────────────────

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!();
    println!("  ✅ Configuration created at:");
    println!("     {}", path.display());
    println!();
    println!("  Next steps:");
    println!("  1. Edit the config file and add your API key");
    println!("  2. Put your store data in <dataDir>/<store id>.json");
    println!("  3. Run `storebot chat` to start chatting");
    println!();
    Ok(())
}

// ── Status Command ──────────────────────────────────────────────────

fn cmd_status() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load()?;

    println!();
    println!("  🛒 storebot status");
    println!("  ─────────────────────────────────────");

    // Config file
    if config_path.exists() {
        println!("  Config:    {}", config_path.display());
    } else {
        println!("  Config:    ❌ Not found (run `storebot onboard`)");
        return Ok(());
    }

    // Provider
    match config.providers.find_active() {
        Some((name, _)) => println!("  Provider:  ✅ {} configured", name),
        None => println!("  Provider:  ❌ No provider configured"),
    }

    // Model
    println!("  Model:     {}", config.active_model());

    // Store data
    let store = setup_store(&config);
    let data_exists = store.dir().exists();
    println!(
        "  Data:      {} {}",
        store.dir().display(),
        if data_exists { "✅" } else { "⚠️  (not found)" }
    );

    let stores = store.list_stores();
    let active = if stores.iter().any(|s| s == &config.store.id) {
        "✅"
    } else {
        "❌ no data file"
    };
    println!("  Store:     {} {}", config.store.id, active);
    println!("  Stores:    {} available", stores.len());

    println!();
    Ok(())
}
