use clap::{Parser, Subcommand};
use std::sync::Arc;

use onboard_bot::application::commands::CommandTable;
use onboard_bot::application::dispatcher::Dispatcher;
use onboard_bot::application::onboarding::Onboarder;
use onboard_bot::application::registry::AdminRegistry;
use onboard_bot::application::router::{Router, RoutingPolicy};
use onboard_bot::domain::traits::Gateway;
use onboard_bot::infrastructure::adapters::console::ConsoleIntake;
use onboard_bot::infrastructure::adapters::slack::SlackGateway;
use onboard_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "onboard-bot")]
#[command(about = "Channel onboarding and FAQ auto-reply bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token).await;
        }
        Commands::Version => {
            println!("onboard-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

async fn run_bot(config_path: String, token_override: Option<String>) {
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{}; using defaults", err);
            Config::default()
        }
    };
    config.apply_env();
    if let Some(token) = token_override {
        config.slack.token = Some(token);
    }

    let token = match config.token() {
        Ok(token) => token.to_string(),
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    };

    let gateway = Arc::new(SlackGateway::new(token));
    // Fail fast if the platform is unreachable or the token is bad
    if let Err(err) = gateway.probe().await {
        tracing::error!("platform connectivity check failed: {}", err);
        std::process::exit(1);
    }

    let registry = Arc::new(
        AdminRegistry::initialize(
            gateway.as_ref(),
            &config.admin_groups(),
            config.admin_users(),
        )
        .await,
    );

    let faq_url = config.onboarding.faq_url.clone();
    let onboarder = Arc::new(Onboarder::new(gateway.clone(), &faq_url));
    let policy = RoutingPolicy {
        channels: config.channels(),
        triggers: config.trigger_words(),
        ignored_users: config.ignored_users(),
        admins_bypass_triggers: config.onboarding.admins_bypass_triggers,
    };
    let router = Router::new(
        gateway.clone(),
        registry.clone(),
        onboarder.clone(),
        CommandTable::build(&faq_url),
        policy,
    );
    let dispatcher = Dispatcher::new(
        router,
        onboarder,
        registry,
        config.channels(),
        config.onboarding.filter_joins,
    );

    tracing::info!(
        "onboard-bot running: {} channel(s), {} trigger word(s)",
        config.channels().len(),
        config.trigger_words().len()
    );

    if let Err(err) = ConsoleIntake::run(&dispatcher).await {
        tracing::error!("intake failed: {}", err);
        std::process::exit(1);
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            if let Err(err) = std::fs::write("config.yaml", yaml) {
                tracing::error!("failed to write config.yaml: {}", err);
                std::process::exit(1);
            }
            println!("wrote config.yaml");
        }
        Err(err) => {
            tracing::error!("failed to serialize default config: {}", err);
            std::process::exit(1);
        }
    }
}
