use std::env;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use numvault_bot::bot::messenger::{TelegramMembership, TelegramMessenger};
use numvault_bot::config::Config;
use numvault_bot::gate::MembershipGate;
use numvault_bot::ledger::CreditLedger;
use numvault_bot::lookup::client::HttpLookupClient;
use numvault_bot::lookup::orchestrator::LookupOrchestrator;
use numvault_bot::lookup::LookupApi;
use numvault_bot::messaging::Messenger;
use numvault_bot::model::AppState;
use numvault_bot::scenes::ConversationEngine;
use numvault_bot::store::accounts::AccountStore;
use numvault_bot::store::postgres::PgAccountStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Missing credentials are the only fatal condition; everything after
    // startup is recovered per update.
    let token = env::var("BOT_TOKEN").expect("Expected BOT_TOKEN in the environment.");
    let database_url = env::var("DATABASE_URL").expect("Expected DATABASE_URL in the environment.");
    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Error connecting to the database.");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Error running database migrations.");

    let bot = Bot::new(token);
    let me = bot.get_me().await.expect("Error fetching bot identity.");
    let bot_username = me.username().to_owned();

    let store: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(pool));
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));
    let provider = Arc::new(TelegramMembership::new(bot.clone()));
    let api: Arc<dyn LookupApi> = Arc::new(
        HttpLookupClient::new(config.lookup_api_url.clone())
            .expect("Error building the lookup client."),
    );

    let ledger = CreditLedger::new(store.clone());
    let gate = MembershipGate::new(config.clone(), provider, messenger.clone());
    let scenes = ConversationEngine::new(
        config.clone(),
        ledger.clone(),
        store.clone(),
        messenger.clone(),
    );
    let lookup = LookupOrchestrator::new(ledger.clone(), store.clone(), api, messenger.clone());

    let state = Arc::new(AppState {
        config,
        store,
        messenger,
        ledger,
        gate,
        scenes,
        lookup,
        bot_username,
    });

    info!(username = %state.bot_username, "bot connected and ready");
    numvault_bot::bot::run(bot, state).await;
}
