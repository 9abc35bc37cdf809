//! vocab_drill Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error, debug};

use vocab_drill::{
    config::{Settings, StateBackend},
    utils::logging,
    database::{WordRepository, connection::{DatabaseConfig, create_pool, run_migrations}},
    services::GoogleTranslator,
    state::{ConversationMachine, MemoryPendingStore, PendingStore, RedisPendingStore},
    handlers::{BotCommand, handle_command, handle_message, handle_callback_query},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// How often expired in-memory pending translations are dropped
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", vocab_drill::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    run_migrations(&db_pool).await?;

    let words = Arc::new(WordRepository::new(db_pool));
    let translator = Arc::new(GoogleTranslator::new(settings.translator.clone())?);

    // Initialize pending translation storage
    let ttl = Duration::from_secs(settings.state.pending_ttl_seconds);
    let pending: Arc<dyn PendingStore> = match settings.state.backend {
        StateBackend::Memory => {
            info!("Using in-memory pending store");
            let store = Arc::new(MemoryPendingStore::new(ttl));
            spawn_purge_task(store.clone());
            store
        }
        StateBackend::Redis => {
            info!("Connecting to Redis...");
            let store = RedisPendingStore::new(settings.redis.clone(), ttl).await?;
            store.test_connection().await?;
            Arc::new(store)
        }
    };

    let machine = Arc::new(ConversationMachine::new(words, translator, pending));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(BotCommand::bot_commands()).await {
        warn!(error = %e, "Failed to register the command menu");
    }

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![machine])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("vocab_drill bot has been shut down.");

    Ok(())
}

fn spawn_purge_task(store: Arc<MemoryPendingStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                debug!(purged = purged, "Purged expired pending translations");
            }
        }
    });
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<BotCommand>()
                    .endpoint(handle_commands)
            )
            .branch(
                // Handle free text
                dptree::endpoint(handle_messages)
            )
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query()
                .endpoint(handle_callbacks)
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    machine: Arc<ConversationMachine>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, &machine).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    machine: Arc<ConversationMachine>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, &machine).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    machine: Arc<ConversationMachine>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, &machine).await {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
