use anyhow::Result;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ringot::bot;
use ringot::requester::ServiceRequester;
use ringot::sender;
use ringot::user_store::{InMemoryUserStore, UserStore};

const WEBHOOK_ADDRESS: &str = "0.0.0.0:6900";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    info!("Starting {} Telegram bot", bot::BOT_NAME);

    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;
    let bot = Bot::new(bot_token);

    let requester = Arc::new(ServiceRequester::new()?);
    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());

    // Notification webhook runs next to the long-polling dispatcher
    let webhook = sender::notifications_router(bot.clone());
    tokio::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(WEBHOOK_ADDRESS).await {
            Ok(listener) => listener,
            Err(err) => {
                error!(address = WEBHOOK_ADDRESS, error = %err, "cannot bind webhook listener");
                return;
            }
        };
        info!(address = WEBHOOK_ADDRESS, "notification webhook listening");
        if let Err(err) = axum::serve(listener, webhook).await {
            error!(error = %err, "webhook server stopped");
        }
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let requester = Arc::clone(&requester);
            let users = Arc::clone(&users);
            move |bot: Bot, msg: Message| {
                let requester = Arc::clone(&requester);
                let users = Arc::clone(&users);
                async move { bot::message_handler(bot, msg, requester, users).await }
            }
        }))
        .branch(Update::filter_edited_message().endpoint({
            let requester = Arc::clone(&requester);
            move |bot: Bot, msg: Message| {
                let requester = Arc::clone(&requester);
                async move { bot::edited_message_handler(bot, msg, requester).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let requester = Arc::clone(&requester);
            let users = Arc::clone(&users);
            move |bot: Bot, q: CallbackQuery| {
                let requester = Arc::clone(&requester);
                let users = Arc::clone(&users);
                async move { bot::callback_handler(bot, q, requester, users).await }
            }
        }));

    info!("bot initialized correctly, starting dispatcher");

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
