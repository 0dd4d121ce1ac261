use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, Level};

use chatbank_bot::backend::io::CommandContext;
use chatbank_bot::backend::{create_router, initialize_backend};

/// Console host: a stand-in for a chat-framework adapter. Reads one command
/// per line as a single local operator with admin rights and prints the
/// replies the bot would send back to the channel.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir = std::env::var("CHATBANK_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/economy"));
    info!("Using data directory {}", data_dir.display());

    let state = initialize_backend(&data_dir).await?;
    let router = create_router(state);

    let ctx = CommandContext {
        user_id: "console".to_string(),
        user_name: "Console".to_string(),
        is_admin: true,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"chatbank console. Commands: bank register | bank balance [user] | bank transfer <user> <amount> | bank set <user> <amount> | payday | payouts | slot <bid> | economyset [...]. Ctrl-D quits.\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            let reply = router.handle(&ctx, line).await;
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
