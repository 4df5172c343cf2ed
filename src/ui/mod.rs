//! Interactive chat loop.
//!
//! Reads prompts line by line, submits them through the session, and prints
//! assistant replies with the cosmetic reveal. Styling and layout are
//! deliberately plain; the loop only owns input handling, notices, and the
//! lifecycle of the reveal timer.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;

use crate::api::client::ProxyClient;
use crate::core::config::Config;
use crate::core::credential::{CredentialStore, KeyringCredentialStore};
use crate::core::session::{ChatSession, SubmitBlocked, SubmitOutcome};
use crate::ui::reveal::Reveal;

pub mod reveal;

pub async fn run_chat(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Arc::new(KeyringCredentialStore::new());

    println!("Mason — chat with a hosted code-generation model");
    println!("Type a prompt and press Enter; /quit exits.");
    if credentials.load()?.is_none() {
        println!();
        println!("No API token is stored yet. Run `mason auth` to add one.");
    }
    println!();

    let generator = Arc::new(ProxyClient::new(config.proxy_url()));
    let mut session = ChatSession::new(credentials, generator, config.request_timeout());

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        // Ctrl+C while a request is outstanding cancels that attempt instead
        // of killing the process.
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });
        let outcome = session.submit(&line, &cancel).await;
        watcher.abort();

        match outcome {
            SubmitOutcome::Ignored(SubmitBlocked::EmptyInput) => continue,
            SubmitOutcome::Ignored(SubmitBlocked::NoCredential) => {
                println!("No API token is configured. Run `mason auth` to add one.");
            }
            SubmitOutcome::Ignored(reason) => println!("Cannot send: {reason}"),
            SubmitOutcome::Failed(err) => {
                println!("Generation failed: {err}. Please try again.");
            }
            SubmitOutcome::Reply(message) => {
                print_reveal(&message.content, config.reveal_interval()).await?;
            }
        }
    }

    Ok(())
}

async fn print_reveal(text: &str, period: Duration) -> std::io::Result<()> {
    let mut reveal = Reveal::start(text, period);
    let mut stdout = std::io::stdout();
    while let Some(ch) = reveal.next_char().await {
        write!(stdout, "{ch}")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    writeln!(stdout)?;
    Ok(())
}
