//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::auth::{interactive_auth, interactive_deauth};
use crate::core::config::Config;
use crate::core::credential::KeyringCredentialStore;
use crate::logging;
use crate::proxy;
use crate::ui::run_chat;

#[derive(Parser)]
#[command(name = "mason")]
#[command(about = "A terminal chat front end for a hosted code-generation model")]
#[command(
    long_about = "Mason is a small chat front end for a hosted code-generation model. \
It ships two surfaces: an interactive terminal chat loop and a local proxy that \
forwards generation requests to the model endpoint with your API token.\n\n\
Authentication:\n\
  Use 'mason auth' to store your API token in the system keyring.\n\
  The token is only sent to the model endpoint, never validated locally.\n\n\
Typical use:\n\
  mason serve        Run the generate proxy (defaults to port 3000)\n\
  mason              Chat through the proxy\n\
  /quit              Leave the chat loop\n\
  Ctrl+C             Cancel an in-flight request"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat {
        /// Base URL of the generate proxy
        #[arg(short = 'x', long, value_name = "URL")]
        proxy: Option<String>,
    },
    /// Run the generate proxy
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Store an API token in the system keyring
    Auth,
    /// Remove the stored API token
    Deauth,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let args = Args::parse();
    let mut config = Config::load()?;

    match args.command.unwrap_or(Commands::Chat { proxy: None }) {
        Commands::Chat { proxy } => {
            if proxy.is_some() {
                config.proxy_url = proxy;
            }
            run_chat(&config).await
        }
        Commands::Serve { port } => proxy::run(port.unwrap_or_else(|| config.listen_port())).await,
        Commands::Auth => {
            let store = KeyringCredentialStore::new();
            if let Err(e) = interactive_auth(&store) {
                eprintln!("Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            let store = KeyringCredentialStore::new();
            if let Err(e) = interactive_deauth(&store) {
                eprintln!("Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
