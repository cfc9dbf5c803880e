pub mod channel;
pub mod cli;
pub mod client;
pub mod host;
pub mod models;
pub mod render;
pub mod server;
pub mod widget;

use cli::{ Args, Command };
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    match &args.command {
        Command::Serve(serve) => {
            info!("Mode: serve");
            info!("Server Address: {}", serve.server_addr);
            info!("Static Directory: {}", serve.static_dir);
            info!("Answering Service: {}", serve.answer_url.as_deref().unwrap_or("(not configured)"));
            info!("Ask Rate Limit: {}/s", serve.ask_rate_per_second);
            info!("TLS Enabled: {}", serve.enable_tls);
        }
        Command::Chat(chat) => {
            info!("Mode: chat");
            info!("Widget Endpoint: {}", chat.endpoint);
            info!("Embedded: {}", chat.embedded);
            info!("Page Origin: {}", chat.page_origin);
        }
    }
    info!("-------------------------");

    match args.command {
        Command::Serve(serve) => {
            let server = Server::new(serve);
            server.run().await?;
        }
        Command::Chat(chat) => {
            cli::terminal::run(&chat).await?;
        }
    }

    Ok(())
}
