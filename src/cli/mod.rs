pub mod terminal;

use clap::{ Args as ClapArgs, Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false", global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Host the widget assets and relay /ask to the answering service.
    Serve(ServeArgs),
    /// Run the conversation widget in this terminal.
    Chat(ChatArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Directory served under /static (embed.js, widget.html, widget.js).
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: String,

    /// Base URL of the upstream answering service (its /ask route is called).
    #[arg(long, env = "ANSWER_URL")]
    pub answer_url: Option<String>,

    /// Global number of /ask requests accepted per second.
    #[arg(long, env = "ASK_RATE_PER_SECOND", default_value = "10")]
    pub ask_rate_per_second: u32,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL serving POST /ask.
    #[arg(long, env = "WIDGET_ENDPOINT", default_value = "http://127.0.0.1:8000")]
    pub endpoint: String,

    /// Run inside an in-process host page instead of standalone.
    #[arg(long, default_value = "false")]
    pub embedded: bool,

    /// Source URL of the bootstrap script, used to resolve the frame origin.
    #[arg(long, env = "WIDGET_SCRIPT_SRC")]
    pub script_src: Option<String>,

    /// Origin of the embedding page; fallback for the frame origin.
    #[arg(long, env = "WIDGET_PAGE_ORIGIN", default_value = "http://localhost")]
    pub page_origin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_defaults() {
        let args = Args::try_parse_from(["superion-widget", "serve"]).unwrap();
        match args.command {
            Command::Serve(serve) => {
                assert_eq!(serve.server_addr, "127.0.0.1:8000");
                assert_eq!(serve.static_dir, "static");
                assert_eq!(serve.ask_rate_per_second, 10);
                assert!(!serve.enable_tls);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_embedded_chat() {
        let args = Args::try_parse_from([
            "superion-widget",
            "chat",
            "--embedded",
            "--endpoint",
            "http://bot.example.com",
            "--script-src",
            "http://bot.example.com/static/embed.js",
        ]).unwrap();
        match args.command {
            Command::Chat(chat) => {
                assert!(chat.embedded);
                assert_eq!(chat.endpoint, "http://bot.example.com");
                assert_eq!(chat.script_src.as_deref(), Some("http://bot.example.com/static/embed.js"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
