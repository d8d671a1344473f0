use clap::{Parser, Subcommand};
use hookline::forward::{ForwardPolicy, Forwarder};
use hookline::webhook::{Dispatcher, WebhookEvent};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "Hookline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: HOOKLINE_CONFIG_PATH or ~/.hookline/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Send one chat event to the webhook (WEBHOOK_URL or the local default). Not gated by FORWARD_SELF.
    Send {
        /// Config file path (default: HOOKLINE_CONFIG_PATH or ~/.hookline/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Sender id
        #[arg(long)]
        sender: String,

        /// Message text (may be empty)
        #[arg(long, default_value = "")]
        content: String,

        /// Chat JID
        #[arg(long = "chat", value_name = "JID")]
        chat_jid: String,

        /// Message was sent by this account
        #[arg(long)]
        from_me: bool,

        /// Id of the quoted message
        #[arg(long, value_name = "ID", default_value = "")]
        quoted_id: String,

        /// Sender of the quoted message
        #[arg(long, default_value = "")]
        quoted_sender: String,

        /// Text of the quoted message
        #[arg(long, default_value = "")]
        quoted_content: String,
    },

    /// Read newline-delimited JSON events from stdin and forward them. Own messages are forwarded only with FORWARD_SELF=true.
    Forward {
        /// Config file path (default: HOOKLINE_CONFIG_PATH or ~/.hookline/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("hookline {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            config,
            sender,
            content,
            chat_jid,
            from_me,
            quoted_id,
            quoted_sender,
            quoted_content,
        }) => {
            let event = WebhookEvent::new(sender, content, chat_jid, from_me).with_quote(
                quoted_id,
                quoted_sender,
                quoted_content,
            );
            if let Err(e) = run_send(config, event).await {
                log::error!("send failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Forward { config }) => {
            if let Err(e) = run_forward(config).await {
                log::error!("forward failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(hookline::config::default_config_path);
    let dir = hookline::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

fn build_dispatcher(config_path: Option<std::path::PathBuf>) -> anyhow::Result<Dispatcher> {
    let (config, _) = hookline::config::load_config(config_path)?;
    Ok(Dispatcher::new(&config.webhook)?)
}

async fn run_send(
    config_path: Option<std::path::PathBuf>,
    event: WebhookEvent,
) -> anyhow::Result<()> {
    let dispatcher = build_dispatcher(config_path)?;
    dispatcher.dispatch(&event).await;
    Ok(())
}

async fn run_forward(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let dispatcher = Arc::new(build_dispatcher(config_path)?);
    let policy = ForwardPolicy::from_env();
    log::info!(
        "forwarding events from stdin (forward_self={})",
        policy.forward_self
    );
    let forwarder = Forwarder::new(dispatcher, policy);
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let dispatched = forwarder.forward_lines(reader).await?;
    log::debug!("forwarded {} events", dispatched);
    Ok(())
}
