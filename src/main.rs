use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use unixrpc::core::{init_observability, shutdown_observability, ObservabilityConfig};
use unixrpc::{ClientBuilder, UnixRpcServer};

/// Request/response RPC over a Unix domain socket
#[derive(Parser, Debug)]
#[command(name = "unixrpc", version, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Serve the built-in methods until interrupted
    Server(ServerArgs),
    /// Send requests read from JSON files, one per prompt
    Client(ClientArgs),
}

#[derive(Args, Debug)]
struct ServerArgs {
    /// Socket path to listen on
    #[arg(long, env = "UNIXRPC_SOCKET", default_value = "/tmp/socket_file")]
    socket: PathBuf,
    /// Largest message a single read accepts, in bytes
    #[arg(long, default_value_t = unixrpc::core::DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,
    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Socket path to connect to
    #[arg(long, env = "UNIXRPC_SOCKET", default_value = "/tmp/socket_file")]
    socket: PathBuf,
    /// Directory holding the request files
    #[arg(long, env = "UNIXRPC_BASE_DIR", default_value = "json")]
    base_dir: PathBuf,
    /// Seconds to wait for each response
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = match Cli::try_parse() {
        Ok(Cli { mode: Some(mode) }) => mode,
        Ok(Cli { mode: None }) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            // Help, version and unknown modes all exit cleanly.
            let _ = e.print();
            return Ok(());
        }
    };

    match mode {
        Mode::Server(args) => run_server(args).await,
        Mode::Client(args) => run_client(args).await,
    }
}

fn print_usage() {
    println!("{}", Cli::command().render_usage());
}

async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    let config = ObservabilityConfig::new("unixrpc-server").with_json(args.json_logs);

    let server = UnixRpcServer::builder()
        .bind(&args.socket)
        .max_message_size(args.max_message_size)
        .with_observability(config)
        .build()
        .await
        .with_context(|| format!("failed to start server on {}", args.socket.display()))?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for interrupt signal");
            }
        })
        .await?;

    server.close()?;
    tracing::info!("Server stopped");
    shutdown_observability();
    Ok(())
}

async fn run_client(args: ClientArgs) -> anyhow::Result<()> {
    // Log lines share stdout with the prompt.
    init_observability(ObservabilityConfig::new("unixrpc-client").with_log_level("warn"))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    println!("Connecting to {}", args.socket.display());
    let mut client = ClientBuilder::new(&args.socket)
        .timeout(Duration::from_secs(args.timeout_secs))
        .connect()
        .await
        .context("Error connecting to server")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = unixrpc::repl::run(&mut client, &args.base_dir, stdin, std::io::stdout()).await;

    shutdown_observability();
    result
}
