use countjoy::commands::Cli;
use countjoy::libs::daemon;
use countjoy::libs::messages::macros::is_debug_mode;
use countjoy::msg_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("countjoy=debug")))
            .with_target(false)
            .init();
    }

    let result = if std::env::args().any(|arg| arg == daemon::DAEMON_FLAG) {
        daemon::run_with_signal_handling().await
    } else {
        Cli::menu().await
    };

    if let Err(e) = result {
        let text = format!("{:#}", e);
        // errors built from messages already carry the marker
        if text.starts_with('❌') {
            eprintln!("{}", text);
        } else {
            msg_error!(text);
        }
        std::process::exit(1);
    }
}
