use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. With `to_stderr` the log lines stay off
/// stdout so JSON output can be piped.
pub fn init_cli_logger(verbose: bool, to_stderr: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("birthday_deals=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("birthday_deals=info"))
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}
