use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Overrides the built-in directives, e.g. `REPAIR_DESK_LOG=repair_desk=trace`.
pub const LOG_ENV_VAR: &str = "REPAIR_DESK_LOG";

/// `--verbose` also shows the HTTP exchange with the AI service.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "repair_desk=debug,reqwest=debug,hyper_util=info,warn"
    } else {
        "repair_desk=info,warn"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_cli_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    // 一般模式不顯示時間
    if verbose {
        tracing_subscriber::registry()
            .with(build_filter(verbose))
            .with(layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(build_filter(verbose))
            .with(layer.without_time())
            .init();
    }
}
