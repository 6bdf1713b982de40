use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr so stdout carries only the report.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` for our crates
/// with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,stock_pl_core=debug,stock_pl_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
