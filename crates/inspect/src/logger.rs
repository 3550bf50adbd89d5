use tracing_subscriber::EnvFilter;

// stdout carries the JSON output, logs go to stderr
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    std::panic::set_hook(Box::new(tracing_panic::panic_hook));
}
