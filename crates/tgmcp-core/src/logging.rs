/// Initialize tracing for the server.
///
/// Output goes to stderr: stdout belongs to the JSON-RPC stream and must
/// never receive log lines.
pub fn init(service_name: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates, warn for everything else.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,tgmcp=info,tgmcp_core=info,tgmcp_telegram=info,tgmcp_server=info,{}=info",
            service_name.replace('-', "_")
        ))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
