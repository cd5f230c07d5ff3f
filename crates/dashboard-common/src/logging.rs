use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_DIRECTIVE: &str = "warn";

/// Installs a stderr fmt subscriber filtered by the directive in `env_var`.
///
/// Stdout is left untouched so JSON output stays machine-readable. Calling
/// this twice is harmless; the second install is ignored.
pub fn init_tracing(env_var: &str) {
    let directive = resolve_directive(std::env::var(env_var).ok().as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_directive(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LOG_DIRECTIVE)
        .to_string()
}
