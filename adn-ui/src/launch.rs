//! Where the UI finds its Denoise Service

/// Service the UI talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceLaunch {
    /// Start adn-ds in this process on the configured service host and port
    Embedded,
    /// Use an already running service at this base URL
    External(String),
}

/// Resolve the service target.
///
/// An explicit URL (command line, `ADN_SERVICE_URL` or `[ui] service_url`)
/// always wins and disables embedding. Without one, `no_embedded` selects
/// `default_url`, the `[service]` host and port.
pub fn resolve_service(
    explicit_url: Option<String>,
    no_embedded: bool,
    default_url: String,
) -> ServiceLaunch {
    match explicit_url {
        Some(url) => ServiceLaunch::External(url),
        None if no_embedded => ServiceLaunch::External(default_url),
        None => ServiceLaunch::Embedded,
    }
}
