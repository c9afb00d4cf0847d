//! Error types for client configuration.

/// Errors raised while constructing a client.
///
/// Configuration problems are fatal and are reported before any network
/// activity takes place.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key was supplied and the fallback environment variable is unset.
    #[error("Missing API key: pass one explicitly or set the {env_var} environment variable")]
    MissingApiKey {
        /// The environment variable that would have supplied the key.
        env_var: &'static str,
    },

    /// A configured endpoint URL could not be parsed.
    #[error("Invalid endpoint URL '{value}'")]
    InvalidEndpoint {
        /// The offending URL string.
        value: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}
