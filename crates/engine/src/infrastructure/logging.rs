//! Tracing subscriber setup.

use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use super::config::DEFAULT_LOG_FILTER;

/// Installs the global fmt subscriber.
///
/// An unparsable filter falls back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(filter: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Loads `.env.local` then `.env` from the repository root.
///
/// Variables already set in the process environment win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        init_logging("not[a valid filter").expect("first install should succeed");
        assert!(init_logging(DEFAULT_LOG_FILTER).is_err());
    }
}
