use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Subject substring used to select resume messages in the inbox.
    pub subject_filter: String,
    /// Attachment extensions accepted from inbox messages.
    pub allowed_extensions: Vec<String>,
    pub max_inbox_messages: usize,
    /// Webhook that receives the top-ranked candidates. Unset disables
    /// notification dispatch.
    pub notification_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            subject_filter: std::env::var("SUBJECT_FILTER")
                .unwrap_or_else(|_| "resume".to_string()),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| ".pdf,.docx,.doc".to_string())
                .split(',')
                .map(|ext| ext.trim().to_string())
                .filter(|ext| !ext.is_empty())
                .collect(),
            max_inbox_messages: std::env::var("MAX_INBOX_MESSAGES")
                .unwrap_or_else(|_| "50".to_string())
                .parse::<usize>()
                .context("MAX_INBOX_MESSAGES must be a number")?,
            notification_url: optional_env("NOTIFICATION_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process environment is not mutated concurrently.
    #[test]
    fn test_from_env_pool_size_override_and_defaults() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/resumes");
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "4");

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.subject_filter, "resume");
        assert_eq!(
            config.allowed_extensions,
            vec![".pdf".to_string(), ".docx".to_string(), ".doc".to_string()]
        );

        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
    }
}
