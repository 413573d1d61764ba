use std::env;

/// Process configuration, loaded from environment variables once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Absent key disables the NewsAPI source; the other sources are keyless.
    pub newsapi_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            newsapi_key: env::var("NEWSAPI_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}
