use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid base URL for {service}: {url}")]
    InvalidBaseUrl {
        service: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
