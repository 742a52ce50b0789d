use thiserror::Error;

#[derive(Debug, Error)]
pub enum HumanosError {
    #[error("routine not found: {0}")]
    RoutineNotFound(String),

    #[error("invalid status '{0}': expected not_started, in_progress or completed")]
    InvalidStatus(String),

    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid source url '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("catalog source returned no routines")]
    MissingRoutines,

    #[error("catalog source responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("developer mode is off: enable it with 'humanos settings developer on'")]
    DeveloperModeRequired,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, HumanosError>;
