// src/errors.rs
use crate::podcast::PodcastId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Backend returned status {status} for {url}")]
    BadStatus { status: u16, url: String },

    #[error("Failed to decode podcast list: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read fixture {path}: {source}")]
    FixtureUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Podcast not found: {0}")]
    PodcastNotFound(PodcastId),

    #[error("Invalid podcast id: {0:?}")]
    InvalidPodcastId(String),

    #[error("Missing route parameter: {0}")]
    MissingParam(&'static str),

    #[error("Failed to list podcasts: {0}")]
    Client(#[from] ClientError),
}

impl LoaderError {
    /// True for every failure that means "there is no such podcast to show",
    /// whether the id was well formed or not.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoaderError::PodcastNotFound(_) | LoaderError::InvalidPodcastId(_))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteTreeError {
    #[error("Duplicate path '{segment}' under '{parent}'")]
    DuplicateSegment { parent: String, segment: String },

    #[error("More than one index route under '{0}'")]
    DuplicateIndex(String),

    #[error("Empty parameter name in segment '{0}'")]
    EmptyParamName(String),
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NoMatch(String),

    #[error("Loader failed for {location}: {source}")]
    Loader {
        location: String,
        #[source]
        source: LoaderError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid api_base_url '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Mount point '#{0}' not found in document")]
    MountPointMissing(String),

    #[error("Mount point '#{0}' already has a mounted application")]
    AlreadyMounted(String),
}
