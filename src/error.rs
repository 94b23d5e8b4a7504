use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LandError {
    #[error("failed to read land data {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("land data parse error: {0}")]
    Parse(#[from] geojson::Error),

    #[error("land data has no polygon features")]
    Empty,
}
