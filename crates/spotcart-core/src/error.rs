use thiserror::Error;

/// Errors raised while opening a popup session.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The hotspot payload could not be entity-decoded or parsed as a product.
    #[error("hotspot payload could not be decoded: {reason}")]
    PayloadDecode { reason: String },

    /// The product carries no variants, so no selection can be seeded.
    #[error("product \"{title}\" has no variants")]
    NoVariants { title: String },
}

/// Errors raised while loading configuration or the cross-sell rules file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("rules validation failed: {0}")]
    Validation(String),
}
