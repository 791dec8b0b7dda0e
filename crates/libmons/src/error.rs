// SPDX-License-Identifier: MIT OR Apache-2.0

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mod catalog: {0}")]
    CatalogParse(String),

    #[error("failed to parse everest.yaml: {0}")]
    MetadataParse(String),

    #[error("failed to parse api response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("encountered everest.yaml with no Everest dependency: {0}")]
    MissingRuntimeDependency(String),

    #[error("refusing to write outside the mods directory: {0}")]
    UnsafeFileName(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

macro_rules! error_ctor {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(msg: impl Into<String>) -> Self {
                Self::$variant(msg.into())
            }
        )*
    };
}

impl Error {
    error_ctor!(
        catalog_parse => CatalogParse,
        metadata_parse => MetadataParse,
        download => DownloadFailed,
        invalid_version => InvalidVersion,
        config => Config,
        other => Other,
    );

    pub fn checksum(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ChecksumMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
