#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use delve_core::GenerationConfig;

const SHARE_DOMAIN: &str = "delve";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded configuration payload.
pub(crate) const SHARE_HEADER: &str = "delve:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Seed and generation knobs captured as a single-line string.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ShareCode {
    /// Configuration reproducing the shared dungeon, seed included.
    pub config: GenerationConfig,
}

impl ShareCode {
    /// Captures a configuration whose seed has already been resolved.
    pub(crate) fn new(config: GenerationConfig) -> Result<Self, ShareCodeError> {
        if config.seed.is_none() {
            return Err(ShareCodeError::MissingSeed);
        }
        Ok(Self { config })
    }

    /// Encodes the configuration into a string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, ShareCodeError> {
        let json = serde_json::to_vec(&self.config).map_err(ShareCodeError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SHARE_HEADER}:{}x{}:{encoded}",
            self.config.width, self.config.height
        ))
    }

    /// Decodes a share code from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ShareCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ShareCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ShareCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(ShareCodeError::MissingVersion)?;
        let dimensions = parts.next().ok_or(ShareCodeError::MissingDimensions)?;
        let payload = parts.next().ok_or(ShareCodeError::MissingPayload)?;

        if domain != SHARE_DOMAIN {
            return Err(ShareCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != SHARE_VERSION {
            return Err(ShareCodeError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ShareCodeError::InvalidEncoding)?;
        let config: GenerationConfig =
            serde_json::from_slice(&bytes).map_err(ShareCodeError::InvalidPayload)?;

        if config.width != width || config.height != height {
            return Err(ShareCodeError::DimensionMismatch {
                header: (width, height),
                payload: (config.width, config.height),
            });
        }

        Self::new(config)
    }
}

/// Errors that can occur while producing or decoding share codes.
#[derive(Debug)]
pub(crate) enum ShareCodeError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the share code.
    MissingPrefix,
    /// The share code did not contain a version segment.
    MissingVersion,
    /// The share code did not include grid dimensions.
    MissingDimensions,
    /// The share code did not include the payload segment.
    MissingPayload,
    /// The share code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The share code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the share code.
    InvalidDimensions(String),
    /// The header dimensions disagree with the configuration payload.
    DimensionMismatch {
        /// Dimensions written in the header.
        header: (u32, u32),
        /// Dimensions stored in the payload.
        payload: (u32, u32),
    },
    /// The configuration carries no seed, so it cannot reproduce a dungeon.
    MissingSeed,
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ShareCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingDimensions => write!(f, "share code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "share code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { header, payload } => write!(
                f,
                "share header says {}x{} but the payload describes {}x{}",
                header.0, header.1, payload.0, payload.1
            ),
            Self::MissingSeed => write!(f, "configuration has no seed to share"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode share payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process share payload: {error}")
            }
        }
    }
}

impl Error for ShareCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), ShareCodeError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;

    if width == 0 || height == 0 {
        return Err(ShareCodeError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((width, height))
}
