use level_core::{EditorError, ErrorSeverity};

/// Failures reported by selection operations.
///
/// Every variant leaves the session untouched: the selection, the overlay
/// and the grid are exactly as they were before the call.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("magic wand region exceeds {limit} cells")]
    FloodFillTooLarge { limit: usize },

    #[error("nothing is selected")]
    NoSelection,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl EditorError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FloodFillTooLarge { .. } => ErrorSeverity::Recoverable,
            Self::NoSelection => ErrorSeverity::Validation,
            Self::Codec(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::FloodFillTooLarge { .. } => "SELECTION_FLOOD_FILL_TOO_LARGE",
            Self::NoSelection => "SELECTION_NONE",
            Self::Codec(error) => error.error_code(),
        }
    }
}

/// Failures encoding or decoding clipboard payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode clipboard payload: {0}")]
    Encode(#[source] bincode::Error),

    #[error("clipboard data is not a geometry payload: {0}")]
    Decode(#[source] bincode::Error),

    #[error("unsupported clipboard version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("clipboard references unknown tile '{0}'")]
    UnknownTileName(String),

    #[error("tile id {0} is not in the tile database")]
    UnknownTileId(u32),

    #[error("clipboard holds {found} cells, expected {expected} for {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },

    #[error("clipboard references layer {0}")]
    InvalidLayer(u8),
}

impl EditorError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encode(_) | Self::UnknownTileId(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "CODEC_ENCODE",
            Self::Decode(_) => "CODEC_DECODE",
            Self::UnsupportedVersion { .. } => "CODEC_UNSUPPORTED_VERSION",
            Self::UnknownTileName(_) => "CODEC_UNKNOWN_TILE_NAME",
            Self::UnknownTileId(_) => "CODEC_UNKNOWN_TILE_ID",
            Self::DimensionMismatch { .. } => "CODEC_DIMENSION_MISMATCH",
            Self::InvalidLayer(_) => "CODEC_INVALID_LAYER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_errors_keep_their_code_through_selection_error() {
        let error = SelectionError::from(CodecError::UnknownTileName("pipe".into()));
        assert_eq!(error.error_code(), "CODEC_UNKNOWN_TILE_NAME");
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.to_string(), "clipboard references unknown tile 'pipe'");
    }

    #[test]
    fn oversized_wand_is_recoverable() {
        let error = SelectionError::FloodFillTooLarge { limit: 100_000 };
        assert!(error.severity().is_recoverable());
    }
}
