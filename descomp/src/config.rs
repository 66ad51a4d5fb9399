//! Per-subsequence codec configuration.
//!
//! A [`SubsequenceConfig`] is supplied externally and treated as read-only
//! for the duration of one encode or decode call. Encoder and decoder must
//! be given identical configurations; the coded stream carries no
//! self-description.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::block::{SymbolBlock, WordSize};
use crate::cabac::binarization::Binarization;
use crate::transform::TransformConfig;

/// Error in a subsequence configuration, detected eagerly before any
/// data-dependent work.
#[derive(Debug)]
pub enum ConfigError {
    /// The input block's word size does not match the configuration.
    WordSizeMismatch(WordSize, WordSize),
    /// The number of stream configurations does not match the transform's
    /// output stream count.
    StreamCountMismatch(usize, usize),
    /// The run-length guard must be greater than zero.
    ZeroGuard,
    /// The run-length guard must fit the length stream's word size.
    GuardTooLarge(u64),
    /// Merge coding needs at least one chunk width.
    EmptyMergeWidths,
    /// Merge chunk widths must be between 1 and 32 bits.
    InvalidMergeWidth(u8),
    /// Merge chunk widths must sum to at most 64 bits.
    MergeWidthsTooWide(u32),
    /// Fixed-width binarization must use between 1 and 64 bits.
    InvalidBitCount(u8),
    /// Split-unit binarizations need a unit size between 1 and 32 bits.
    InvalidSplitSize(u8),
    /// Split-unit binarizations need an output size between 1 and 64 bits.
    InvalidOutputBits(u8),
    /// A dependency stream must hold exactly as many symbols as the
    /// subsequence.
    DependencyLengthMismatch(usize, usize),
    /// A dependency stream is only meaningful for transforms that keep a 1:1
    /// symbol correspondence.
    DependencyNotSupported(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::WordSizeMismatch(expected, actual) => write!(
                f,
                "Word size mismatch (configured: {}, block: {})",
                expected, actual
            ),
            ConfigError::StreamCountMismatch(expected, actual) => write!(
                f,
                "Stream config count mismatch (transform outputs: {}, configured: {})",
                expected, actual
            ),
            ConfigError::ZeroGuard => write!(f, "Run-length guard must be greater than zero"),
            ConfigError::GuardTooLarge(guard) => {
                write!(f, "Run-length guard too large: {}", guard)
            }
            ConfigError::EmptyMergeWidths => write!(f, "Merge coding needs chunk widths"),
            ConfigError::InvalidMergeWidth(width) => {
                write!(f, "Invalid merge chunk width: {}", width)
            }
            ConfigError::MergeWidthsTooWide(total) => {
                write!(f, "Merge chunk widths too wide: {} bits", total)
            }
            ConfigError::InvalidBitCount(bits) => {
                write!(f, "Invalid binarization bit count: {}", bits)
            }
            ConfigError::InvalidSplitSize(split) => {
                write!(f, "Invalid split unit size: {}", split)
            }
            ConfigError::InvalidOutputBits(bits) => {
                write!(f, "Invalid split output size: {}", bits)
            }
            ConfigError::DependencyLengthMismatch(expected, actual) => write!(
                f,
                "Dependency stream length mismatch (subsequence: {}, dependency: {})",
                expected, actual
            ),
            ConfigError::DependencyNotSupported(transform) => write!(
                f,
                "Dependency stream not supported with the `{}` transform",
                transform
            ),
        }
    }
}

impl Error for ConfigError {}

/// The result of validating a configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How many preceding conditioning symbols select the coding context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
pub enum CodingOrder {
    /// Contexts depend on the bin position only.
    #[display(fmt = "0")]
    Order0,
    /// Contexts additionally depend on the previous symbol.
    #[display(fmt = "1")]
    Order1,
    /// Contexts additionally depend on the two previous symbols.
    #[display(fmt = "2")]
    Order2,
}

impl CodingOrder {
    /// Number of context sets the order multiplies the per-bin contexts by.
    #[must_use]
    pub(crate) fn context_multiplier(&self) -> usize {
        match self {
            CodingOrder::Order0 => 1,
            CodingOrder::Order1 => 4,
            CodingOrder::Order2 => 16,
        }
    }
}

/// Entropy-coding configuration of one transformed substream.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub binarization: Binarization,
    pub coding_order: CodingOrder,
    pub bypass: bool,
}

impl StreamConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.binarization {
            Binarization::Binary { bits } => {
                if bits == 0 || bits > 64 {
                    return Err(ConfigError::InvalidBitCount(bits));
                }
            }
            Binarization::SplitUnitTruncatedUnary {
                split_size,
                output_bits,
            }
            | Binarization::SignedSplitUnitTruncatedUnary {
                split_size,
                output_bits,
            }
            | Binarization::DoubleTruncatedUnary {
                split_size,
                output_bits,
                ..
            }
            | Binarization::SignedDoubleTruncatedUnary {
                split_size,
                output_bits,
                ..
            } => {
                if split_size == 0 || split_size > 32 {
                    return Err(ConfigError::InvalidSplitSize(split_size));
                }
                if output_bits == 0 || output_bits > 64 {
                    return Err(ConfigError::InvalidOutputBits(output_bits));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Complete configuration of one descriptor subsequence: the transform, the
/// entropy coding of each transformed substream, the input word size and the
/// symbol-count encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsequenceConfig {
    pub word_size: WordSize,
    /// Token-type subsequences carry their symbol count as a 7-bit
    /// continuation varint instead of a fixed 4-byte field.
    pub token_type: bool,
    pub transform: TransformConfig,
    pub streams: Vec<StreamConfig>,
}

impl SubsequenceConfig {
    /// Validates the configuration itself.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.transform {
            TransformConfig::RunLength { guard } => {
                if *guard == 0 {
                    return Err(ConfigError::ZeroGuard);
                }
                if *guard > u32::MAX as u64 {
                    return Err(ConfigError::GuardTooLarge(*guard));
                }
            }
            TransformConfig::Merge { widths } => {
                if widths.is_empty() {
                    return Err(ConfigError::EmptyMergeWidths);
                }
                for &width in widths {
                    if width == 0 || width > 32 {
                        return Err(ConfigError::InvalidMergeWidth(width));
                    }
                }
                let total: u32 = widths.iter().map(|&width| width as u32).sum();
                if total > 64 {
                    return Err(ConfigError::MergeWidthsTooWide(total));
                }
            }
            _ => {}
        }

        let expected = self.transform.num_streams();
        if self.streams.len() != expected {
            return Err(ConfigError::StreamCountMismatch(
                expected,
                self.streams.len(),
            ));
        }
        for stream in &self.streams {
            stream.validate()?;
        }

        Ok(())
    }

    /// Validates the configuration against an input block and an optional
    /// dependency stream.
    pub fn validate_input(
        &self,
        input: &SymbolBlock,
        dependency: Option<&SymbolBlock>,
    ) -> ConfigResult<()> {
        self.validate()?;

        if input.word_size() != self.word_size {
            return Err(ConfigError::WordSizeMismatch(
                self.word_size,
                input.word_size(),
            ));
        }
        self.validate_dependency(input.len(), dependency)
    }

    /// Validates an optional dependency stream against the subsequence's
    /// symbol count.
    pub fn validate_dependency(
        &self,
        symbol_count: usize,
        dependency: Option<&SymbolBlock>,
    ) -> ConfigResult<()> {
        if let Some(dependency) = dependency {
            if !self.transform.is_one_to_one() {
                return Err(ConfigError::DependencyNotSupported(
                    self.transform.descriptor().name,
                ));
            }
            if dependency.len() != symbol_count {
                return Err(ConfigError::DependencyLengthMismatch(
                    symbol_count,
                    dependency.len(),
                ));
            }
        }
        Ok(())
    }

    /// Pass-through configuration coding fixed-width symbols in bypass mode.
    #[must_use]
    pub fn bypass(word_size: WordSize) -> Self {
        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::None,
            streams: vec![StreamConfig {
                binarization: Binarization::Binary {
                    bits: word_size.bits() as u8,
                },
                coding_order: CodingOrder::Order0,
                bypass: true,
            }],
        }
    }

    /// Pass-through configuration with context-adaptive fixed-width coding.
    #[must_use]
    pub fn adaptive(word_size: WordSize, coding_order: CodingOrder) -> Self {
        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::None,
            streams: vec![StreamConfig {
                binarization: Binarization::Binary {
                    bits: word_size.bits() as u8,
                },
                coding_order,
                bypass: false,
            }],
        }
    }

    /// Difference coding followed by context-adaptive fixed-width coding.
    #[must_use]
    pub fn diff(word_size: WordSize, coding_order: CodingOrder) -> Self {
        Self {
            transform: TransformConfig::Diff,
            ..Self::adaptive(word_size, coding_order)
        }
    }

    /// Equality coding with adaptive flags and fixed-width raw values.
    #[must_use]
    pub fn equality(word_size: WordSize) -> Self {
        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::Equality,
            streams: vec![
                StreamConfig {
                    binarization: Binarization::Binary { bits: 1 },
                    coding_order: CodingOrder::Order1,
                    bypass: false,
                },
                StreamConfig {
                    binarization: Binarization::Binary {
                        bits: word_size.bits() as u8,
                    },
                    coding_order: CodingOrder::Order0,
                    bypass: false,
                },
            ],
        }
    }

    /// Run-length coding with truncated-unary length tokens.
    #[must_use]
    pub fn run_length(word_size: WordSize, guard: u64) -> Self {
        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::RunLength { guard },
            streams: vec![
                StreamConfig {
                    binarization: Binarization::Binary {
                        bits: word_size.bits() as u8,
                    },
                    coding_order: CodingOrder::Order1,
                    bypass: false,
                },
                StreamConfig {
                    binarization: Binarization::TruncatedUnary { cmax: guard },
                    coding_order: CodingOrder::Order1,
                    bypass: false,
                },
            ],
        }
    }

    /// Match coding with exponential-Golomb pointers and lengths.
    #[must_use]
    pub fn match_coding(word_size: WordSize, window_size: u32) -> Self {
        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::Match { window_size },
            streams: vec![
                StreamConfig {
                    binarization: Binarization::ExponentialGolomb,
                    coding_order: CodingOrder::Order0,
                    bypass: false,
                },
                StreamConfig {
                    binarization: Binarization::ExponentialGolomb,
                    coding_order: CodingOrder::Order1,
                    bypass: false,
                },
                StreamConfig {
                    binarization: Binarization::Binary {
                        bits: word_size.bits() as u8,
                    },
                    coding_order: CodingOrder::Order0,
                    bypass: false,
                },
            ],
        }
    }

    /// Merge coding splitting each symbol into two equal bit planes.
    #[must_use]
    pub fn merge(word_size: WordSize) -> Self {
        let half = (word_size.bits() / 2).max(1) as u8;
        let widths = vec![half, half];
        let streams = widths
            .iter()
            .map(|&width| StreamConfig {
                binarization: Binarization::Binary { bits: width + 1 },
                coding_order: CodingOrder::Order1,
                bypass: false,
            })
            .collect();

        Self {
            word_size,
            token_type: false,
            transform: TransformConfig::Merge { widths },
            streams,
        }
    }
}
