//! Reversible symbol-stream transforms.
//!
//! Every transform is a pure `(forward, inverse)` pair over one input
//! [`SymbolBlock`] producing one or more output blocks, with the inverse
//! reconstructing the original exactly. Empty inputs are legal no-ops.

use std::error::Error;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::block::{SymbolBlock, WordSize};

pub mod diff;
pub mod equality;
pub mod match_coding;
pub mod merge;
pub mod rle;

/// A transform choice together with its parameters, as configured for one
/// descriptor subsequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformConfig {
    /// Pass the input through unchanged as a single stream.
    None,
    /// Difference coding over a single stream.
    Diff,
    /// Equality coding into a flag stream and a raw-value stream.
    Equality,
    /// Run-length coding with a guard threshold.
    RunLength { guard: u64 },
    /// LZ77-style match coding over a sliding window.
    Match { window_size: u32 },
    /// Bit-plane split into one stream per chunk width, MSB chunk first.
    Merge { widths: Vec<u8> },
}

impl TransformConfig {
    /// Number of transformed output streams this configuration produces.
    #[must_use]
    pub fn num_streams(&self) -> usize {
        match self {
            TransformConfig::None | TransformConfig::Diff => 1,
            TransformConfig::Equality | TransformConfig::RunLength { .. } => 2,
            TransformConfig::Match { .. } => 3,
            TransformConfig::Merge { widths } => widths.len(),
        }
    }

    /// Word sizes of the transformed output streams, given the word size of
    /// the input subsequence.
    #[must_use]
    pub fn output_word_sizes(&self, input: WordSize) -> Vec<WordSize> {
        match self {
            TransformConfig::None | TransformConfig::Diff => vec![input],
            TransformConfig::Equality => vec![WordSize::W1, input],
            TransformConfig::RunLength { .. } => vec![input, WordSize::W4],
            TransformConfig::Match { .. } => vec![WordSize::W4, WordSize::W4, input],
            TransformConfig::Merge { widths } => widths
                .iter()
                .map(|&width| merge::stream_word_size(width))
                .collect(),
        }
    }

    /// Returns `true` if the transform keeps a 1:1 correspondence between
    /// input symbols and the symbols of its (single) output stream.
    #[must_use]
    pub fn is_one_to_one(&self) -> bool {
        matches!(self, TransformConfig::None | TransformConfig::Diff)
    }

    /// Static metadata describing this transform kind.
    #[must_use]
    pub fn descriptor(&self) -> &'static TransformDescriptor {
        let index = match self {
            TransformConfig::None => 0,
            TransformConfig::Diff => 1,
            TransformConfig::Equality => 2,
            TransformConfig::RunLength { .. } => 3,
            TransformConfig::Match { .. } => 4,
            TransformConfig::Merge { .. } => 5,
        };
        &TRANSFORM_DESCRIPTORS[index]
    }
}

/// Static description of one transform kind: its name, the names of its
/// parameters and the names of its output streams. Looked up through
/// [`TransformConfig::descriptor`], never mutated at runtime.
#[derive(Debug)]
pub struct TransformDescriptor {
    pub name: &'static str,
    pub param_names: &'static [&'static str],
    pub stream_names: &'static [&'static str],
}

lazy_static! {
    static ref TRANSFORM_DESCRIPTORS: Vec<TransformDescriptor> = vec![
        TransformDescriptor {
            name: "none",
            param_names: &[],
            stream_names: &["symbols"],
        },
        TransformDescriptor {
            name: "diff",
            param_names: &[],
            stream_names: &["deltas"],
        },
        TransformDescriptor {
            name: "equality",
            param_names: &[],
            stream_names: &["flags", "raw_symbols"],
        },
        TransformDescriptor {
            name: "run_length",
            param_names: &["guard"],
            stream_names: &["raw_symbols", "lengths"],
        },
        TransformDescriptor {
            name: "match",
            param_names: &["window_size"],
            stream_names: &["pointers", "lengths", "raw_symbols"],
        },
        TransformDescriptor {
            name: "merge",
            param_names: &["widths"],
            stream_names: &["chunks"],
        },
    ];
}

/// Error detected at a transform boundary during decoding.
#[derive(Debug)]
pub enum TransformError {
    /// The number of substreams handed to an inverse transform does not match
    /// the transform's output stream count.
    StreamCountMismatch(usize, usize),
    /// Merge substreams must all hold the same number of symbols.
    StreamLengthMismatch(usize, usize),
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::StreamCountMismatch(expected, actual) => write!(
                f,
                "Substream count mismatch (expected: {}, actual: {})",
                expected, actual
            ),
            TransformError::StreamLengthMismatch(expected, actual) => write!(
                f,
                "Substream length mismatch (expected: {}, actual: {})",
                expected, actual
            ),
        }
    }
}

impl Error for TransformError {}

/// Applies the configured forward transform, consuming the input block and
/// returning the transformed output streams in their canonical order.
#[must_use]
pub fn forward(config: &TransformConfig, input: SymbolBlock) -> Vec<SymbolBlock> {
    match config {
        TransformConfig::None => vec![input],
        TransformConfig::Diff => {
            let mut block = input;
            diff::encode(&mut block);
            vec![block]
        }
        TransformConfig::Equality => {
            let mut values = input;
            let mut flags = SymbolBlock::new(WordSize::W1);
            equality::encode(&mut values, &mut flags);
            vec![flags, values]
        }
        TransformConfig::RunLength { guard } => {
            let mut values = input;
            let mut lengths = SymbolBlock::new(WordSize::W4);
            rle::encode(&mut values, &mut lengths, *guard);
            vec![values, lengths]
        }
        TransformConfig::Match { window_size } => {
            let mut values = input;
            let mut pointers = SymbolBlock::new(WordSize::W4);
            let mut lengths = SymbolBlock::new(WordSize::W4);
            match_coding::encode(&mut values, &mut pointers, &mut lengths, *window_size);
            vec![pointers, lengths, values]
        }
        TransformConfig::Merge { widths } => merge::encode(&input, widths),
    }
}

/// Applies the inverse transform to the decoded substreams, reconstructing
/// the original subsequence block.
pub fn inverse(
    config: &TransformConfig,
    blocks: Vec<SymbolBlock>,
    input_word_size: WordSize,
) -> Result<SymbolBlock, TransformError> {
    let expected = config.num_streams();
    if blocks.len() != expected {
        return Err(TransformError::StreamCountMismatch(expected, blocks.len()));
    }

    let mut blocks = blocks;
    match config {
        TransformConfig::None => Ok(blocks.pop().expect("Checked above")),
        TransformConfig::Diff => {
            let mut block = blocks.pop().expect("Checked above");
            diff::decode(&mut block);
            Ok(block)
        }
        TransformConfig::Equality => {
            let mut values = blocks.pop().expect("Checked above");
            let flags = blocks.pop().expect("Checked above");
            equality::decode(&mut values, &flags);
            Ok(values)
        }
        TransformConfig::RunLength { guard } => {
            let lengths = blocks.pop().expect("Checked above");
            let mut values = blocks.pop().expect("Checked above");
            rle::decode(&mut values, &lengths, *guard);
            Ok(values)
        }
        TransformConfig::Match { .. } => {
            let mut values = blocks.pop().expect("Checked above");
            let lengths = blocks.pop().expect("Checked above");
            let pointers = blocks.pop().expect("Checked above");
            match_coding::decode(&mut values, &pointers, &lengths);
            Ok(values)
        }
        TransformConfig::Merge { widths } => {
            merge::decode(&blocks, widths, input_word_size)
        }
    }
}
