//! Descriptor-subsequence encode/decode drivers.
//!
//! [`encode_subsequence`] runs the configured transform, entropy-codes every
//! transformed substream and writes the length-prefixed framing;
//! [`decode_subsequence`] is its exact mirror. Per-subsequence state (blocks,
//! context models) is private to one call, so independent subsequences can
//! be coded concurrently without shared state.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use itertools::izip;
use log::{debug, trace};

use crate::block::{SymbolBlock, WordSize};
use crate::cabac::reader::Reader;
use crate::cabac::writer::Writer;
use crate::config::{ConfigError, StreamConfig, SubsequenceConfig};
use crate::stream_handler;
use crate::transform;
use crate::transform::TransformError;

/// Error occurring while encoding or decoding one descriptor subsequence.
/// All errors abort the current subsequence; no partial output is produced.
#[derive(Debug)]
pub enum CodecError {
    /// Invalid configuration for the supplied data.
    Config(ConfigError),
    /// I/O error on the framed byte stream.
    IoError(std::io::Error),
    /// Data-integrity error at a transform boundary.
    Transform(TransformError),
    /// A declared substream size is inconsistent with the frame.
    InvalidSubstreamSize(u64),
    /// The reconstructed stream does not match the declared symbol count.
    SymbolCountMismatch(u64, u64),
    /// Payload bytes present where the frame declares none.
    UnexpectedPayload(usize),
    /// The symbol count does not fit the fixed-width count field.
    SubsequenceTooLong(usize),
}

impl From<ConfigError> for CodecError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<TransformError> for CodecError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Config(e) => write!(f, "Configuration error: {}", e),
            CodecError::IoError(e) => write!(f, "IO error: {}", e),
            CodecError::Transform(e) => write!(f, "Transform error: {}", e),
            CodecError::InvalidSubstreamSize(size) => {
                write!(f, "Invalid substream size: {}", size)
            }
            CodecError::SymbolCountMismatch(expected, actual) => write!(
                f,
                "Symbol count mismatch (declared: {}, reconstructed: {})",
                expected, actual
            ),
            CodecError::UnexpectedPayload(len) => {
                write!(f, "Unexpected payload of {} bytes", len)
            }
            CodecError::SubsequenceTooLong(len) => {
                write!(f, "Subsequence too long: {} symbols", len)
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CodecError::Config(e) => Some(e),
            CodecError::IoError(e) => Some(e),
            CodecError::Transform(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a subsequence codec operation.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encodes one descriptor subsequence into `sink`, returning the number of
/// bytes written. The input block is consumed; the optional dependency
/// stream conditions context selection for 1:1 transforms.
pub fn encode_subsequence<W: Write>(
    input: SymbolBlock,
    dependency: Option<&SymbolBlock>,
    config: &SubsequenceConfig,
    sink: &mut W,
) -> CodecResult<usize> {
    config.validate_input(&input, dependency)?;

    let num_symbols = input.len();
    if !config.token_type && num_symbols > u32::MAX as usize {
        return Err(CodecError::SubsequenceTooLong(num_symbols));
    }
    debug!(
        "Encoding subsequence: {} symbols at word size {}, transform `{}`",
        num_symbols,
        config.word_size,
        config.transform.descriptor().name
    );

    let count_len = if config.token_type {
        stream_handler::u7_len(num_symbols as u64)
    } else {
        4
    };
    if num_symbols == 0 {
        stream_handler::write_u32(sink, count_len as u32)?;
        write_count(sink, config.token_type, 0)?;
        return Ok(4 + count_len);
    }

    let streams = transform::forward(&config.transform, input);
    let num_streams = streams.len();
    let payloads: Vec<Vec<u8>> = izip!(&streams, &config.streams)
        .enumerate()
        .map(|(index, (block, stream_config))| {
            let stream_dependency = if index == 0 { dependency } else { None };
            encode_stream(block, stream_config, stream_dependency)
        })
        .collect();

    let mut total = count_len;
    for (index, payload) in payloads.iter().enumerate() {
        if index < num_streams - 1 {
            total += 4;
        }
        if num_streams > 1 {
            total += 4;
        }
        total += payload.len();
    }

    stream_handler::write_u32(sink, total as u32)?;
    write_count(sink, config.token_type, num_symbols as u64)?;
    for (index, (block, payload)) in izip!(&streams, &payloads).enumerate() {
        if index < num_streams - 1 {
            stream_handler::write_u32(sink, (payload.len() + 4) as u32)?;
        }
        if num_streams > 1 {
            stream_handler::write_u32(sink, block.len() as u32)?;
        }
        sink.write_all(payload)?;
        trace!(
            "Substream {}: {} symbols, {} payload bytes",
            index,
            block.len(),
            payload.len()
        );
    }

    Ok(4 + total)
}

/// Decodes one descriptor subsequence from `source`, returning the
/// reconstructed symbol block. The configuration (and dependency stream, if
/// any) must match the one used for encoding.
pub fn decode_subsequence<R: Read>(
    source: &mut R,
    dependency: Option<&SymbolBlock>,
    config: &SubsequenceConfig,
) -> CodecResult<SymbolBlock> {
    config.validate()?;

    let total = stream_handler::read_u32(source)? as u64;
    let (num_symbols, count_len) = read_count(source, config.token_type)?;
    let mut remaining = total
        .checked_sub(count_len as u64)
        .ok_or(CodecError::InvalidSubstreamSize(total))?;
    config.validate_dependency(num_symbols as usize, dependency)?;

    debug!(
        "Decoding subsequence: {} symbols at word size {}, transform `{}`",
        num_symbols,
        config.word_size,
        config.transform.descriptor().name
    );
    if num_symbols == 0 {
        if remaining != 0 {
            return Err(CodecError::UnexpectedPayload(remaining as usize));
        }
        return Ok(SymbolBlock::new(config.word_size));
    }

    let num_streams = config.transform.num_streams();
    let word_sizes = config.transform.output_word_sizes(config.word_size);
    let mut blocks = Vec::with_capacity(num_streams);
    for (index, (stream_config, word_size)) in
        izip!(&config.streams, &word_sizes).enumerate()
    {
        let (payload_len, count) = if index < num_streams - 1 {
            let size = stream_handler::read_u32(source)? as u64;
            remaining = remaining
                .checked_sub(4 + size)
                .ok_or(CodecError::InvalidSubstreamSize(size))?;
            let count = stream_handler::read_u32(source)?;
            let payload_len = size
                .checked_sub(4)
                .ok_or(CodecError::InvalidSubstreamSize(size))?;
            (payload_len, count as u64)
        } else if num_streams > 1 {
            let size = remaining;
            remaining = 0;
            let count = stream_handler::read_u32(source)?;
            let payload_len = size
                .checked_sub(4)
                .ok_or(CodecError::InvalidSubstreamSize(size))?;
            (payload_len, count as u64)
        } else {
            let size = remaining;
            remaining = 0;
            (size, num_symbols)
        };

        let payload = stream_handler::read_bytes(source, payload_len as usize)?;
        let stream_dependency = if index == 0 { dependency } else { None };
        trace!("Substream {}: {} symbols, {} payload bytes", index, count, payload.len());
        blocks.push(decode_stream(
            &payload,
            count as usize,
            stream_config,
            *word_size,
            stream_dependency,
        )?);
    }

    let output = transform::inverse(&config.transform, blocks, config.word_size)?;
    if output.len() as u64 != num_symbols {
        return Err(CodecError::SymbolCountMismatch(
            num_symbols,
            output.len() as u64,
        ));
    }
    Ok(output)
}

fn write_count<W: Write>(sink: &mut W, token_type: bool, count: u64) -> CodecResult<()> {
    if token_type {
        stream_handler::write_u7(sink, count)?;
    } else {
        stream_handler::write_u32(sink, count as u32)?;
    }
    Ok(())
}

fn read_count<R: Read>(source: &mut R, token_type: bool) -> CodecResult<(u64, usize)> {
    if token_type {
        Ok(stream_handler::read_u7(source)?)
    } else {
        Ok((stream_handler::read_u32(source)? as u64, 4))
    }
}

fn encode_stream(
    block: &SymbolBlock,
    config: &StreamConfig,
    dependency: Option<&SymbolBlock>,
) -> Vec<u8> {
    if block.is_empty() {
        return Vec::new();
    }

    let mut writer = Writer::new(config, block.word_size());
    match dependency {
        Some(dependency) => {
            for (index, symbol) in block.cursor().enumerate() {
                writer.write_with_dependency(symbol, dependency.get(index));
            }
        }
        None => {
            for symbol in block.cursor() {
                writer.write(symbol);
            }
        }
    }
    writer.finish()
}

fn decode_stream(
    payload: &[u8],
    count: usize,
    config: &StreamConfig,
    word_size: WordSize,
    dependency: Option<&SymbolBlock>,
) -> CodecResult<SymbolBlock> {
    if count == 0 {
        if !payload.is_empty() {
            return Err(CodecError::UnexpectedPayload(payload.len()));
        }
        return Ok(SymbolBlock::new(word_size));
    }

    let mut reader = Reader::new(payload, config, word_size);
    let mut block = SymbolBlock::with_capacity(word_size, count);
    match dependency {
        Some(dependency) => {
            for index in 0..count {
                block.push(reader.read_with_dependency(dependency.get(index)));
            }
        }
        None => {
            for _ in 0..count {
                block.push(reader.read());
            }
        }
    }
    Ok(block)
}
