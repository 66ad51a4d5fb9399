//! Length-prefixed binary stream framing primitives. All fixed-size
//! integers are big-endian; symbol counts of token-type subsequences use a
//! 7-bit continuation varint ("U7") with most significant groups first.

use std::io;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_u32::<BigEndian>(value)
}

pub(crate) fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    reader.read_u32::<BigEndian>()
}

/// Number of bytes the U7 encoding of `value` occupies.
#[must_use]
pub(crate) fn u7_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros().min(63);
    1 + (bits as usize - 1) / 7
}

/// Writes `value` as a U7 varint, returning the number of bytes written.
pub(crate) fn write_u7<W: Write>(writer: &mut W, value: u64) -> io::Result<usize> {
    let len = u7_len(value);
    let mut shift = 7 * (len - 1);
    loop {
        let group = ((value >> shift) & 0x7F) as u8;
        if shift == 0 {
            writer.write_u8(group)?;
            return Ok(len);
        }
        writer.write_u8(group | 0x80)?;
        shift -= 7;
    }
}

/// Reads a U7 varint, returning the value and the number of bytes consumed.
pub(crate) fn read_u7<R: Read>(reader: &mut R) -> io::Result<(u64, usize)> {
    let mut value = 0_u64;
    for consumed in 1..=10 {
        let byte = reader.read_u8()?;
        value = (value << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 == 0 {
            return Ok((value, consumed));
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "U7 varint longer than 10 bytes",
    ))
}

pub(crate) fn read_bytes<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0; len];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}
