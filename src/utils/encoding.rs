use std::io::{self, Read, Write};

/// Write a u32 in little-endian format
pub fn write_u32_le<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u32 in little-endian format
pub fn read_u32_le<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write a u16 in little-endian format
pub fn write_u16_le<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u16 in little-endian format
pub fn read_u16_le<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Write a slice of u16s back to back in little-endian format
pub fn write_u16_slice_le<W: Write>(writer: &mut W, values: &[u16]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(values.len() * 2);
    for &v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    writer.write_all(&buf)
}

/// Write a slice of u32s back to back in little-endian format
pub fn write_u32_slice_le<W: Write>(writer: &mut W, values: &[u32]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(values.len() * 4);
    for &v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    writer.write_all(&buf)
}

/// Decode little-endian u16s. Trailing bytes that do not fill a u16 are ignored.
pub fn u16s_from_le_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// Decode little-endian u32s. Trailing bytes that do not fill a u32 are ignored.
pub fn u32s_from_le_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
