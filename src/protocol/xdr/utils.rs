use std::io::{Read, Write};

pub(crate) const ALIGNMENT: usize = 4;

/// Number of padding bytes needed to round `len` up to the XDR alignment.
fn padding_len(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

pub(crate) fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    let mut padding_buffer = [0_u8; ALIGNMENT];
    src.read_exact(&mut padding_buffer[..padding_len(src_len)])
}

pub(crate) fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let padding_buffer = [0_u8; ALIGNMENT];
    dest.write_all(&padding_buffer[..padding_len(src_len)])
}

pub(crate) fn invalid_data(m: impl Into<String>) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m.into())
}
