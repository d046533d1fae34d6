//! Generic transport types and traits

/// Bytes produced by a single transport read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Bytes received, possibly empty.
    pub data: Vec<u8>,
    /// Set once the stream has ended and no further reads will produce data.
    pub eof: bool,
}

/// Trait for a blocking byte transport to the adapter.
///
/// The command channel never assumes a response arrives in one read: partial delivery,
/// arbitrary chunking, and back-to-back reads must all be supported. A read that times
/// out waiting for data returns an empty chunk with `eof` unset, so the channel's
/// bounded attempt budget governs how long an exchange may wait.
pub trait Transport {
    /// Write the whole buffer before returning.
    fn write_all(&mut self, data: &[u8]) -> Result<(), crate::error::Error>;
    /// Read whatever is currently available.
    fn read(&mut self) -> Result<Chunk, crate::error::Error>;
}
