//! Length-prefixed framing shared by both wire protocols (§6): `{len:u32,
//! opCode:u16, payload}`. The realm↔world proxy and the client↔realm game
//! protocol use the identical shape, so one codec serves both; only the
//! opcode namespace differs ([`crate::opcode`]).
//!
//! Modeled on `valence_network`'s `PacketIo`: a decode loop that reads into
//! a growable buffer until a full frame is available, rather than a codec
//! registered with `tokio_util::codec`.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const READ_CHUNK: usize = 4096;
const HEADER_LEN: usize = 4 + 2;

#[derive(Debug, Error)]
pub enum FramingError {
    #[error("frame length {0} exceeds the configured maximum {1}")]
    FrameTooLarge(u32, u32),
    #[error("connection closed mid-frame")]
    Eof,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One decoded frame: an opcode and its payload, with the length prefix
/// already stripped.
#[derive(Debug, Clone)]
pub struct Frame {
    pub op_code: u16,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(op_code: u16, payload: Bytes) -> Self {
        Self { op_code, payload }
    }

    /// Encodes `{len:u32, opCode:u16, payload}`, where `len` covers the
    /// opcode and payload but not itself.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        let len = 2 + self.payload.len() as u32;
        buf.put_u32_le(len);
        buf.put_u16_le(self.op_code);
        buf.put_slice(&self.payload);
        buf.freeze()
    }
}

/// Buffers partial reads off `reader` and yields whole [`Frame`]s, mirroring
/// `PacketIo::recv_packet`'s read-then-try-decode loop.
pub struct FrameReader<R> {
    reader: R,
    buf: BytesMut,
    max_frame_len: u32,
}

impl<R: tokio::io::AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R, max_frame_len: u32) -> Self {
        Self {
            reader,
            buf: BytesMut::new(),
            max_frame_len,
        }
    }

    fn try_take_frame(&mut self) -> Result<Option<Frame>, FramingError> {
        if self.buf.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_le_bytes(self.buf[..4].try_into().unwrap());
        if len < 2 {
            return Err(FramingError::FrameTooLarge(len, self.max_frame_len));
        }
        if len > self.max_frame_len {
            return Err(FramingError::FrameTooLarge(len, self.max_frame_len));
        }
        let total = 4 + len as usize;
        if self.buf.len() < total {
            return Ok(None);
        }

        let mut frame_bytes = self.buf.split_to(total);
        frame_bytes.advance(4);
        let op_code = frame_bytes.get_u16_le();
        Ok(Some(Frame::new(op_code, frame_bytes.freeze())))
    }

    pub async fn read_frame(&mut self) -> Result<Frame, FramingError> {
        loop {
            if let Some(frame) = self.try_take_frame()? {
                return Ok(frame);
            }

            self.buf.reserve(READ_CHUNK);
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                return Err(FramingError::Eof);
            }
        }
    }
}

pub async fn write_frame<W: tokio::io::AsyncWrite + Unpin>(writer: &mut W, frame: &Frame) -> Result<(), FramingError> {
    writer.write_all(&frame.encode()).await?;
    Ok(())
}
