//! Chunked byte cursor with pushback.
//!
//! The decoder consumes its source in fixed-size chunks. When it stops in the
//! middle of a chunk (a key finished, a nested object started) the unread tail
//! is pushed back and handed out again by the next [`Cursor::read_chunk`].
//!
//! Chunks are slices of one read buffer that is allocated on first use and
//! reused for every read; pushing back only moves the read offset.

use crate::options::MAX_CHUNK_SIZE;
use crate::{Error, Result};
use log::trace;
use std::io::{self, Read};

pub(crate) struct Cursor<R> {
    reader: R,
    chunk_size: usize,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    exhausted: bool,
}

impl<R: Read> Cursor<R> {
    pub(crate) fn new(reader: R, chunk_size: usize) -> Self {
        Cursor {
            reader,
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
            buf: Vec::new(),
            pos: 0,
            filled: 0,
            exhausted: false,
        }
    }

    /// Returns the bytes pushed back since the last read if there are any,
    /// otherwise up to `chunk_size` fresh bytes from the source. `None` means
    /// the source is exhausted.
    pub(crate) fn read_chunk(&mut self) -> Result<Option<&[u8]>> {
        if self.pos == self.filled {
            if self.exhausted || !self.fill()? {
                return Ok(None);
            }
        }

        let start = self.pos;
        self.pos = self.filled;
        Ok(Some(&self.buf[start..self.filled]))
    }

    /// Hands the last `count` bytes of the previous chunk out again on the
    /// next [`Cursor::read_chunk`], ahead of any further source bytes.
    pub(crate) fn push_back(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        trace!("pushing back {} bytes", count);
        self.pos -= count.min(self.pos);
    }

    fn fill(&mut self) -> Result<bool> {
        if self.buf.is_empty() {
            self.buf = vec![0; self.chunk_size];
        }

        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    trace!("byte source exhausted");
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(n) => {
                    trace!("read chunk of {} bytes", n);
                    self.pos = 0;
                    self.filled = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(e)),
            }
        }
    }
}
