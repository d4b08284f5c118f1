use std::io::Write;
use std::num::NonZeroUsize;

use log::trace;

/// Default capacity of the encoder's staging buffer.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Bounded staging buffer in front of a caller supplied writer.
///
/// Bytes accumulate until the buffer holds `chunk_size` bytes, at which
/// point the whole chunk is handed to the inner writer with one
/// `write_all`. Every forwarded write is at most `chunk_size` bytes long.
/// A copy of everything written is kept so the caller can get the full
/// output back from [`ChunkedSink::finish`].
pub struct ChunkedSink<W: Write> {
	inner: W,
	chunk_size: usize,
	buffer: Vec<u8>,
	emitted: Vec<u8>,
	chunks: usize,
}

impl<W: Write> ChunkedSink<W> {
	pub fn new(inner: W, chunk_size: NonZeroUsize) -> Self {
		let chunk_size = chunk_size.get();
		Self {
			inner,
			chunk_size,
			buffer: Vec::with_capacity(chunk_size),
			emitted: Vec::new(),
			chunks: 0,
		}
	}

	pub fn push(&mut self, byte: u8) -> std::io::Result<()> {
		self.extend(&[byte])
	}

	pub fn extend(&mut self, mut bytes: &[u8]) -> std::io::Result<()> {
		self.emitted.extend_from_slice(bytes);
		while !bytes.is_empty() {
			let room = self.chunk_size - self.buffer.len();
			let take = room.min(bytes.len());
			self.buffer.extend_from_slice(&bytes[..take]);
			bytes = &bytes[take..];
			if self.buffer.len() == self.chunk_size {
				self.flush_chunk()?;
			}
		}
		Ok(())
	}

	/// Number of chunks forwarded to the inner writer so far.
	pub fn chunks(&self) -> usize {
		self.chunks
	}

	/// Forwards any partial chunk, flushes the inner writer and returns
	/// every byte written through this sink.
	pub fn finish(mut self) -> std::io::Result<Vec<u8>> {
		self.flush_chunk()?;
		self.inner.flush()?;
		Ok(self.emitted)
	}

	fn flush_chunk(&mut self) -> std::io::Result<()> {
		if self.buffer.is_empty() {
			return Ok(());
		}
		trace!("flushing {} byte chunk", self.buffer.len());
		self.inner.write_all(&self.buffer)?;
		self.buffer.clear();
		self.chunks += 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Writer that records each `write` call separately.
	#[derive(Default)]
	struct RecordingWriter {
		writes: Vec<Vec<u8>>,
	}

	impl Write for RecordingWriter {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.writes.push(buf.to_vec());
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	struct FailingWriter;

	impl Write for FailingWriter {
		fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
			Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	fn size(n: usize) -> NonZeroUsize {
		NonZeroUsize::new(n).unwrap()
	}

	#[test]
	fn test_chunks_are_bounded() {
		let mut recorder = RecordingWriter::default();
		let mut sink = ChunkedSink::new(&mut recorder, size(4));
		sink.extend(b"hello world").unwrap();
		sink.push(b'!').unwrap();
		assert_eq!(sink.chunks(), 3);
		let out = sink.finish().unwrap();

		assert_eq!(out, b"hello world!");
		let sizes: Vec<usize> = recorder.writes.iter().map(|w| w.len()).collect();
		assert_eq!(sizes, vec![4, 4, 4]);
		assert_eq!(recorder.writes.concat(), b"hello world!");
	}

	#[test]
	fn test_partial_chunk_written_on_finish() {
		let mut recorder = RecordingWriter::default();
		let mut sink = ChunkedSink::new(&mut recorder, size(DEFAULT_CHUNK_SIZE));
		sink.extend(b"abc").unwrap();
		assert_eq!(sink.chunks(), 0);
		sink.finish().unwrap();
		assert_eq!(recorder.writes, vec![b"abc".to_vec()]);
	}

	#[test]
	fn test_empty_finish_writes_nothing() {
		let mut recorder = RecordingWriter::default();
		let sink = ChunkedSink::new(&mut recorder, size(8));
		let out = sink.finish().unwrap();
		assert!(out.is_empty());
		assert!(recorder.writes.is_empty());
	}

	#[test]
	fn test_inner_error_is_returned() {
		let mut sink = ChunkedSink::new(FailingWriter, size(2));
		let result = sink.extend(b"abc");
		assert!(result.is_err());
	}
}
