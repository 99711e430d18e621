//! Input cursor and the stream capability
//!
//! Every node talks to its input through the [`Stream`] trait, a position
//! over a fully addressable byte buffer. Nodes look ahead with
//! [`peek`](Stream::peek), commit with [`advance`](Stream::advance) and undo
//! with [`retreat`](Stream::retreat). Pairing advances with retreats is the
//! node's job; the cursor only guards its own bounds.

use super::error::{misuse, UsageError};

/// Position-tracking view over an input buffer
pub trait Stream {
    /// The unconsumed tail of the buffer
    fn rest(&self) -> &[u8];

    /// Move forward by `n` bytes
    fn advance(&mut self, n: usize);

    /// Move backward by `n` bytes
    fn retreat(&mut self, n: usize);

    /// Current byte offset
    fn position(&self) -> usize;

    /// Borrow the next `n` bytes without advancing, or `None` if fewer remain
    #[inline]
    fn peek(&self, n: usize) -> Option<&[u8]> {
        self.rest().get(..n)
    }

    /// Number of bytes left after the current position
    #[inline]
    fn remaining(&self) -> usize {
        self.rest().len()
    }

    /// Whether the whole buffer has been consumed
    #[inline]
    fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }
}

/// Cursor over a borrowed byte buffer
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a string
    pub fn new(input: &'a str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Create a cursor at the start of a byte buffer
    pub fn from_bytes(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }
}

impl Stream for Cursor<'_> {
    #[inline]
    fn rest(&self) -> &[u8] {
        &self.buffer[self.position..]
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        let remaining = self.remaining();
        if n > remaining {
            misuse(UsageError::CursorOverflow {
                requested: n,
                remaining,
            });
        }
        self.position += n;
    }

    #[inline]
    fn retreat(&mut self, n: usize) {
        if n > self.position {
            misuse(UsageError::CursorUnderflow {
                requested: n,
                position: self.position,
            });
        }
        self.position -= n;
    }

    #[inline]
    fn position(&self) -> usize {
        self.position
    }
}

/// Adapts any stream, sized or not, into something that coerces to
/// `&mut dyn Stream`
///
/// Type-erased nodes such as [`Deferred`](super::deferred::Deferred) only see
/// `dyn Stream`, so a grammar stays independent of the concrete cursor type.
pub struct StreamAdapter<'s, S: ?Sized> {
    inner: &'s mut S,
}

impl<'s, S: Stream + ?Sized> StreamAdapter<'s, S> {
    /// Wrap a stream
    #[inline]
    pub fn new(inner: &'s mut S) -> Self {
        Self { inner }
    }
}

impl<S: Stream + ?Sized> Stream for StreamAdapter<'_, S> {
    #[inline]
    fn rest(&self) -> &[u8] {
        self.inner.rest()
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.inner.advance(n)
    }

    #[inline]
    fn retreat(&mut self, n: usize) {
        self.inner.retreat(n)
    }

    #[inline]
    fn position(&self) -> usize {
        self.inner.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let cursor = Cursor::new("hello");
        assert_eq!(cursor.peek(2), Some(&b"he"[..]));
        assert_eq!(cursor.peek(5), Some(&b"hello"[..]));
        assert_eq!(cursor.peek(6), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_advance_and_retreat() {
        let mut cursor = Cursor::new("hello");
        cursor.advance(3);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.peek(2), Some(&b"lo"[..]));
        assert_eq!(cursor.rest(), b"lo");
        cursor.retreat(2);
        assert_eq!(cursor.position(), 1);
        cursor.advance(4);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(0), Some(&b""[..]));
        assert_eq!(cursor.peek(1), None);
    }

    #[test]
    #[should_panic(expected = "cursor retreat")]
    fn test_retreat_past_start_panics() {
        let mut cursor = Cursor::new("ab");
        cursor.advance(1);
        cursor.retreat(2);
    }

    #[test]
    #[should_panic(expected = "cursor advance")]
    fn test_advance_past_end_panics() {
        let mut cursor = Cursor::new("ab");
        cursor.advance(3);
    }

    #[test]
    fn test_adapter_forwards_to_inner() {
        let mut cursor = Cursor::new("abc");
        {
            let mut adapter = StreamAdapter::new(&mut cursor);
            let erased: &mut dyn Stream = &mut adapter;
            erased.advance(2);
            assert_eq!(erased.remaining(), 1);
        }
        assert_eq!(cursor.position(), 2);
    }
}
