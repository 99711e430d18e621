//! Skip policies
//!
//! A skip policy consumes ignorable input in front of a token. Every
//! primitive parser owns one, calls [`skip`](SkipPolicy::skip) before testing
//! its token and [`unskip`](SkipPolicy::unskip) when it fails or is undone, so
//! backtracking restores skipped input as well.

use super::stream::Stream;
use super::undo::UndoLog;

/// Strategy for consuming ignorable input before a token
pub trait SkipPolicy {
    /// Consume ignorable input and remember how much
    fn skip<S: Stream + ?Sized>(&self, stream: &mut S);

    /// Give back what the matching `skip` consumed
    fn unskip<S: Stream + ?Sized>(&self, stream: &mut S);

    /// Whether no `skip` is waiting for its `unskip`
    fn is_settled(&self) -> bool {
        true
    }
}

/// Skip nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSkip;

impl SkipPolicy for NoSkip {
    #[inline]
    fn skip<S: Stream + ?Sized>(&self, _stream: &mut S) {}

    #[inline]
    fn unskip<S: Stream + ?Sized>(&self, _stream: &mut S) {}
}

/// Skip a maximal run of ASCII whitespace
#[derive(Debug, Clone)]
pub struct Whitespace {
    lengths: UndoLog<usize>,
}

impl Whitespace {
    /// Create a whitespace skipper with an empty log
    pub fn new() -> Self {
        Self {
            lengths: UndoLog::new("whitespace skip"),
        }
    }
}

impl Default for Whitespace {
    fn default() -> Self {
        Self::new()
    }
}

/// Space, tab, newline, vertical tab, form feed, carriage return
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

impl SkipPolicy for Whitespace {
    fn skip<S: Stream + ?Sized>(&self, stream: &mut S) {
        let mut count = 0;
        while let Some(&[b]) = stream.peek(1) {
            if !is_space(b) {
                break;
            }
            stream.advance(1);
            count += 1;
        }
        self.lengths.push(count);
    }

    #[track_caller]
    fn unskip<S: Stream + ?Sized>(&self, stream: &mut S) {
        let count = self.lengths.pop();
        if count > 0 {
            stream.retreat(count);
        }
    }

    fn is_settled(&self) -> bool {
        self.lengths.is_empty()
    }
}
