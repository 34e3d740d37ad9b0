//! The renderer's synchronous core.
//!
//! [`Walker`] walks the fragment tree depth-first with an explicit stack of cursors,
//! appending literal text to a buffer. It runs without yielding until it meets a
//! deferred value or runs out of fragments, then hands the buffered text back as one
//! chunk. Awaiting the deferred value is left to the caller, which is what keeps every
//! non-deferred fragment off the async path.
//!
//! ```text
//! WALKING --literal/sequence--> WALKING
//! WALKING --deferred--> SUSPENDED --resume--> WALKING
//! WALKING --exhausted--> DONE
//! any --unsupported fragment / arity / rejection--> FAILED
//! ```

use std::mem;

use super::cursor::{Cursor, Expander};
use crate::constants::DEFAULT_BUFFER_CAPACITY;
use crate::core::{RenderError, Result};
use crate::fragment::{Deferred, Fragment};
use crate::template::Value;

/// Where a [`Walker`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Ready to walk.
    Walking,
    /// Waiting for a deferred value to be resolved and passed to [`Walker::resume`].
    Suspended,
    /// Every fragment has been emitted.
    Done,
    /// The walk was aborted by an error.
    Failed,
}

/// Result of one [`Walker::step`].
#[derive(Debug)]
pub enum Step {
    /// A deferred value was reached. `chunk` holds everything buffered before it.
    Suspend {
        /// Buffered text to emit before waiting.
        chunk: String,
        /// The value to wait for.
        deferred: Deferred,
    },
    /// The tree is exhausted. `chunk` holds the remaining buffered text.
    Done {
        /// Final buffered text.
        chunk: String,
    },
}

/// Resumable depth-first walk over a fragment tree.
#[derive(Debug)]
pub struct Walker<E> {
    expander: E,
    stack: Vec<Cursor>,
    buffer: String,
    capacity: usize,
    state: WalkState,
}

impl<E: Expander> Walker<E> {
    /// Start a walk at `root`.
    pub fn new(root: Fragment, expander: E) -> Self {
        Self::with_capacity(root, expander, DEFAULT_BUFFER_CAPACITY)
    }

    /// Start a walk at `root` with a buffer of `capacity` bytes.
    pub fn with_capacity(root: Fragment, expander: E, capacity: usize) -> Self {
        Self {
            expander,
            stack: vec![Cursor::root(root)],
            buffer: String::with_capacity(capacity),
            capacity,
            state: WalkState::Walking,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Depth of the cursor stack; zero once the walk is over.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Walk until the next deferred value or the end of the tree.
    ///
    /// Calling `step` while suspended, done, or failed yields an empty
    /// [`Step::Done`].
    ///
    /// # Errors
    ///
    /// Fails when a nested template has the wrong arity or a list item has no markup
    /// form. The walker is then [`WalkState::Failed`] and its buffer is discarded.
    pub fn step(&mut self) -> Result<Step> {
        if self.state != WalkState::Walking {
            return Ok(Step::Done {
                chunk: String::new(),
            });
        }
        loop {
            let Some(cursor) = self.stack.last_mut() else {
                self.state = WalkState::Done;
                return Ok(Step::Done {
                    chunk: self.take_buffer(),
                });
            };
            let fragment = match cursor.next_fragment() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Ok(fragment)) => fragment,
                Some(Err(err)) => return Err(self.fail(err)),
            };
            match self.enter(fragment) {
                Ok(None) => {}
                Ok(Some(deferred)) => {
                    self.state = WalkState::Suspended;
                    return Ok(Step::Suspend {
                        chunk: self.take_buffer(),
                        deferred,
                    });
                }
                Err(err) => return Err(self.fail(err)),
            }
        }
    }

    /// Continue after a deferred value resolved to `value`.
    ///
    /// The value is classified in fragment position. If it is itself deferred, the walker
    /// stays suspended and that value is returned to be awaited next.
    ///
    /// # Errors
    ///
    /// Fails with [`RenderError::UnsupportedFragment`] for a number or boolean, or with
    /// an arity error if the value is a malformed template. The walker is then failed.
    pub fn resume(&mut self, value: Value) -> Result<Option<Deferred>> {
        debug_assert_eq!(self.state, WalkState::Suspended);
        let entered = Fragment::from_item(value).and_then(|fragment| self.enter(fragment));
        match entered {
            Ok(None) => {
                self.state = WalkState::Walking;
                Ok(None)
            }
            Ok(Some(deferred)) => Ok(Some(deferred)),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Abort the walk, dropping pending fragments and unflushed text.
    pub fn fail(&mut self, err: RenderError) -> RenderError {
        self.state = WalkState::Failed;
        self.stack.clear();
        self.buffer.clear();
        err
    }

    fn enter(&mut self, fragment: Fragment) -> Result<Option<Deferred>> {
        match fragment {
            Fragment::Literal(text) => self.buffer.push_str(&text),
            Fragment::Sequence(sequence) => {
                let cursor = Cursor::open(sequence, &self.expander)?;
                self.stack.push(cursor);
            }
            Fragment::Deferred(deferred) => return Ok(Some(deferred)),
        }
        Ok(None)
    }

    fn take_buffer(&mut self) -> String {
        if self.buffer.is_empty() {
            return String::new();
        }
        mem::replace(&mut self.buffer, String::with_capacity(self.capacity))
    }
}
