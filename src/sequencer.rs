//! Fragment sequencer.
//!
//! Turns a [`Template`] into the lazy sequence `S[0], f(V[0]), S[1], ..., S[n]`, where
//! `S` are the static segments and `f` is [`Fragment::interpolate`]. Nothing is
//! classified ahead of time: each value is classified when the cursor reaches it, and
//! nested sequences stay unexpanded until the renderer descends into them.
//!
//! The cursor is single pass. Values are moved out as they are visited, and nested
//! iterators may themselves be one-shot.

use std::sync::Arc;
use std::vec;

use crate::core::Result;
use crate::fragment::Fragment;
use crate::template::{Shape, Template, Value};

/// The plain, unspecialized expansion strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer;

impl Sequencer {
    /// Open a cursor over the template's fragments.
    ///
    /// The cursor yields `S0, f(V0), S1, ..., Sn`: each static segment as a raw literal and
    /// each value classified by [`Fragment::interpolate`]. Empty segments are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html_stream::{Fragment, Sequencer, html};
    ///
    /// let cursor = Sequencer.sequence(html!("<b>", "</b>"; "x<y")).unwrap();
    /// let texts: Vec<String> = cursor
    ///     .map(|fragment| match fragment {
    ///         Fragment::Literal(text) => text.into_owned(),
    ///         other => panic!("unexpected {other:?}"),
    ///     })
    ///     .collect();
    /// assert_eq!(texts, ["<b>", "x&lt;y", "</b>"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ArityMismatch`](crate::core::RenderError::ArityMismatch) if
    /// the value count does not fit the shape. Nothing is yielded in that case.
    pub fn sequence(&self, template: Template) -> Result<TemplateCursor> {
        TemplateCursor::new(template)
    }
}

/// Forward-only cursor over a template's fragments.
#[derive(Debug)]
pub struct TemplateCursor {
    shape: Arc<Shape>,
    values: vec::IntoIter<Value>,
    segment: usize,
    at_value: bool,
}

impl TemplateCursor {
    /// Open a cursor, checking arity first.
    ///
    /// # Errors
    ///
    /// Same as [`Sequencer::sequence`].
    pub fn new(template: Template) -> Result<Self> {
        template.check_arity()?;
        let (shape, values) = template.into_parts();
        Ok(Self {
            shape,
            values: values.into_iter(),
            segment: 0,
            at_value: false,
        })
    }
}

impl Iterator for TemplateCursor {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        if self.at_value {
            self.at_value = false;
            return self.values.next().map(Fragment::interpolate);
        }
        let text = self.shape.segments().get(self.segment)?.clone();
        self.segment += 1;
        self.at_value = self.segment < self.shape.segments().len();
        Some(Fragment::Literal(text))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_segments = self.shape.segments().len() - self.segment;
        let n = remaining_segments + self.values.len();
        (n, Some(n))
    }
}
