//! Traversal cursors and the template expansion seam.

use std::sync::Arc;
use std::vec;

use crate::compiler::Compiler;
use crate::core::Result;
use crate::fragment::{Fragment, Items, Sequence};
use crate::sequencer::{Sequencer, TemplateCursor};
use crate::template::{Template, Value, ValueIter};

/// Decides how a nested [`Template`] turns into fragments when the renderer reaches it.
///
/// Implemented by the plain [`Sequencer`], by the specializing [`Compiler`], and by
/// [`Engine`](crate::Engine), which picks one of the two from its configuration.
pub trait Expander {
    /// Open a cursor over the template's fragments.
    ///
    /// # Errors
    ///
    /// Implementations fail with
    /// [`RenderError::ArityMismatch`](crate::RenderError::ArityMismatch) when the value
    /// count does not fit the shape.
    fn expand(&self, template: Template) -> Result<Cursor>;
}

impl Expander for Sequencer {
    fn expand(&self, template: Template) -> Result<Cursor> {
        self.sequence(template).map(Cursor::Template)
    }
}

impl Expander for Compiler {
    fn expand(&self, template: Template) -> Result<Cursor> {
        self.produce_fragments(template).map(|fragments| Cursor::Fragments(fragments.into_iter()))
    }
}

impl<T: Expander + ?Sized> Expander for &T {
    fn expand(&self, template: Template) -> Result<Cursor> {
        (**self).expand(template)
    }
}

impl<T: Expander + ?Sized> Expander for Arc<T> {
    fn expand(&self, template: Template) -> Result<Cursor> {
        (**self).expand(template)
    }
}

/// A position inside one sequence of the output tree.
#[derive(Debug)]
pub enum Cursor {
    /// Unspecialized template expansion.
    Template(TemplateCursor),
    /// Classified fragments, e.g. a compiled producer's output.
    Fragments(vec::IntoIter<Fragment>),
    /// List elements, classified in fragment position as they are reached.
    Values(vec::IntoIter<Value>),
    /// Lazy iterator items, classified in fragment position as they are pulled.
    Iter(ValueIter),
}

impl Cursor {
    /// Open a cursor over `sequence`, expanding a nested template with `expander`.
    ///
    /// # Errors
    ///
    /// Only template sequences can fail, with whatever [`Expander::expand`] returns.
    pub fn open(sequence: Sequence, expander: &impl Expander) -> Result<Self> {
        match sequence.0 {
            Items::Template(template) => expander.expand(template),
            Items::Values(values) => Ok(Self::Values(values.into_iter())),
            Items::Iter(iter) => Ok(Self::Iter(iter)),
            Items::Fragments(fragments) => Ok(Self::Fragments(fragments.into_iter())),
        }
    }

    /// A cursor over a single root fragment.
    pub fn root(fragment: Fragment) -> Self {
        Self::Fragments(vec![fragment].into_iter())
    }

    /// The next fragment, or `None` once the sequence is exhausted.
    ///
    /// List and iterator items are classified with [`Fragment::from_item`], so an item
    /// that has no markup form yields `Some(Err(_))`.
    pub fn next_fragment(&mut self) -> Option<Result<Fragment>> {
        match self {
            Self::Template(cursor) => cursor.next().map(Ok),
            Self::Fragments(fragments) => fragments.next().map(Ok),
            Self::Values(values) => values.next().map(Fragment::from_item),
            Self::Iter(iter) => iter.next().map(Fragment::from_item),
        }
    }
}
