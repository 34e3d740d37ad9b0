//! Compiled emission plans and the producers that run them.

use std::borrow::Cow;

use crate::core::{RenderError, Result};
use crate::fragment::{Fragment, Sequence, interpolate_into};
use crate::template::{Shape, ShapeId, Value};

/// One instruction of a [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Append static text.
    Static(Cow<'static, str>),
    /// Interpolate the value for this slot.
    Slot(usize),
}

/// The static/dynamic layout of a shape, flattened into instructions.
///
/// Empty segments produce no instruction, so adjacent slots sit next to each other and
/// a shape without slots is a single static step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step>,
    slots: usize,
    static_len: usize,
}

impl Plan {
    /// Walk the shape once and build its plan.
    pub fn build(shape: &Shape) -> Self {
        let segments = shape.segments();
        let mut steps = Vec::with_capacity(segments.len() * 2);
        let mut static_len = 0;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                steps.push(Step::Slot(i - 1));
            }
            if !segment.is_empty() {
                static_len += segment.len();
                steps.push(Step::Static(segment.clone()));
            }
        }
        Self {
            steps,
            slots: shape.slots(),
            static_len,
        }
    }

    /// The instructions, in emission order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of slots the plan expects values for.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Total length of the static text.
    pub fn static_len(&self) -> usize {
        self.static_len
    }
}

/// A specialized fragment producer for one shape.
///
/// Shared read-only between every render of the shape's call site.
#[derive(Debug)]
pub struct Producer {
    shape: ShapeId,
    plan: Plan,
    constant: Option<Cow<'static, str>>,
}

impl Producer {
    /// Compile a producer for `shape`.
    pub fn compile(shape: &Shape) -> Self {
        let plan = Plan::build(shape);
        let constant = match plan.steps() {
            [] => Some(Cow::Borrowed("")),
            [Step::Static(text)] => Some(text.clone()),
            _ => None,
        };
        Self {
            shape: shape.id(),
            plan,
            constant,
        }
    }

    /// The shape this producer was compiled for.
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// The compiled plan.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Produce the template's fragments as one [`Fragment::Sequence`].
    ///
    /// # Errors
    ///
    /// Same as [`produce_fragments`](Self::produce_fragments).
    pub fn produce(&self, values: Vec<Value>) -> Result<Fragment> {
        self.produce_fragments(values)
            .map(|fragments| Fragment::Sequence(Sequence::fragments(fragments)))
    }

    /// Produce the template's fragments.
    ///
    /// Static text and scalar values are concatenated into a single literal until a slot
    /// holds a sequence or a deferred value; only then is the literal cut. The returned
    /// list therefore alternates literals with sequence/deferred fragments.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ArityMismatch`](crate::RenderError::ArityMismatch) unless
    /// `values` holds exactly one value per slot.
    pub fn produce_fragments(&self, values: Vec<Value>) -> Result<Vec<Fragment>> {
        check_arity_for(self, values.len())?;
        if let Some(text) = &self.constant {
            return Ok(vec![Fragment::Literal(text.clone())]);
        }

        let mut values = values.into_iter();
        let mut fragments = Vec::new();
        let mut acc = String::with_capacity(self.plan.static_len() + 16 * self.plan.slots());
        for step in self.plan.steps() {
            match step {
                Step::Static(text) => acc.push_str(text),
                Step::Slot(_) => {
                    // Arity was checked above, so every slot has a value.
                    let Some(value) = values.next() else { break };
                    if let Some(fragment) = interpolate_into(value, &mut acc) {
                        if !acc.is_empty() {
                            fragments.push(Fragment::Literal(Cow::Owned(std::mem::take(&mut acc))));
                        }
                        fragments.push(fragment);
                    }
                }
            }
        }
        if !acc.is_empty() || fragments.is_empty() {
            fragments.push(Fragment::Literal(Cow::Owned(acc)));
        }
        Ok(fragments)
    }
}

fn check_arity_for(producer: &Producer, actual: usize) -> Result<()> {
    if producer.plan.slots() == actual {
        Ok(())
    } else {
        Err(RenderError::ArityMismatch {
            shape: producer.shape,
            expected: producer.plan.slots(),
            actual,
        })
    }
}
