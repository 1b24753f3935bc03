//! Argument queues consumed by matchers.
//!
//! A matcher walks the subject expression left to right. Entering an operation pushes a new queue
//! level holding its arguments; closing it pops the (then empty) level. Every consuming operation
//! returns a guard that dereferences to the queue stack and puts everything back when dropped, so a
//! branch restores the queue on every exit path and sibling alternatives see it unmodified.
//!
//! ```
//! use matchgen_expr::{Expr, Head};
//! use matchgen_runtime::Subjects;
//!
//! let mut subjects = Subjects::new(Expr::pow(Expr::symbol("x"), Expr::integer(2)));
//! {
//!     let mut entered = subjects.enter(&Head::POW).unwrap();
//!     assert_eq!(entered.remaining(), 2);
//!     let taken = entered.take().unwrap();
//!     assert_eq!(taken.remaining(), 1);
//! }
//! assert_eq!(subjects.remaining(), 1);
//! ```

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use matchgen_expr::{Expr, Head};

use crate::substitution::Binding;

/// Stack of argument queues; the innermost level is the one being consumed.
#[derive(Debug, Clone)]
pub struct Subjects {
    root: VecDeque<Arc<Expr>>,
    nested: Vec<VecDeque<Arc<Expr>>>,
}

impl Subjects {
    pub fn new(subject: Arc<Expr>) -> Self {
        Self { root: VecDeque::from([subject]), nested: Vec::new() }
    }

    fn level(&self) -> &VecDeque<Arc<Expr>> {
        self.nested.last().unwrap_or(&self.root)
    }

    fn level_mut(&mut self) -> &mut VecDeque<Arc<Expr>> {
        match self.nested.last_mut() {
            Some(level) => level,
            None => &mut self.root,
        }
    }

    /// Number of open operation levels.
    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    /// Unconsumed arguments at the innermost level.
    pub fn remaining(&self) -> usize {
        self.level().len()
    }

    pub fn front(&self) -> Option<&Arc<Expr>> {
        self.level().front()
    }

    /// The whole subject has been consumed and every entered operation closed.
    pub fn is_exhausted(&self) -> bool {
        self.nested.is_empty() && self.root.is_empty()
    }

    /// Consume the front argument if `accept` admits it.
    pub fn take_if(&mut self, accept: impl FnOnce(&Expr) -> bool) -> Option<Taken<'_>> {
        if !self.front().is_some_and(|expr| accept(expr.as_ref())) {
            return None;
        }
        let item = self.level_mut().pop_front()?;
        Some(Taken { subjects: self, item })
    }

    pub fn take(&mut self) -> Option<Taken<'_>> {
        self.take_if(|_| true)
    }

    /// Consume the front argument if it is an operation with `head` and descend into its arguments.
    pub fn enter(&mut self, head: &Head) -> Option<Entered<'_>> {
        if !self.front().is_some_and(|expr| expr.is_operation(head)) {
            return None;
        }
        let item = self.level_mut().pop_front()?;
        self.nested.push(item.args().iter().cloned().collect());
        Some(Entered { subjects: self, item })
    }

    /// Leave the innermost operation; only possible once all of its arguments are consumed.
    pub fn close(&mut self) -> Option<Closed<'_>> {
        if !self.nested.last().is_some_and(VecDeque::is_empty) {
            return None;
        }
        self.nested.pop()?;
        Some(Closed { subjects: self })
    }

    /// Consume `min` arguments at once; the returned run can then grow one argument at a time.
    pub fn take_sequence(&mut self, min: usize) -> Option<TakenSequence<'_>> {
        if self.remaining() < min {
            return None;
        }
        let run = self.level_mut().drain(..min).collect();
        Some(TakenSequence { subjects: self, run })
    }
}

// ============================================================================
// GUARDS
// ============================================================================

/// One consumed argument, pushed back to the front on drop.
#[derive(Debug)]
pub struct Taken<'a> {
    subjects: &'a mut Subjects,
    item: Arc<Expr>,
}

impl Taken<'_> {
    pub fn item(&self) -> &Arc<Expr> {
        &self.item
    }
}

impl Deref for Taken<'_> {
    type Target = Subjects;

    fn deref(&self) -> &Subjects {
        self.subjects
    }
}

impl DerefMut for Taken<'_> {
    fn deref_mut(&mut self) -> &mut Subjects {
        self.subjects
    }
}

impl Drop for Taken<'_> {
    fn drop(&mut self) {
        let item = self.item.clone();
        self.subjects.level_mut().push_front(item);
    }
}

/// An entered operation; drop pops its argument level and restores the operation.
#[derive(Debug)]
pub struct Entered<'a> {
    subjects: &'a mut Subjects,
    item: Arc<Expr>,
}

impl Entered<'_> {
    pub fn item(&self) -> &Arc<Expr> {
        &self.item
    }
}

impl Deref for Entered<'_> {
    type Target = Subjects;

    fn deref(&self) -> &Subjects {
        self.subjects
    }
}

impl DerefMut for Entered<'_> {
    fn deref_mut(&mut self) -> &mut Subjects {
        self.subjects
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.subjects.nested.pop();
        let item = self.item.clone();
        self.subjects.level_mut().push_front(item);
    }
}

/// A closed operation level; drop reopens it (empty).
#[derive(Debug)]
pub struct Closed<'a> {
    subjects: &'a mut Subjects,
}

impl Deref for Closed<'_> {
    type Target = Subjects;

    fn deref(&self) -> &Subjects {
        self.subjects
    }
}

impl DerefMut for Closed<'_> {
    fn deref_mut(&mut self) -> &mut Subjects {
        self.subjects
    }
}

impl Drop for Closed<'_> {
    fn drop(&mut self) {
        self.subjects.nested.push(VecDeque::new());
    }
}

/// A run of consecutive arguments consumed by a sequence wildcard.
#[derive(Debug)]
pub struct TakenSequence<'a> {
    subjects: &'a mut Subjects,
    run: Vec<Arc<Expr>>,
}

impl TakenSequence<'_> {
    pub fn run(&self) -> &[Arc<Expr>] {
        &self.run
    }

    /// Consume one more argument; `false` once the level is exhausted.
    pub fn grow(&mut self) -> bool {
        match self.subjects.level_mut().pop_front() {
            Some(expr) => {
                self.run.push(expr);
                true
            }
            None => false,
        }
    }

    pub fn binding(&self, wrap: Option<&Head>) -> Binding {
        Binding::from_run(&self.run, wrap)
    }
}

impl Deref for TakenSequence<'_> {
    type Target = Subjects;

    fn deref(&self) -> &Subjects {
        self.subjects
    }
}

impl DerefMut for TakenSequence<'_> {
    fn deref_mut(&mut self) -> &mut Subjects {
        self.subjects
    }
}

impl Drop for TakenSequence<'_> {
    fn drop(&mut self) {
        let level = self.subjects.level_mut();
        for expr in self.run.drain(..).rev() {
            level.push_front(expr);
        }
    }
}
