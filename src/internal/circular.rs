//! Circular dependency detection infrastructure.

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::error::{DiError, DiResult};

pub(crate) const MAX_DEPTH: usize = 1024;

/// Stack of names whose construction is in flight on one container.
///
/// Every container owns its own context; a child delegating a singleton to
/// its parent pushes onto the parent's stack, not its own.
#[derive(Default)]
pub(crate) struct ResolutionContext {
    stack: Mutex<SmallVec<[String; 8]>>,
}

impl ResolutionContext {
    /// Pushes `name`, failing if it is already being built here.
    pub(crate) fn enter(&self, name: &str, max_depth: usize) -> DiResult<StackGuard<'_>> {
        let mut stack = self.stack.lock();

        // Circular detection BEFORE pushing the new name
        if stack.iter().any(|n| n == name) {
            let mut path: Vec<String> = stack.iter().cloned().collect();
            path.push(name.to_string());
            return Err(DiError::CircularDependency(path));
        }

        if stack.len() >= max_depth {
            return Err(DiError::DepthExceeded(stack.len()));
        }

        stack.push(name.to_string());
        Ok(StackGuard { context: self })
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.lock().len()
    }
}

/// Pops its entry when dropped, on success and error paths alike.
pub(crate) struct StackGuard<'a> {
    context: &'a ResolutionContext,
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.context.stack.lock().pop();
    }
}
