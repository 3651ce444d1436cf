//=========================================================================
// Rendering Context Registry
//=========================================================================
//
// Tracks which rendering context, among possibly many created, is
// presently the exclusive "current" one for drawing.
//
// An explicit registry object (owned by whoever drives rendering)
// rather than a hidden process-wide global: call sites that need
// currency are handed the registry. The single-current invariant is
// still per registry, and the caller is expected to create exactly one.
//
// Not thread-safe. Concurrent `make_current` calls from multiple
// threads are a data race at the driver level anyway; confine a
// registry to one thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== RenderContext =======================================================

/// An exclusive rendering handle the registry can make current.
///
/// `acquire`/`release` bracket the context's exclusive claim on the
/// drawing hardware; `present` swaps buffers. The registry guarantees
/// release-before-acquire when currency moves between contexts.
pub trait RenderContext {
    /// Claims the context as current.
    fn acquire(&mut self);

    /// Releases the context's exclusive claim.
    fn release(&mut self);

    /// Presents the back buffer, optionally synced to vertical blank.
    fn present(&mut self, vsync: bool);
}

//=== ContextError ========================================================

/// Rendering context state errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// An operation needing a current context ran with none current.
    NoCurrentContext,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCurrentContext => write!(f, "No rendering context is current"),
        }
    }
}

impl std::error::Error for ContextError {}

//=== ContextRegistry =====================================================

/// Holder of the at-most-one current rendering context.
///
/// `make_current` is atomic with respect to the single-current
/// invariant: the previous context is released strictly before the new
/// one is acquired, so there is no window in which two contexts are
/// simultaneously claimed.
pub struct ContextRegistry<C: RenderContext> {
    current: Option<C>,
}

impl<C: RenderContext> ContextRegistry<C> {
    //--- Construction -----------------------------------------------------

    /// Creates a registry with no context current.
    pub fn new() -> Self {
        Self { current: None }
    }

    //--- Currency ---------------------------------------------------------

    /// Makes `next` the current context.
    ///
    /// Releases the previously current context first (if any) and
    /// returns it to the caller, who retains ownership of all handles
    /// and destroys them through the host binding when done.
    pub fn make_current(&mut self, mut next: C) -> Option<C> {
        let mut displaced = self.current.take();
        if let Some(prev) = displaced.as_mut() {
            prev.release();
        }

        next.acquire();
        self.current = Some(next);
        trace!(target: "context", "Context made current (displaced: {})", displaced.is_some());

        displaced
    }

    /// Presents the currently current context's back buffer.
    ///
    /// # Errors
    ///
    /// [`ContextError::NoCurrentContext`] if `make_current` has never
    /// been called (or the current context was taken back).
    pub fn swap_buffers(&mut self, vsync: bool) -> Result<(), ContextError> {
        match self.current.as_mut() {
            Some(context) => {
                context.present(vsync);
                Ok(())
            }
            None => Err(ContextError::NoCurrentContext),
        }
    }

    /// Whether any context is current.
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    /// Releases and returns the current context, leaving none current.
    pub fn clear_current(&mut self) -> Option<C> {
        let mut displaced = self.current.take();
        if let Some(prev) = displaced.as_mut() {
            prev.release();
        }
        displaced
    }
}

impl<C: RenderContext> Default for ContextRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Recording Test Double --------------------------------------------

    type Journal = Rc<RefCell<Vec<String>>>;

    struct LoggedContext {
        name: &'static str,
        journal: Journal,
    }

    impl LoggedContext {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Rc::clone(journal),
            }
        }

        fn log(&self, verb: &str) {
            self.journal.borrow_mut().push(format!("{} {}", verb, self.name));
        }
    }

    impl RenderContext for LoggedContext {
        fn acquire(&mut self) {
            self.log("acquire");
        }
        fn release(&mut self) {
            self.log("release");
        }
        fn present(&mut self, vsync: bool) {
            self.log(if vsync { "present-vsync" } else { "present" });
        }
    }

    //=====================================================================
    // Currency
    //=====================================================================

    #[test]
    fn first_make_current_acquires_only() {
        let journal: Journal = Rc::default();
        let mut registry = ContextRegistry::new();

        let displaced = registry.make_current(LoggedContext::new("a", &journal));

        assert!(displaced.is_none(), "Nothing was current before");
        assert_eq!(*journal.borrow(), vec!["acquire a"]);
    }

    #[test]
    fn swapping_contexts_releases_previous_before_acquiring_next() {
        let journal: Journal = Rc::default();
        let mut registry = ContextRegistry::new();

        registry.make_current(LoggedContext::new("a", &journal));
        let displaced = registry.make_current(LoggedContext::new("b", &journal));

        assert_eq!(
            *journal.borrow(),
            vec!["acquire a", "release a", "acquire b"],
            "Release of the old context must strictly precede acquire of the new"
        );
        assert_eq!(displaced.map(|c| c.name), Some("a"));
    }

    #[test]
    fn swap_buffers_presents_current() {
        let journal: Journal = Rc::default();
        let mut registry = ContextRegistry::new();
        registry.make_current(LoggedContext::new("a", &journal));

        registry.swap_buffers(true).expect("A context is current");

        assert_eq!(*journal.borrow(), vec!["acquire a", "present-vsync a"]);
    }

    #[test]
    fn swap_buffers_with_no_current_is_invalid_state() {
        let mut registry: ContextRegistry<LoggedContext> = ContextRegistry::new();

        assert_eq!(
            registry.swap_buffers(false),
            Err(ContextError::NoCurrentContext),
            "Swap with nothing current must be an explicit error, not a crash"
        );
    }

    #[test]
    fn clear_current_releases_and_returns_handle() {
        let journal: Journal = Rc::default();
        let mut registry = ContextRegistry::new();
        registry.make_current(LoggedContext::new("a", &journal));

        let displaced = registry.clear_current();

        assert_eq!(displaced.map(|c| c.name), Some("a"));
        assert!(!registry.has_current());
        assert_eq!(*journal.borrow(), vec!["acquire a", "release a"]);
    }
}
