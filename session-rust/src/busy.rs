use parking_lot::{Mutex, MutexGuard};

/// Clears an in-flight mark on a component's state when dropped.
///
/// Taken right after the mark is set and held across the service call, so a
/// caller dropping the future mid-call still leaves the component usable.
pub(crate) struct BusyGuard<'a, S, F>
where
    F: FnOnce(&mut S),
{
    state: &'a Mutex<S>,
    release: Option<F>,
}

impl<'a, S, F> BusyGuard<'a, S, F>
where
    F: FnOnce(&mut S),
{
    pub(crate) fn new(state: &'a Mutex<S>, release: F) -> Self {
        Self {
            state,
            release: Some(release),
        }
    }

    /// Clear the mark and keep the lock so the call's result can be applied
    /// in the same critical section.
    pub(crate) fn release(mut self) -> MutexGuard<'a, S> {
        let state = self.state;
        let mut guard = state.lock();
        if let Some(release) = self.release.take() {
            release(&mut *guard);
        }
        guard
    }
}

impl<S, F> Drop for BusyGuard<'_, S, F>
where
    F: FnOnce(&mut S),
{
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(&mut *self.state.lock());
        }
    }
}
