//! Fires a callback when a value changes between renders.

use spin::Mutex;

use crate::{EqualityMode, Host, HostError, ShallowEq};

/// Remembers the last value it saw and reports shallow changes.
///
/// ```rust
/// use oxide_viewmodel::ChangeNotifier;
///
/// let mut notifier = ChangeNotifier::new(1);
/// assert!(!notifier.observe(1, |_, _| unreachable!()));
/// assert!(notifier.observe(2, |prev, next| assert_eq!((*prev, *next), (1, 2))));
/// assert_eq!(*notifier.previous(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ChangeNotifier<T> {
    previous: T,
    mode: EqualityMode,
}

impl<T: ShallowEq> ChangeNotifier<T> {
    pub fn new(initial: T) -> Self {
        Self::with_mode(initial, EqualityMode::default())
    }

    pub fn with_mode(initial: T, mode: EqualityMode) -> Self {
        Self {
            previous: initial,
            mode,
        }
    }

    /// Compare `next` with the remembered value. When they differ, call
    /// `callback(previous, next)` and remember `next`; otherwise keep the old
    /// value. Returns whether the callback ran.
    pub fn observe<F>(&mut self, next: T, callback: F) -> bool
    where
        F: FnOnce(&T, &T),
    {
        if self.previous.shallow_eq_in(&next, self.mode) {
            return false;
        }
        callback(&self.previous, &next);
        self.previous = next;
        true
    }

    pub fn previous(&self) -> &T {
        &self.previous
    }
}

/// Per-component [`ChangeNotifier`] kept in a persistent host slot.
///
/// The first render seeds the notifier with `props`; each later render calls
/// `callback(previous, props)` when `props` changed under [`EqualityMode::Legacy`].
/// Returns whether the callback ran.
pub fn use_derived_props<H, T, F>(host: &mut H, props: T, callback: F) -> Result<bool, HostError>
where
    H: Host,
    T: ShallowEq + Clone + Send + 'static,
    F: FnOnce(&T, &T),
{
    let notifier = host.persistent(|| Mutex::new(ChangeNotifier::new(props.clone())))?;
    let changed = notifier.lock().observe(props, callback);
    Ok(changed)
}
