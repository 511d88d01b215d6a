//! Form state controller.
//!
//! A [`FormState`] owns the raw values of one form instance and its
//! `submitting` flag. The flag is raised by [`FormState::begin_submit`] and
//! released when the returned [`BusyGuard`] drops, so every exit path of a
//! submission (success, validation failure, backend error, or an early `?`)
//! clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::forms::FormSchema;

/// Shared boolean raised while an operation is in flight.
///
/// Clones observe the same flag, so a view can hold one to drive a disabled
/// submit control or a loading spinner.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// New lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a guard is alive.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raise the flag, or return `None` when it is already raised.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: Arc::clone(&self.0),
            })
    }
}

/// Lowers its [`BusyFlag`] on drop.
#[derive(Debug)]
#[must_use = "the flag is lowered as soon as the guard is dropped"]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Values and submitting state of one form instance.
///
/// Values live behind a mutex that is never held across an `.await`, so the
/// view can keep editing while a submission is suspended.
#[derive(Debug, Default)]
pub struct FormState<F> {
    values: Mutex<F>,
    submitting: BusyFlag,
}

impl<F> FormState<F>
where
    F: FormSchema,
{
    /// Form with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_values(F::default())
    }

    /// Form pre-filled with `values`.
    #[must_use]
    pub fn with_values(values: F) -> Self {
        Self {
            values: Mutex::new(values),
            submitting: BusyFlag::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, F> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current values.
    #[must_use]
    pub fn values(&self) -> F {
        self.lock().clone()
    }

    /// Replace every value.
    pub fn set_values(&self, values: F) {
        *self.lock() = values;
    }

    /// Edit values in place, e.g. from a field change handler.
    pub fn update(&self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.lock());
    }

    /// True once any field differs from its default.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        *self.lock() != F::default()
    }

    /// True while a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    /// Handle on the submitting flag for observers.
    #[must_use]
    pub fn submitting_flag(&self) -> BusyFlag {
        self.submitting.clone()
    }

    /// Raise `submitting`. Returns `None` if a submission is already running.
    pub fn begin_submit(&self) -> Option<BusyGuard> {
        self.submitting.try_acquire()
    }

    /// Restore every field to its default.
    pub fn reset(&self) {
        *self.lock() = F::default();
    }
}

#[cfg(test)]
mod tests {
    //! Form state controller coverage.

    use super::*;
    use crate::domain::forms::ApplicationFormValues;
    use rstest::rstest;

    #[rstest]
    fn starts_clean_and_idle() {
        let form = FormState::<ApplicationFormValues>::new();
        assert!(!form.is_dirty());
        assert!(!form.is_submitting());
        assert!(form.can_submit());
    }

    #[rstest]
    fn edits_mark_the_form_dirty_until_reset() {
        let form = FormState::<ApplicationFormValues>::new();
        form.update(|values| values.email = "ada@example.com".to_owned());
        assert!(form.is_dirty());

        form.reset();
        assert!(!form.is_dirty());
        assert_eq!(form.values(), ApplicationFormValues::default());
    }

    #[rstest]
    fn guard_blocks_second_submit_and_releases_on_drop() {
        let form = FormState::<ApplicationFormValues>::new();
        let observer = form.submitting_flag();

        let guard = form.begin_submit().expect("first submit");
        assert!(observer.is_set());
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());

        drop(guard);
        assert!(!observer.is_set());
        assert!(form.begin_submit().is_some());
    }

    #[rstest]
    fn guard_releases_on_early_return() {
        fn fails_midway(form: &FormState<ApplicationFormValues>) -> Result<(), &'static str> {
            let _guard = form.begin_submit().ok_or("busy")?;
            Err("backend unavailable")
        }

        let form = FormState::<ApplicationFormValues>::new();
        assert_eq!(fails_midway(&form), Err("backend unavailable"));
        assert!(!form.is_submitting());
    }
}
