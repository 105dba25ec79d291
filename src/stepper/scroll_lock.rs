//! Page scroll surface and the lock handle the stepper holds while attached.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use tracing::debug;

/// The page the stepper lives on.
///
/// The scroll lock is page-wide state: while it is held, wheel input only
/// drives the stepper and the document itself never moves.
pub trait PageScroll: Send + Sync {
    /// Reset any accumulated scroll offset to the top of the page.
    fn scroll_to_top(&self);

    /// Enable or disable page-level scrolling.
    fn set_scroll_locked(&self, locked: bool);

    fn is_scroll_locked(&self) -> bool;
}

/// Owned handle on the page scroll lock. Dropping it releases the lock.
pub struct ScrollLockGuard {
    page: Arc<dyn PageScroll>,
}

impl ScrollLockGuard {
    pub fn acquire(page: Arc<dyn PageScroll>) -> Self {
        page.set_scroll_locked(true);
        debug!("Page scroll lock acquired");
        Self { page }
    }

    pub fn page(&self) -> &dyn PageScroll {
        self.page.as_ref()
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.page.set_scroll_locked(false);
        debug!("Page scroll lock released");
    }
}

impl std::fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLockGuard")
            .field("locked", &self.page.is_scroll_locked())
            .finish()
    }
}

/// Headless page used by the CLI driver and tests.
#[derive(Debug, Default)]
pub struct InMemoryPage {
    offset: AtomicU64,
    locked: AtomicBool,
    resets: AtomicUsize,
}

impl InMemoryPage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Native scroll; has no effect while the page is locked.
    pub fn scroll_by(&self, pixels: u64) {
        if !self.is_scroll_locked() {
            self.offset.fetch_add(pixels, Ordering::SeqCst);
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset.load(Ordering::SeqCst)
    }

    /// How many times the offset was reset by the stepper.
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl PageScroll for InMemoryPage {
    fn scroll_to_top(&self) {
        self.offset.store(0, Ordering::SeqCst);
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    fn is_scroll_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}
