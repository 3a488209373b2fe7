//! Call-site capture for the `caller` valuer
//!
//! Tracked entry points record `Location::caller()` on a thread-local stack
//! for the duration of the call. Because the stack only lives while a guard
//! is held, a valuer evaluated during emission sees the site of the logging
//! call, not the site where its context was built.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;

thread_local! {
    static CALL_SITES: RefCell<Vec<&'static Location<'static>>> = const { RefCell::new(Vec::new()) };
}

/// A source location rendered as `file.rs:line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    /// File name without its directory
    pub fn short_file(&self) -> &'static str {
        let idx = self.file.rfind(['/', '\\']).map_or(0, |i| i + 1);
        &self.file[idx..]
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Pops its call site when dropped.
#[must_use = "the call site is forgotten as soon as the guard is dropped"]
pub struct CallSiteGuard {
    // guards must be dropped on the thread that pushed them
    _not_send: PhantomData<*const ()>,
}

impl Drop for CallSiteGuard {
    fn drop(&mut self) {
        CALL_SITES.with(|sites| {
            sites.borrow_mut().pop();
        });
    }
}

/// Record the caller's location until the returned guard is dropped.
#[track_caller]
pub fn enter() -> CallSiteGuard {
    let location = Location::caller();
    CALL_SITES.with(|sites| sites.borrow_mut().push(location));
    CallSiteGuard {
        _not_send: PhantomData,
    }
}

/// Like [`enter`], but only when no call site is recorded on this thread.
#[track_caller]
pub fn enter_if_untracked() -> Option<CallSiteGuard> {
    if CALL_SITES.with(|sites| sites.borrow().is_empty()) {
        Some(enter())
    } else {
        None
    }
}

/// Call site `depth` entries below the innermost one on this thread.
pub fn current(depth: usize) -> Option<CallSite> {
    CALL_SITES.with(|sites| {
        let sites = sites.borrow();
        let idx = sites.len().checked_sub(depth + 1)?;
        Some(CallSite::from(sites[idx]))
    })
}
