//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML, CSS and layout components to report input they recovered
//! from: skipped declarations, unsupported selectors, stray end tags.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about recovered or unsupported input (prints once per unique message)
///
/// # Example
/// ```
/// use gob_common::warning::warn_once;
///
/// warn_once("CSS", "skipped declaration 'color: 12px'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[gob {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when loading a new page)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warning_recorded_once() {
        clear_warnings();
        warn_once("Test", "unsupported selector 'a > b'");
        warn_once("Test", "unsupported selector 'a > b'");
        assert_eq!(warning_count(), 1);

        warn_once("Other", "unsupported selector 'a > b'");
        assert_eq!(warning_count(), 2, "component is part of the key");

        clear_warnings();
        assert_eq!(warning_count(), 0);
    }
}
