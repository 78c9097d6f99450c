//! Dark-mode derivation.
//!
//! The stored mode name and the ambient appearance both carry inverted
//! sense relative to their natural meaning: a saved `"light"` turns dark
//! mode ON, and an ambient dark preference turns it OFF. The write-back
//! inverts the same way, so the pair stays self-consistent across restarts.
//! This mirrors the behavior the client has always had.

pub const LIGHT: &str = "light";
pub const DARK: &str = "dark";

/// Derive the initial dark-mode flag from the saved preference, falling back
/// to the host's ambient appearance, falling back to dark mode on.
pub fn initial_dark_mode(saved: Option<&str>, ambient_prefers_dark: Option<bool>) -> bool {
    match saved {
        Some(name) => name == LIGHT,
        None => match ambient_prefers_dark {
            Some(prefers_dark) => !prefers_dark,
            None => true,
        },
    }
}

/// The mode name to persist after a dark-mode change.
pub fn stored_name(dark_mode: bool) -> &'static str {
    if dark_mode {
        LIGHT
    } else {
        DARK
    }
}
