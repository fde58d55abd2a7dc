//! Line sanitizer
//!
//! Some firmwares and USB-serial bridges prepend or append stray bytes to a
//! record. Only the outermost `{...}` span of a line is trusted; everything
//! outside it is noise.

/// Extract the outermost balanced-delimiter record span from a raw line.
///
/// Returns `None` when the line holds no recoverable record (no opening
/// brace, no closing brace, or a closing brace before the first opening one).
pub fn extract_record(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
