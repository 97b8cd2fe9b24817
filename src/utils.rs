/// Formats bytes as uppercase hexadecimal pairs separated by spaces.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a pattern index with its table name, e.g. `2 (Strobe)`.
pub(crate) fn format_pattern(index: u8, name: &str) -> String {
    format!("{index} ({name})")
}
