/// Strip byte-order marks and zero-width characters, collapse runs of
/// whitespace and trim. Blank input becomes `None`.
pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
