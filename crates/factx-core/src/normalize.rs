//! Flattening of multi-line recognized text into a single line.

/// Trim every line, drop the ones left empty, and join the rest with a
/// single space, preserving order.
pub fn normalize<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flattened = String::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if !flattened.is_empty() {
            flattened.push(' ');
        }
        flattened.push_str(line);
    }
    flattened
}

/// Split raw recognized text on line breaks and flatten it.
pub fn normalize_text(text: &str) -> String {
    normalize(text.lines())
}
