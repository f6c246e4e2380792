use rust_decimal::Decimal;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Largest scroll offset that still fills a page of `page` rows.
pub(crate) fn max_scroll(len: usize, page: usize) -> usize {
    len.saturating_sub(page.max(1))
}

/// Scroll a read-only list down by one page.
pub(crate) fn page_down(scroll: &mut usize, len: usize, page: usize) {
    *scroll = (*scroll + page.max(1)).min(max_scroll(len, page));
}

/// Scroll a read-only list up by one page.
pub(crate) fn page_up(scroll: &mut usize, page: usize) {
    *scroll = scroll.saturating_sub(page.max(1));
}

/// Clamp a scroll offset after the list shrank or the page grew.
pub(crate) fn clamp_scroll(scroll: &mut usize, len: usize, page: usize) {
    *scroll = (*scroll).min(max_scroll(len, page));
}
