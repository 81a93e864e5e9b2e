// Count extraction from catalogue HTML. The count is the number right after
// the download icon; fallback is the last integer in the icon's paragraph.

/// Class marker of the download icon element on a catalogue page.
const DOWNLOAD_ICON_MARKER: &str = "fa-download";

pub fn extract_download_count(html: &str) -> Option<u64> {
    let icon_at = html.find(DOWNLOAD_ICON_MARKER)?;

    if let Some(count) = count_after_icon(html, icon_at) {
        return Some(count);
    }
    last_number_in_paragraph(html, icon_at)
}

/// Digits in the text node between the icon's closing tag and the next
/// element. Separators like "1,234" are tolerated by keeping digits only.
fn count_after_icon(html: &str, icon_at: usize) -> Option<u64> {
    let rest = &html[icon_at..];
    let close = rest.find("</i>")?;
    let after = &rest[close + "</i>".len()..];
    let text = &after[..after.find('<').unwrap_or(after.len())];
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Last whole-number token in the paragraph containing the icon. Covers
/// markup where the count sits in a nested element instead of a bare text
/// node next to the icon.
fn last_number_in_paragraph(html: &str, icon_at: usize) -> Option<u64> {
    let start = html[..icon_at].rfind("<p")?;
    let end = icon_at + html[icon_at..].find("</p>").unwrap_or(html.len() - icon_at);
    let text = strip_tags(&html[start..end]);
    text.split_whitespace()
        .filter_map(|token| token.parse::<u64>().ok())
        .next_back()
}

/// Text content of an HTML fragment with tags removed (no entity decoding).
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
