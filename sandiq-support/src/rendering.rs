//! Text rendering utilities for human-friendly error messages.
//!
//! Shortens Rust type names for display and proposes "did you mean?"
//! candidates for identifiers that failed to resolve.

/// Shortens a fully qualified type name for display.
///
/// ```
/// use sandiq_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::db::Pool"), "Pool");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (i, ch) in full_name.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            out.push_str(last_path_segment(&full_name[segment_start..i]));
            out.push(ch);
            segment_start = i + ch.len_utf8();
        }
    }

    out.push_str(last_path_segment(&full_name[segment_start..]));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Suggests labels from `available` that look like `requested`.
///
/// Candidates are ranked: substring matches first, then near-misses
/// (typos), then labels sharing a prefix of at least three characters.
/// At most `max_suggestions` labels are returned, best first.
///
/// ```
/// use sandiq_support::rendering::suggest_similar;
///
/// let found = suggest_similar("databse", &["database", "logger", "cache"], 3);
/// assert_eq!(found, vec!["database".to_string()]);
/// ```
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let wanted = requested.to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&label| {
            let candidate = label.to_lowercase();
            if candidate.is_empty() {
                return None;
            }

            if candidate.contains(&wanted) || wanted.contains(&candidate) {
                return Some((label, 100));
            }

            if roughly_equal(&wanted, &candidate) {
                return Some((label, 60));
            }

            let prefix = candidate
                .chars()
                .zip(wanted.chars())
                .take_while(|(a, b)| a == b)
                .count();
            (prefix >= 3).then_some((label, prefix * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored.dedup_by(|a, b| a.0 == b.0);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Quick typo heuristic: lengths within two characters and at least
/// 60% of positions agree.
fn roughly_equal(a: &str, b: &str) -> bool {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    if a_len.abs_diff(b_len) > 2 {
        return false;
    }

    let same = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    same * 100 / a_len.max(b_len) >= 60
}
