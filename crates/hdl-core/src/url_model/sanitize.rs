//! Linux-safe filename sanitization.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_` (a run of them becomes one `_`)
/// - Trims leading/trailing whitespace, dots and replacement underscores
/// - Limits length to 255 bytes
///
/// Traversal hints like `../../etc/passwd` collapse to a plain name (`etc_passwd`).
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '_');
    truncate_to_name_max(trimmed).to_string()
}

/// Keeps only the final path component, without other rewriting.
pub fn last_path_component(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    truncate_to_name_max(base).to_string()
}

fn truncate_to_name_max(s: &str) -> &str {
    if s.len() <= NAME_MAX {
        return s;
    }
    let mut take = NAME_MAX;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
