//! Human-readable progress text.

/// Formats `n` with `,` between groups of three digits (`1234567` → `1,234,567`).
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Progress text without line control.
pub fn progress_line(bytes: u64) -> String {
    format!("Downloaded: {} bytes", format_thousands(bytes))
}

/// In-place render: ends with a carriage return so whatever is written next starts at
/// column 0, whether or not the output is a terminal.
pub fn in_place(bytes: u64) -> String {
    format!("{}\r", progress_line(bytes))
}

/// Last render of an operation: terminates the line.
pub fn final_line(bytes: u64) -> String {
    format!("{}\n", progress_line(bytes))
}
