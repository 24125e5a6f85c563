//! Bounded previews of tool output
//!
//! Hook hosts inject context into a prompt, so multi-page tool output
//! needs a short preview alongside the full text. The summary is a pure
//! function of the output and never truncates mid-line.

/// Lines kept before the output is elided.
const MAX_LINES: usize = 5;

/// Compress multi-line output into a bounded preview.
///
/// Trims surrounding whitespace; output of `MAX_LINES` lines or fewer is
/// returned unchanged, anything longer keeps the first `MAX_LINES` lines
/// followed by `... (<k> more lines)`.
pub fn summarize(output: &str) -> String {
    let trimmed = output.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() <= MAX_LINES {
        return trimmed.to_string();
    }
    let shown = lines[..MAX_LINES].join("\n");
    format!("{}\n... ({} more lines)", shown, lines.len() - MAX_LINES)
}
