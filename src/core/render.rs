use std::fmt::Display;

use crate::core::rank::Rank;

/// The header line, without surrounding newlines.
pub fn header(rank: Rank, timestamp: &str) -> String {
    format!("MPI rank: {rank} [timestamp: {timestamp}]")
}

/// Renders values the way `print!` would with the given separator and terminator.
pub fn render_values(values: &[&dyn Display], sep: &str, end: &str) -> String {
    let mut body = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            body.push_str(sep);
        }
        body.push_str(&value.to_string());
    }
    body.push_str(end);
    body
}

/// Removes one space after every newline.
///
/// `"\n  x"` becomes `"\n x"`: only the first space of an indented line goes.
pub fn strip_continuation_space(text: &str) -> String {
    text.replace("\n ", "\n")
}

/// Assembles the full block: blank line, header, blank line, body.
pub fn render_block(
    rank: Rank,
    timestamp: &str,
    values: &[&dyn Display],
    sep: &str,
    end: &str,
    strip: bool,
) -> String {
    let block = format!(
        "\n{}\n\n{}",
        header(rank, timestamp),
        render_values(values, sep, end)
    );
    if strip {
        strip_continuation_space(&block)
    } else {
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(
            header(3, "2023-02-02 20:48:26.544420"),
            "MPI rank: 3 [timestamp: 2023-02-02 20:48:26.544420]"
        );
    }

    #[test]
    fn test_render_values_defaults() {
        assert_eq!(render_values(&[&"a", &1, &2.5], " ", "\n"), "a 1 2.5\n");
    }

    #[test]
    fn test_render_values_custom_sep_and_end() {
        assert_eq!(render_values(&[&"a", &"b"], "-", ""), "a-b");
        assert_eq!(render_values(&[], " ", "\n"), "\n");
    }

    #[test]
    fn test_strip_single_space() {
        assert_eq!(strip_continuation_space("a\n b\n  c\nd"), "a\nb\n c\nd");
        assert_eq!(strip_continuation_space(" leading"), " leading");
    }

    #[test]
    fn test_block_layout() {
        let block = render_block(0, "TS", &[&"hello"], " ", "\n", true);
        assert_eq!(block, "\nMPI rank: 0 [timestamp: TS]\n\nhello\n");
    }

    #[test]
    fn test_block_strips_inside_multiline_values() {
        let block = render_block(1, "TS", &[&"first\n", &"second"], " ", "\n", true);
        assert_eq!(block, "\nMPI rank: 1 [timestamp: TS]\n\nfirst\nsecond\n");

        let raw = render_block(1, "TS", &[&"first\n", &"second"], " ", "\n", false);
        assert_eq!(raw, "\nMPI rank: 1 [timestamp: TS]\n\nfirst\n second\n");
    }
}
