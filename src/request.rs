//! Interprets the positional words of the command line.

/// What part of the display should be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureRequest {
    /// The whole root window.
    Screen,
    /// The rectangle anchored at two monitors, both indices inclusive.
    Monitors {
        /// The monitor providing the top-left corner.
        start: i64,
        /// The monitor providing the bottom-right corner.
        end: i64,
    },
    /// A region drawn by the user.
    Draw,
}

/// The index of a bound that was not given.
const UNSET: i64 = -1;

impl CaptureRequest {
    /// Scans the words for `start N`, `end N` and `draw`, in any order.
    ///
    /// A bound that is missing or `-1` takes the value of the other one.
    pub(crate) fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        if words.is_empty() {
            return Self::Screen;
        }

        let mut start = UNSET;
        let mut end = UNSET;

        let mut words = words.iter().map(AsRef::as_ref);
        while let Some(word) = words.next() {
            match word {
                "draw" => return Self::Draw,
                "start" => start = atoi(words.next().unwrap_or_default()),
                "end" => end = atoi(words.next().unwrap_or_default()),
                _ => {}
            }
        }

        if end == UNSET {
            end = start;
        }
        if start == UNSET {
            start = end;
        }

        Self::Monitors { start, end }
    }
}

/// Reads a leading, optionally signed, decimal number and falls back to zero.
fn atoi(word: &str) -> i64 {
    let word = word.trim_start();
    let (negative, digits) = match word.as_bytes().first() {
        Some(b'-') => (true, &word[1..]),
        Some(b'+') => (false, &word[1..]),
        _ => (false, word),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(words: &[&str]) -> CaptureRequest {
        CaptureRequest::from_words(words)
    }

    #[test]
    fn no_words_captures_the_screen() {
        assert_eq!(parse(&[]), CaptureRequest::Screen);
    }

    #[test]
    fn start_alone_fills_end() {
        assert_eq!(
            parse(&["start", "1"]),
            CaptureRequest::Monitors { start: 1, end: 1 }
        );
    }

    #[test]
    fn end_alone_fills_start() {
        assert_eq!(
            parse(&["end", "2"]),
            CaptureRequest::Monitors { start: 2, end: 2 }
        );
    }

    #[test]
    fn bounds_are_order_independent() {
        assert_eq!(
            parse(&["end", "3", "start", "1"]),
            CaptureRequest::Monitors { start: 1, end: 3 }
        );
        assert_eq!(
            parse(&["start", "1", "end", "3"]),
            CaptureRequest::Monitors { start: 1, end: 3 }
        );
    }

    #[test]
    fn unparsable_numbers_are_zero() {
        assert_eq!(
            parse(&["start", "abc", "end", "2x"]),
            CaptureRequest::Monitors { start: 0, end: 2 }
        );
        assert_eq!(
            parse(&["start"]),
            CaptureRequest::Monitors { start: 0, end: 0 }
        );
    }

    #[test]
    fn minus_one_is_unset() {
        assert_eq!(
            parse(&["start", "1", "end", "-1"]),
            CaptureRequest::Monitors { start: 1, end: 1 }
        );
        assert_eq!(
            parse(&["start", "-1", "end", "2"]),
            CaptureRequest::Monitors { start: 2, end: 2 }
        );
        assert_eq!(
            parse(&["start", "-1"]),
            CaptureRequest::Monitors { start: -1, end: -1 }
        );
    }

    #[test]
    fn other_negative_numbers_are_kept() {
        assert_eq!(
            parse(&["start", "-2", "end", "1"]),
            CaptureRequest::Monitors { start: -2, end: 1 }
        );
    }

    #[test]
    fn draw_wins() {
        assert_eq!(parse(&["start", "0", "draw"]), CaptureRequest::Draw);
    }

    #[test]
    fn unknown_words_leave_both_bounds_unset() {
        assert_eq!(
            parse(&["whatever"]),
            CaptureRequest::Monitors { start: -1, end: -1 }
        );
    }

    #[test]
    fn atoi_reads_leading_digits() {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi("  7up"), 7);
        assert_eq!(atoi("+5"), 5);
        assert_eq!(atoi("-"), 0);
        assert_eq!(atoi(""), 0);
    }
}
