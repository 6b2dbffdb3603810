use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Converts a byte count into a label in its most significant unit, for
/// instance 7500 bytes is "7 KB". Units are binary and values truncate.
pub fn size_label(bytes: u64) -> String {
    if bytes >= GB {
        format!("{} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Joins entries like `[T]::join`, but stops before the result would exceed
/// `size` columns. Gives an empty string if not even the first entry fits.
pub fn join<I, S>(entries: I, joiner: &str, size: Option<usize>) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = String::new();
    let mut length = 0;
    let joiner_length = joiner.width();

    for entry in entries {
        let entry = entry.as_ref();
        let added = if result.is_empty() {
            entry.width()
        } else {
            joiner_length + entry.width()
        };

        if size.is_some_and(|size| length + added > size) {
            break;
        }

        if !result.is_empty() {
            result.push_str(joiner);
        }

        result.push_str(entry);
        length += added;
    }

    result
}

/// Longest prefix of `text` that takes at most `max_width` terminal columns.
/// Double-width characters count as two and are dropped whole.
pub fn truncate_width(text: &str, max_width: usize) -> &str {
    let mut width = 0;

    for (index, c) in text.char_indices() {
        width += c.width().unwrap_or(0);
        if width > max_width {
            return &text[..index];
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_label_thresholds() {
        assert_eq!(size_label(0), "0 bytes");
        assert_eq!(size_label(1023), "1023 bytes");
        assert_eq!(size_label(1024), "1 KB");
        assert_eq!(size_label(1048576), "1 MB");
        assert_eq!(size_label(1073741824), "1 GB");
    }

    #[test]
    fn test_size_label_truncates() {
        assert_eq!(size_label(7500), "7 KB");
        assert_eq!(size_label(2047), "1 KB");
        assert_eq!(size_label(1048575), "1023 KB");
        assert_eq!(size_label(5 * 1073741824 + 1073741823), "5 GB");
    }

    #[test]
    fn test_join_respects_size() {
        let entries = ["This", "is", "a", "looooong", "message"];

        assert_eq!(join(entries, " ", Some(18)), "This is a looooong");
        assert_eq!(join(entries, " ", Some(17)), "This is a");
        assert_eq!(join(entries, " ", Some(2)), "");
    }

    #[test]
    fn test_join_without_size() {
        let entries = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(join(&entries, ", ", None), "a, b, c");
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello", 3), "hel");
        assert_eq!(truncate_width("hello", 5), "hello");
        assert_eq!(truncate_width("hello", 9), "hello");
        assert_eq!(truncate_width("héllo", 2), "hé");
        assert_eq!(truncate_width("hello", 0), "");
    }

    #[test]
    fn test_truncate_width_counts_wide_characters() {
        assert_eq!(truncate_width("日本語", 4), "日本");
        assert_eq!(truncate_width("日本語", 5), "日本");
        assert_eq!(truncate_width("a日b", 2), "a");
        assert_eq!(truncate_width("a日b", 3), "a日");
    }

    #[test]
    fn test_join_counts_columns() {
        assert_eq!(join(["日本", "x"], " ", Some(5)), "日本");
        assert_eq!(join(["日本", "x"], " ", Some(6)), "日本 x");
    }
}
