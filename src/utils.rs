use gloo_timers::callback::Timeout;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;

// Separators accepted when pasting a whole list at once
static ENTRY_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n,;\t]+").unwrap());

/// Split pasted text into trimmed, non-empty entries.
///
/// Newlines, commas, semicolons and tabs all separate entries, so a column
/// copied out of a spreadsheet works as well as a typed list.
///
/// # Examples
/// ```ignore
/// assert_eq!(parse_entry_list("Ali, Beatriz\nCharles"), vec!["Ali", "Beatriz", "Charles"]);
/// ```
pub fn parse_entry_list(input: &str) -> Vec<String> {
    ENTRY_SEPARATOR_REGEX
        .split(input)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run `f` after `delay_ms` of quiet, cancelling any call still pending in `slot`.
pub fn debounce<F>(slot: &RefCell<Option<Timeout>>, delay_ms: u32, f: F)
where
    F: FnOnce() + 'static,
{
    // Dropping the previous handle cancels it
    *slot.borrow_mut() = Some(Timeout::new(delay_ms, f));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_separator() {
        assert_eq!(
            parse_entry_list("Ali, Beatriz\nCharles;Diya\r\nEric\tFatima"),
            vec!["Ali", "Beatriz", "Charles", "Diya", "Eric", "Fatima"]
        );
    }

    #[test]
    fn drops_blank_items() {
        assert_eq!(parse_entry_list(" , \n\n ;  Zed  ,,"), vec!["Zed"]);
        assert!(parse_entry_list("   \n\t").is_empty());
    }

    #[test]
    fn keeps_duplicates_and_inner_spaces() {
        assert_eq!(
            parse_entry_list("Mary Ann\nMary Ann"),
            vec!["Mary Ann", "Mary Ann"]
        );
    }
}
