//! Progress bars for per-item page loops.
//!
//! Bars draw to stderr and hide themselves when stderr is not a terminal,
//! so piped output and tests stay clean.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg:>10} {percent:>3}%|{bar:40}| {pos}/{len} [{elapsed_precise}<{eta_precise}]";

/// Create a bar over `len` items labelled `label`.
pub fn item_bar(len: usize, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    bar.set_message(label.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_bar_length() {
        let bar = item_bar(3, "pep");
        bar.inc(1);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 1);
        bar.finish_and_clear();
    }
}
