//! Progress reporting for long-running loops, wrapping [indicatif]

use indicatif::{ProgressBar, ProgressStyle};

/// Returns a progress bar over `len` steps in the crate's common style.
///
/// Falls back to indicatif's default style if the template fails to parse.
pub fn get_progressbar(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:>12.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    ProgressBar::new(len).with_style(style)
}
