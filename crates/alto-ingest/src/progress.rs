//! Progress display for collection conversion

use indicatif::{ProgressBar, ProgressStyle};

const ENTRY_TEMPLATE: &str = concat!(
    "{msg}\n",
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} entries ({eta})",
);

/// Progress bar counting processed metadata entries
///
/// The length is set once the metadata archive has been opened. A hidden bar
/// is returned when `visible` is false.
pub fn create_entry_progress(collection_id: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template(ENTRY_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(format!("Converting {}", collection_id));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_template_is_valid() {
        assert!(ProgressStyle::default_bar().template(ENTRY_TEMPLATE).is_ok());
    }

    #[test]
    fn test_create_entry_progress() {
        let pb = create_entry_progress("0002645", true);
        pb.set_length(12);
        pb.inc(3);
        assert_eq!(pb.length(), Some(12));
        assert_eq!(pb.position(), 3);
        assert_eq!(pb.message(), "Converting 0002645");
    }

    #[test]
    fn test_hidden_progress() {
        let pb = create_entry_progress("0002645", false);
        assert!(pb.is_hidden());
    }
}
