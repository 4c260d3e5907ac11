use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Renders a unified diff between the current and converted content
pub fn unified_diff(file_path: &Path, old_content: &str, new_content: &str) -> String {
    let diff = TextDiff::from_lines(old_content, new_content);
    let name = file_path.display().to_string();
    diff.unified_diff()
        .context_radius(3)
        .header(&name, &name)
        .to_string()
}

/// Number of lines the conversion would change
pub fn changed_line_count(old_content: &str, new_content: &str) -> usize {
    TextDiff::from_lines(old_content, new_content)
        .iter_all_changes()
        .filter(|change| change.tag() == ChangeTag::Delete)
        .count()
}

/// Prints a unified diff showing what the conversion would do
pub fn print_unified_diff(file_path: &Path, old_content: &str, new_content: &str) {
    print!("{}", unified_diff(file_path, old_content, new_content));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_marks_changed_lines() {
        let old = "<h1>Shop</h1>\n<p>$5</p>\n<p>Free</p>\n";
        let new = "<h1>Shop</h1>\n<p>₵5</p>\n<p>Free</p>\n";
        let diff = unified_diff(Path::new("shop.html"), old, new);

        assert!(diff.starts_with("--- shop.html\n+++ shop.html\n"));
        assert!(diff.contains("-<p>$5</p>\n"));
        assert!(diff.contains("+<p>₵5</p>\n"));
        assert!(diff.contains(" <h1>Shop</h1>\n"));
        assert_eq!(changed_line_count(old, new), 1);
    }

    #[test]
    fn test_no_diff_when_unchanged() {
        let text = "No currency here.\n";
        assert_eq!(unified_diff(Path::new("a.html"), text, text), "");
        assert_eq!(changed_line_count(text, text), 0);
    }
}
