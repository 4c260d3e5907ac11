use anyhow::Result;
use cedify::{convert, preview, ConvertConfig, RewriteStatus};
use regex::Regex;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Helper function to create test files, creating parent directories as needed
fn create_test_files(dir: impl AsRef<Path>, files: &[(&str, &str)]) -> Result<()> {
    for (name, content) in files {
        let path = dir.as_ref().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn config_for(root: &Path) -> ConvertConfig {
    ConvertConfig {
        root_path: root.to_path_buf(),
        ..ConvertConfig::default()
    }
}

#[test]
fn test_price_with_cents() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("index.html", "Price: $89.99 today!")])?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert_eq!(summary.succeeded, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("index.html"))?,
        "Price: ₵89.99 today!"
    );
    Ok(())
}

#[test]
fn test_amount_then_bare_sign() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("index.html", "Cost is $5 plus $")])?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert_eq!(
        summary.results[0].status,
        RewriteStatus::Updated {
            amounts: 1,
            bare: 1
        }
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("index.html"))?,
        "Cost is ₵5 plus ₵"
    );
    Ok(())
}

#[test]
fn test_no_currency_unchanged() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("about.html", "No currency here.")])?;

    let previews = preview(&config_for(dir.path()))?;
    assert_eq!(previews.len(), 1);
    let file_preview = previews[0].1.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(file_preview.dollar_count, 0);
    assert!(file_preview.amounts.is_empty());

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert_eq!(summary.succeeded, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("about.html"))?,
        "No currency here."
    );
    Ok(())
}

#[test]
fn test_no_html_files() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("page.htm", "$1"), ("notes.txt", "$2")])?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert!(summary.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("page.htm"))?, "$1");
    assert_eq!(fs::read_to_string(dir.path().join("notes.txt"))?, "$2");
    Ok(())
}

#[test]
fn test_invalid_encoding_does_not_stop_run() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("a/good.html", "<td>$10</td>"),
            ("b/bad.html", ""),
            ("c/good.html", "<td>$20.00</td>"),
        ],
    )?;
    fs::write(dir.path().join("b/bad.html"), b"<td>\xff$10</td>")?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);

    let failed: Vec<_> = summary.failures().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].path.ends_with("b/bad.html"));
    assert!(failed[0].message().contains("Invalid UTF-8"));

    assert_eq!(
        fs::read_to_string(dir.path().join("a/good.html"))?,
        "<td>₵10</td>"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("c/good.html"))?,
        "<td>₵20.00</td>"
    );
    assert_eq!(fs::read(dir.path().join("b/bad.html"))?, b"<td>\xff$10</td>");
    Ok(())
}

#[test]
fn test_non_html_files_untouched() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("index.html", "$1"),
            ("page.htm", "$1"),
            ("page.txt", "$1"),
            ("page.html.orig", "$1"),
            ("deep/nested/dir/page.html", "$1"),
        ],
    )?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    assert_eq!(summary.total, 2);
    assert_eq!(fs::read_to_string(dir.path().join("page.htm"))?, "$1");
    assert_eq!(fs::read_to_string(dir.path().join("page.txt"))?, "$1");
    assert_eq!(fs::read_to_string(dir.path().join("page.html.orig"))?, "$1");
    assert_eq!(
        fs::read_to_string(dir.path().join("deep/nested/dir/page.html"))?,
        "₵1"
    );
    Ok(())
}

#[test]
fn test_second_run_is_a_no_op() -> Result<()> {
    let dir = tempdir()?;
    let content = "<ul><li>$5</li><li>$12.50</li><li>${price}</li><li>$$</li></ul>";
    create_test_files(&dir, &[("shop.html", content)])?;

    convert(&config_for(dir.path()), |_| {})?;
    let once = fs::read_to_string(dir.path().join("shop.html"))?;

    let summary = convert(&config_for(dir.path()), |_| {})?;
    let twice = fs::read_to_string(dir.path().join("shop.html"))?;

    assert_eq!(once, twice);
    assert_eq!(
        summary.results[0].status,
        RewriteStatus::Updated {
            amounts: 0,
            bare: 0
        }
    );
    Ok(())
}

#[test]
fn test_every_dollar_accounted_for() -> Result<()> {
    let dir = tempdir()?;
    let pages = [
        ("one.html", "<p>$1 $22 $333.33 $4444.4</p>"),
        ("two.html", "<script>let s = `${a}$`; // $$$</script>"),
        ("three.html", "<a title=\"$0.99\">$</a>"),
    ];
    create_test_files(&dir, &pages)?;

    convert(&config_for(dir.path()), |_| {})?;

    let leftover = Regex::new(r"\$\d+(?:\.\d{2})?")?;
    for (name, input) in pages {
        let output = fs::read_to_string(dir.path().join(name))?;
        assert!(!leftover.is_match(&output), "{name}: {output}");
        assert_eq!(
            output.matches('₵').count(),
            input.matches('$').count(),
            "{name}"
        );
    }
    Ok(())
}

#[test]
fn test_custom_symbol_and_extensions() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[("a.xhtml", "$3.00"), ("b.html", "$4"), ("c.htm", "$5")],
    )?;

    let config = ConvertConfig {
        symbol: "GH₵".to_string(),
        extensions: vec!["xhtml".to_string(), "htm".to_string()],
        ..config_for(dir.path())
    };
    let summary = convert(&config, |_| {})?;
    assert_eq!(summary.total, 2);
    assert_eq!(fs::read_to_string(dir.path().join("a.xhtml"))?, "GH₵3.00");
    assert_eq!(fs::read_to_string(dir.path().join("b.html"))?, "$4");
    assert_eq!(fs::read_to_string(dir.path().join("c.htm"))?, "GH₵5");
    Ok(())
}

#[test]
fn test_missing_root_aborts() {
    let dir = tempdir().unwrap();
    let result = convert(&config_for(&dir.path().join("missing")), |_| {});
    assert!(matches!(result, Err(cedify::ConvertError::Discovery { .. })));
}
