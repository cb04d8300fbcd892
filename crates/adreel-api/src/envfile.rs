//! Editing `KEY=value` env files in place.

use std::io;
use std::path::Path;

/// Set `key=value` in env-file text, replacing the first existing
/// assignment of `key` (commented-out lines are left alone) or appending one.
pub fn upsert_var(contents: &str, key: &str, value: &str) -> String {
    let prefix = format!("{}=", key);
    let assignment = format!("{}{}", prefix, value);

    let mut replaced = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            if !replaced && line.trim_start().starts_with(&prefix) {
                replaced = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(assignment);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Apply [`upsert_var`] to a file, creating it when missing.
pub fn upsert_var_in_file(path: &Path, key: &str, value: &str) -> io::Result<()> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    std::fs::write(path, upsert_var(&contents, key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing_line() {
        let before = "TL_API_KEY=tlk_abc\nTL_INDEX_ID=old\nAPI_PORT=8000\n";
        let after = upsert_var(before, "TL_INDEX_ID", "idx_new");
        assert_eq!(after, "TL_API_KEY=tlk_abc\nTL_INDEX_ID=idx_new\nAPI_PORT=8000\n");
    }

    #[test]
    fn test_appends_when_missing() {
        let after = upsert_var("TL_API_KEY=tlk_abc", "TL_INDEX_ID", "idx_new");
        assert_eq!(after, "TL_API_KEY=tlk_abc\nTL_INDEX_ID=idx_new\n");
        assert_eq!(upsert_var("", "TL_INDEX_ID", "x"), "TL_INDEX_ID=x\n");
    }

    #[test]
    fn test_commented_line_untouched() {
        let after = upsert_var("# TL_INDEX_ID=example\n", "TL_INDEX_ID", "idx_new");
        assert_eq!(after, "# TL_INDEX_ID=example\nTL_INDEX_ID=idx_new\n");
    }

    #[test]
    fn test_file_created_and_updated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.local");

        upsert_var_in_file(&path, "TL_INDEX_ID", "idx_1").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "TL_INDEX_ID=idx_1\n");

        upsert_var_in_file(&path, "TL_INDEX_ID", "idx_2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "TL_INDEX_ID=idx_2\n");
    }
}
