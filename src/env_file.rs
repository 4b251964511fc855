use std::fs;
use std::io;
use std::path::Path;

/// Rewrite `path` so it carries exactly one `key=value` line.
///
/// An existing line for `key` is replaced in place; otherwise the line is
/// appended. A missing file is created. Every other line survives unchanged
/// and in order. The rewrite is whole-file and unlocked, so concurrent
/// writers are last-one-wins.
pub fn set_key(path: &Path, key: &str, value: &str) -> io::Result<()> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err),
    };

    let prefix = format!("{}=", key);
    let mut lines = Vec::new();
    let mut replaced = false;
    for line in contents.lines() {
        if line.starts_with(&prefix) {
            lines.push(format!("{}{}", prefix, value));
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(format!("{}{}", prefix, value));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    fs::write(path, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "GOOGLE_ADS_REFRESH_TOKEN";

    #[test]
    fn replaces_the_existing_line_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "GOOGLE_ADS_CLIENT_ID=abc\nGOOGLE_ADS_REFRESH_TOKEN=old\nGOOGLE_ADS_CUSTOMER_ID=123\n",
        )
        .unwrap();

        set_key(&path, KEY, "new").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "GOOGLE_ADS_CLIENT_ID=abc\nGOOGLE_ADS_REFRESH_TOKEN=new\nGOOGLE_ADS_CUSTOMER_ID=123\n",
        );
    }

    #[test]
    fn appends_when_the_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "GOOGLE_ADS_CLIENT_ID=abc\n").unwrap();

        set_key(&path, KEY, "token").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "GOOGLE_ADS_CLIENT_ID=abc\nGOOGLE_ADS_REFRESH_TOKEN=token\n",
        );
    }

    #[test]
    fn creates_the_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        set_key(&path, KEY, "token").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "GOOGLE_ADS_REFRESH_TOKEN=token\n",
        );
    }

    #[test]
    fn a_key_that_only_shares_a_prefix_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "GOOGLE_ADS_REFRESH_TOKEN_BACKUP=keep\n").unwrap();

        set_key(&path, KEY, "token").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "GOOGLE_ADS_REFRESH_TOKEN_BACKUP=keep\nGOOGLE_ADS_REFRESH_TOKEN=token\n",
        );
    }
}
