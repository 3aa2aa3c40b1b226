use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::domain::PublishResult;

/// Append a markdown run summary (e.g. a CI step summary file).
pub fn append(path: &Path, title: &str, result: &PublishResult) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "## ✅ New post published")?;
    writeln!(file, "- **Title:** {}", title)?;
    writeln!(file, "- **URL:** {}", result.post_url)?;
    writeln!(file, "- **Image:** {}", result.image_url)?;
    writeln!(file)?;
    Ok(())
}
