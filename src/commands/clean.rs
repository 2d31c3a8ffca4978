//! Clean generated output

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Remove the public directory and the build data
pub fn run(folio: &Folio) -> Result<()> {
    for dir in [&folio.public_dir, &folio.data_dir] {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
            tracing::info!("Deleted: {:?}", dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_output_only() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(folio.public_dir.join("posts")).unwrap();
        fs::create_dir_all(&folio.data_dir).unwrap();
        fs::create_dir_all(&folio.content_dir).unwrap();

        run(&folio).unwrap();
        assert!(!folio.public_dir.exists());
        assert!(!folio.data_dir.exists());
        assert!(folio.content_dir.exists());

        // Cleaning twice is fine
        run(&folio).unwrap();
    }
}
