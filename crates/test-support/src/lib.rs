use tempfile::TempDir;

/// Creates a temp directory that lives for the duration of a test.
pub fn temp_dir(prefix: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("failed to create temp dir")
}
