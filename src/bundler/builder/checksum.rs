//! Artifact checksum calculation.
//!
//! The repository requires an MD5 and a SHA-1 sibling for every staged file
//! except signatures. Both are written as bare lowercase hex digests.

use crate::bundler::{Result, error::ErrorExt};
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const BUFFER_SIZE: usize = 8192;

/// Streams `path` through `update` in 8 KiB chunks.
async fn stream_file(path: &Path, mut update: impl FnMut(&[u8])) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        update(&buffer[..n]);
    }
    Ok(())
}

/// Hex-encoded MD5 digest of a file.
pub async fn calculate_md5(path: &Path) -> Result<String> {
    let mut context = md5::Context::new();
    stream_file(path, |chunk| context.consume(chunk)).await?;
    #[allow(deprecated)]
    let digest = context.compute();
    Ok(format!("{digest:x}"))
}

/// Hex-encoded SHA-1 digest of a file.
pub async fn calculate_sha1(path: &Path) -> Result<String> {
    let mut hasher = Sha1::new();
    stream_file(path, |chunk| hasher.update(chunk)).await?;
    Ok(hex::encode(hasher.finalize()))
}

/// Writes `<path>.md5` and `<path>.sha1` next to `path` and returns their
/// paths.
///
/// Both digests are computed before anything is written. If the second write
/// fails the first sibling is removed, so a file never ends up with only one
/// checksum.
pub async fn write_checksum_files(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let md5 = calculate_md5(path).await?;
    let sha1 = calculate_sha1(path).await?;

    let md5_path = sibling(path, "md5");
    let sha1_path = sibling(path, "sha1");

    tokio::fs::write(&md5_path, md5)
        .await
        .fs_context("writing checksum", &md5_path)?;
    if let Err(e) = tokio::fs::write(&sha1_path, sha1).await {
        let _ = tokio::fs::remove_file(&md5_path).await;
        return Err(e).fs_context("writing checksum", &sha1_path);
    }

    log::debug!("checksums written for {}", path.display());
    Ok((md5_path, sha1_path))
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn digests_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(
            calculate_md5(&path).await.unwrap(),
            "5d41402abc4b2a76b9719d911017c592"
        );
        assert_eq!(
            calculate_sha1(&path).await.unwrap(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[tokio::test]
    async fn digests_span_multiple_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let data: Vec<u8> = (0..3 * BUFFER_SIZE + 17).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        assert_eq!(
            calculate_md5(&path).await.unwrap(),
            format!("{:x}", md5::compute(&data))
        );
        assert_eq!(
            calculate_sha1(&path).await.unwrap(),
            hex::encode(Sha1::digest(&data))
        );
    }

    #[tokio::test]
    async fn checksum_files_match_recomputed_digests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo-1.0.0.aar");
        std::fs::write(&path, b"binary contents").unwrap();

        let (md5_path, sha1_path) = write_checksum_files(&path).await.unwrap();

        assert_eq!(md5_path, dir.path().join("foo-1.0.0.aar.md5"));
        assert_eq!(
            std::fs::read_to_string(&md5_path).unwrap(),
            calculate_md5(&path).await.unwrap()
        );
        assert_eq!(
            std::fs::read_to_string(&sha1_path).unwrap(),
            calculate_sha1(&path).await.unwrap()
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_md5(&dir.path().join("absent")).await.is_err());
        assert!(write_checksum_files(&dir.path().join("absent")).await.is_err());
        assert!(!dir.path().join("absent.md5").exists());
    }
}
