//! Ensures a resource directory holds every manifest file

use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::info;

use crate::config::LacConfig;
use crate::error::{Error, Result};
use crate::resources::manifest::ResourceKind;
use crate::resources::transport::Transport;

/// What a fetch pass did for each manifest entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub fetched: Vec<ResourceKind>,
    pub skipped: Vec<ResourceKind>,
}

/// Downloads missing manifest files from the remote store
pub struct ResourceFetcher<T: Transport> {
    transport: T,
    base_url: String,
    checksums: HashMap<String, String>,
    show_progress: bool,
}

impl<T: Transport> ResourceFetcher<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            checksums: HashMap::new(),
            show_progress: false,
        }
    }

    pub fn from_config(transport: T, config: &LacConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            checksums: config.checksums.clone(),
            show_progress: config.show_progress,
        }
    }

    /// Require the downloaded `kind` to hash to `sha256` (hex)
    pub fn with_checksum(mut self, kind: ResourceKind, sha256: impl Into<String>) -> Self {
        self.checksums.insert(kind.name().to_string(), sha256.into());
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create `dir` if needed and download every manifest file it lacks.
    ///
    /// Files already present are left alone and cause no request.
    pub fn ensure_resources(&self, dir: &Path) -> Result<FetchReport> {
        fs::create_dir_all(dir)?;

        let mut report = FetchReport::default();
        for kind in ResourceKind::all() {
            let local_path = kind.local_path(dir);
            if local_path.exists() {
                info!("{} already present at {:?}", kind.file_name(), local_path);
                report.skipped.push(*kind);
                continue;
            }

            self.download(*kind, dir, &local_path)?;
            report.fetched.push(*kind);
        }

        Ok(report)
    }

    fn download(&self, kind: ResourceKind, dir: &Path, local_path: &Path) -> Result<()> {
        let url = kind.remote_url(&self.base_url);
        info!("Downloading {} from {}", kind.file_name(), url);

        // Unique per download; removed on drop unless persisted.
        let part = tempfile::Builder::new()
            .prefix(&format!(".{}.", kind.file_name()))
            .suffix(PART_SUFFIX)
            .tempfile_in(dir)?;

        let bytes = self.download_to(kind, &url, part.as_file())?;
        part.persist(local_path).map_err(|e| e.error)?;
        info!("Saved {} ({} bytes)", kind.file_name(), bytes);
        Ok(())
    }

    /// Stream the remote body into `file`, returning the byte count
    fn download_to(&self, kind: ResourceKind, url: &str, file: &File) -> Result<u64> {
        let mut remote = self.transport.get(url)?;

        let progress = self.progress_bar(kind, remote.content_length);
        let (bytes, digest) = stream_into(&mut remote.body, file, &progress)?;
        file.sync_all()?;

        if let Some(expected) = self.checksums.get(kind.name()) {
            if !expected.eq_ignore_ascii_case(&digest) {
                return Err(Error::ChecksumMismatch {
                    file: kind.file_name().to_string(),
                    expected: expected.clone(),
                    actual: digest,
                });
            }
        }

        Ok(bytes)
    }

    fn progress_bar(&self, kind: ResourceKind, len: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{msg:>20} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec})",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(kind.file_name());
        bar
    }
}

/// Suffix of the hidden temporary files downloads are streamed into
const PART_SUFFIX: &str = ".part";

/// Copy `body` into `sink`, returning the byte count and SHA-256 hex digest.
///
/// The bar is cleared whether or not the copy succeeds.
fn stream_into<R: Read + ?Sized, W: Write>(
    body: &mut R,
    sink: W,
    progress: &ProgressBar,
) -> io::Result<(u64, String)> {
    let mut writer = DigestWriter::new(progress.wrap_write(sink));
    let streamed = io::copy(body, &mut writer).and_then(|bytes| Ok((bytes, writer.finish()?)));
    progress.finish_and_clear();
    streamed
}

/// Hashes everything written through it
struct DigestWriter<W: Write> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Flush and return the lowercase hex digest
    fn finish(mut self) -> io::Result<String> {
        self.inner.flush()?;
        Ok(format!("{:x}", self.hasher.finalize()))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::transport::RemoteFile;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Serves `<url> -> body` from memory and records every request
    struct FakeTransport {
        files: HashMap<String, Vec<u8>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn serving(base: &str, kinds: &[ResourceKind]) -> Self {
            let files = kinds
                .iter()
                .map(|k| (k.remote_url(base), format!("contents of {}", k).into_bytes()))
                .collect();
            Self {
                files,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<RemoteFile> {
            self.calls.borrow_mut().push(url.to_string());
            match self.files.get(url) {
                Some(body) => Ok(RemoteFile {
                    content_length: Some(body.len() as u64),
                    body: Box::new(Cursor::new(body.clone())),
                }),
                None => Err(Error::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    const BASE: &str = "http://store.test/lac";

    fn sha256_hex(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }

    fn leftover_parts(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(PART_SUFFIX))
            .collect()
    }

    /// Body that lets another fetch finish mid-stream, then drops the connection
    struct InterruptedBody {
        dir: std::path::PathBuf,
        reads: usize,
    }

    impl Read for InterruptedBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads > 1 {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
            }

            let other = ResourceFetcher::new(FakeTransport::serving(BASE, ResourceKind::all()), BASE);
            let report = other.ensure_resources(&self.dir).unwrap();
            assert_eq!(report.fetched, vec![ResourceKind::Word]);

            let chunk = b"truncated";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    struct InterruptingTransport {
        dir: std::path::PathBuf,
    }

    impl Transport for InterruptingTransport {
        fn get(&self, _url: &str) -> Result<RemoteFile> {
            Ok(RemoteFile {
                content_length: None,
                body: Box::new(InterruptedBody {
                    dir: self.dir.clone(),
                    reads: 0,
                }),
            })
        }
    }

    #[test]
    fn test_fetches_everything_into_new_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("lac");
        let fetcher = ResourceFetcher::new(FakeTransport::serving(BASE, ResourceKind::all()), BASE);

        let report = fetcher.ensure_resources(&dir).unwrap();
        assert_eq!(report.fetched, ResourceKind::all().to_vec());
        assert!(report.skipped.is_empty());

        for kind in ResourceKind::all() {
            let contents = fs::read_to_string(kind.local_path(&dir)).unwrap();
            assert_eq!(contents, format!("contents of {}", kind));
        }
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 4);
    }

    #[test]
    fn test_existing_files_issue_no_requests() {
        let tmp = tempfile::tempdir().unwrap();
        for kind in ResourceKind::all() {
            fs::write(kind.local_path(tmp.path()), "local").unwrap();
        }
        let fetcher = ResourceFetcher::new(FakeTransport::serving(BASE, ResourceKind::all()), BASE);

        let report = fetcher.ensure_resources(tmp.path()).unwrap();
        assert!(report.fetched.is_empty());
        assert!(fetcher.transport().calls.borrow().is_empty());
        assert_eq!(
            fs::read_to_string(ResourceKind::Word.local_path(tmp.path())).unwrap(),
            "local"
        );
    }

    #[test]
    fn test_only_missing_file_is_fetched() {
        let tmp = tempfile::tempdir().unwrap();
        for kind in [ResourceKind::ModelState, ResourceKind::Tag, ResourceKind::Word] {
            fs::write(kind.local_path(tmp.path()), "local").unwrap();
        }
        let fetcher = ResourceFetcher::new(FakeTransport::serving(BASE, ResourceKind::all()), BASE);

        let report = fetcher.ensure_resources(tmp.path()).unwrap();
        assert_eq!(report.fetched, vec![ResourceKind::Q2b]);
        assert_eq!(
            *fetcher.transport().calls.borrow(),
            vec![format!("{}/q2b.dic", BASE)]
        );
    }

    #[test]
    fn test_failed_download_leaves_no_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let served = [ResourceKind::ModelState, ResourceKind::Tag];
        let fetcher = ResourceFetcher::new(FakeTransport::serving(BASE, &served), BASE);

        let err = fetcher.ensure_resources(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));

        let q2b = ResourceKind::Q2b.local_path(tmp.path());
        assert!(!q2b.exists());
        assert!(leftover_parts(tmp.path()).is_empty());
        // Word comes after q2b and is never attempted.
        assert_eq!(fetcher.transport().calls.borrow().len(), 3);
    }

    #[test]
    fn test_checksum_match_and_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let tag_digest = sha256_hex(b"contents of tag");
        let fetcher = ResourceFetcher::new(FakeTransport::serving(BASE, ResourceKind::all()), BASE)
            .with_checksum(ResourceKind::Tag, tag_digest.to_uppercase())
            .with_checksum(ResourceKind::Q2b, "00ff");

        let err = fetcher.ensure_resources(tmp.path()).unwrap_err();
        match err {
            Error::ChecksumMismatch { file, expected, actual } => {
                assert_eq!(file, "q2b.dic");
                assert_eq!(expected, "00ff");
                assert_eq!(actual, sha256_hex(b"contents of q2b"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(ResourceKind::Tag.local_path(tmp.path()).exists());
        let q2b = ResourceKind::Q2b.local_path(tmp.path());
        assert!(!q2b.exists());
        assert!(leftover_parts(tmp.path()).is_empty());
    }

    #[test]
    fn test_overlapping_runs_keep_the_completed_file() {
        let tmp = tempfile::tempdir().unwrap();
        for kind in [ResourceKind::ModelState, ResourceKind::Tag, ResourceKind::Q2b] {
            fs::write(kind.local_path(tmp.path()), "local").unwrap();
        }
        let fetcher = ResourceFetcher::new(
            InterruptingTransport {
                dir: tmp.path().to_path_buf(),
            },
            BASE,
        );

        let err = fetcher.ensure_resources(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::IoError(ref e) if e.kind() == io::ErrorKind::ConnectionReset));

        assert_eq!(
            fs::read_to_string(ResourceKind::Word.local_path(tmp.path())).unwrap(),
            "contents of word"
        );
        assert!(leftover_parts(tmp.path()).is_empty());
    }

    #[test]
    fn test_progress_cleared_when_copy_fails() {
        let mut sink = Vec::new();
        let mut body = InterruptedBody {
            dir: std::path::PathBuf::new(),
            reads: 1,
        };
        let progress = ProgressBar::new(100);
        let err = stream_into(&mut body, &mut sink, &progress).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(progress.is_finished());

        let progress = ProgressBar::hidden();
        let (bytes, digest) =
            stream_into(&mut Cursor::new(b"abc".to_vec()), &mut sink, &progress).unwrap();
        assert_eq!(bytes, 3);
        assert_eq!(digest, sha256_hex(b"abc"));
        assert!(progress.is_finished());
    }
}
