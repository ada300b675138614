//! Save-to-file and share-as-blob delivery of an assembled report.
//!
//! Both paths go through the same [`DocumentAssembler`], so a saved
//! file and a shared blob for one record are byte-identical. The
//! platform side (file save, share sheet, user notifications) sits
//! behind the [`DownloadSink`], [`ShareSink`] and [`Notifier`] traits.

use std::fs;
use std::path::{Path, PathBuf};

use super::assembler::DocumentAssembler;
use super::input::ReportInput;
use super::layout::ReportConfig;
use crate::error::{Error, Result};

/// MIME type of every exported document.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// In-memory PDF without a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfBlob {
    bytes: Vec<u8>,
}

impl PdfBlob {
    /// Wrap serialized PDF bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Always `application/pdf`.
    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    /// Document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the document bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn filename_part(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// `Dermatology_Report_{reportId}_{patientName}.pdf` with whitespace
/// removed from both parts.
///
/// A missing or blank patient name becomes `patient`.
pub fn report_filename(input: &ReportInput) -> String {
    let name = filename_part(input.patient.name.as_deref().unwrap_or(""));
    let name = if name.is_empty() { "patient".to_string() } else { name };
    format!("Dermatology_Report_{}_{}.pdf", filename_part(&input.report_id), name)
}

/// How the caller wants the document delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Hand the file to a [`DownloadSink`]
    #[default]
    Save,
    /// Return the bytes to the caller
    Blob,
}

/// Per-call export switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Delivery mode
    pub mode: ExportMode,
    /// Embed the record's lesion image
    pub embed_image: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mode: ExportMode::Save,
            embed_image: true,
        }
    }
}

/// Result of [`ExportAdapter::export`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    /// Written by the download sink
    Saved(PathBuf),
    /// Returned to the caller
    Blob(PdfBlob),
}

/// Receives a finished file.
pub trait DownloadSink {
    /// Store `blob` under `filename`; returns where it went.
    fn download(&self, filename: &str, blob: &PdfBlob) -> Result<PathBuf>;
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    /// Save into `dir`, creating it when needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileDownloadSink {
    fn download(&self, filename: &str, blob: &PdfBlob) -> Result<PathBuf> {
        let plain = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if !plain {
            return Err(Error::InvalidInput(format!("not a plain file name: {:?}", filename)));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, blob.bytes())?;
        log::info!("Saved {} ({} bytes)", path.display(), blob.len());
        Ok(path)
    }
}

/// Why a native share did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// The user dismissed the dialog
    #[error("share cancelled")]
    Cancelled,
    /// The platform reported a failure
    #[error("share failed: {0}")]
    Failed(String),
}

/// Native share capability of the platform.
pub trait ShareSink {
    /// Whether the platform can share files at all.
    fn is_supported(&self) -> bool;

    /// Offer `blob` as `filename` to the share dialog.
    fn share(&self, filename: &str, blob: &PdfBlob) -> std::result::Result<(), ShareError>;
}

/// How a share request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the share dialog
    Shared,
    /// No native sharing; the same document was downloaded instead
    FellBackToDownload(PathBuf),
    /// Dismissed by the user
    Cancelled,
    /// The dialog failed; already reported through the notifier
    Failed(String),
}

impl ShareOutcome {
    /// Treat [`ShareOutcome::Failed`] as an error.
    pub fn into_result(self) -> Result<ShareOutcome> {
        match self {
            ShareOutcome::Failed(reason) => Err(Error::Share(reason)),
            other => Ok(other),
        }
    }
}

/// User-facing messages about export progress.
pub trait Notifier {
    /// Something finished.
    fn success(&self, message: &str);
    /// Something degraded or was skipped.
    fn info(&self, message: &str);
    /// Something went wrong.
    fn error(&self, message: &str);
}

/// Sends notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

/// Delivers reports in either export mode.
pub struct ExportAdapter {
    assembler: DocumentAssembler,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for ExportAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportAdapter")
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

impl Default for ExportAdapter {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl ExportAdapter {
    /// Create an adapter that notifies through [`LogNotifier`].
    pub fn new(config: ReportConfig) -> Self {
        Self {
            assembler: DocumentAssembler::new(config),
            notifier: Box::new(LogNotifier),
        }
    }

    /// Replace the notifier.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Underlying assembler.
    pub fn assembler(&self) -> &DocumentAssembler {
        &self.assembler
    }

    fn require<'a>(&self, input: Option<&'a ReportInput>) -> Result<&'a ReportInput> {
        input.ok_or_else(|| {
            self.notifier.error("No report data available");
            Error::MissingInput("no report record".to_string())
        })
    }

    fn assemble(&self, input: &ReportInput, embed_image: bool) -> Result<PdfBlob> {
        self.assembler
            .assemble(input, embed_image)
            .map(|report| PdfBlob::new(report.bytes))
            .map_err(|err| {
                self.notifier.error(&format!("Failed to generate report: {}", err));
                err
            })
    }

    /// Assemble `input` and deliver it according to `options`.
    pub fn export(
        &self,
        input: Option<&ReportInput>,
        options: ExportOptions,
        sink: &dyn DownloadSink,
    ) -> Result<ExportOutput> {
        let input = self.require(input)?;
        let blob = self.assemble(input, options.embed_image)?;
        match options.mode {
            ExportMode::Blob => Ok(ExportOutput::Blob(blob)),
            ExportMode::Save => self.deliver(input, &blob, sink).map(ExportOutput::Saved),
        }
    }

    /// Save mode shortcut.
    pub fn save(&self, input: Option<&ReportInput>, embed_image: bool, sink: &dyn DownloadSink) -> Result<PathBuf> {
        let input = self.require(input)?;
        let blob = self.assemble(input, embed_image)?;
        self.deliver(input, &blob, sink)
    }

    fn deliver(&self, input: &ReportInput, blob: &PdfBlob, sink: &dyn DownloadSink) -> Result<PathBuf> {
        let path = self.download(&report_filename(input), blob, sink)?;
        self.notifier.success("Report downloaded");
        Ok(path)
    }

    fn download(&self, filename: &str, blob: &PdfBlob, sink: &dyn DownloadSink) -> Result<PathBuf> {
        sink.download(filename, blob).map_err(|err| {
            self.notifier.error(&format!("Failed to save report: {}", err));
            err
        })
    }

    /// Blob mode shortcut.
    pub fn blob(&self, input: Option<&ReportInput>, embed_image: bool) -> Result<PdfBlob> {
        let input = self.require(input)?;
        self.assemble(input, embed_image)
    }

    /// Share through the platform, downloading instead when sharing is
    /// unavailable.
    ///
    /// Cancellation and failure are not errors here; call
    /// [`ShareOutcome::into_result`] to escalate a failure.
    pub fn share(
        &self,
        input: Option<&ReportInput>,
        embed_image: bool,
        share: &dyn ShareSink,
        download: &dyn DownloadSink,
    ) -> Result<ShareOutcome> {
        let input = self.require(input)?;
        let blob = self.assemble(input, embed_image)?;
        let filename = report_filename(input);

        if !share.is_supported() {
            let path = self.download(&filename, &blob, download)?;
            log::info!("Native sharing unavailable, downloaded {}", filename);
            self.notifier.info("Sharing not supported on this device, report downloaded instead");
            return Ok(ShareOutcome::FellBackToDownload(path));
        }

        match share.share(&filename, &blob) {
            Ok(()) => {
                self.notifier.success("Report shared");
                Ok(ShareOutcome::Shared)
            },
            Err(ShareError::Cancelled) => {
                log::info!("Share of {} cancelled", filename);
                self.notifier.info("Sharing cancelled");
                Ok(ShareOutcome::Cancelled)
            },
            Err(ShareError::Failed(reason)) => {
                log::warn!("Share of {} failed: {}", filename, reason);
                self.notifier.error(&format!("Failed to share report: {}", reason));
                Ok(ShareOutcome::Failed(reason))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::sections::test_support::record;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        messages: Rc<RefCell<Vec<(&'static str, String)>>>,
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.messages.borrow_mut().push(("success", message.to_string()));
        }
        fn info(&self, message: &str) {
            self.messages.borrow_mut().push(("info", message.to_string()));
        }
        fn error(&self, message: &str) {
            self.messages.borrow_mut().push(("error", message.to_string()));
        }
    }

    struct MemorySink {
        saved: RefCell<Vec<(String, Vec<u8>)>>,
    }

    impl DownloadSink for MemorySink {
        fn download(&self, filename: &str, blob: &PdfBlob) -> Result<PathBuf> {
            self.saved
                .borrow_mut()
                .push((filename.to_string(), blob.bytes().to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    fn memory_sink() -> MemorySink {
        MemorySink {
            saved: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_filename() {
        let mut input = record();
        assert_eq!(report_filename(&input), "Dermatology_Report_R-1001_JaneDoe.pdf");
        input.patient.name = Some("  ".to_string());
        assert_eq!(report_filename(&input), "Dermatology_Report_R-1001_patient.pdf");
        input.patient.name = Some("A/B C".to_string());
        assert_eq!(report_filename(&input), "Dermatology_Report_R-1001_A_BC.pdf");
    }

    #[test]
    fn test_save_and_blob_are_identical() {
        let adapter = ExportAdapter::default();
        let input = record();
        let sink = memory_sink();
        adapter.save(Some(&input), true, &sink).unwrap();
        let blob = adapter.blob(Some(&input), true).unwrap();

        let saved = sink.saved.borrow();
        assert_eq!(saved[0].0, report_filename(&input));
        assert_eq!(saved[0].1, blob.bytes());
        assert_eq!(blob.mime_type(), "application/pdf");
    }

    #[test]
    fn test_missing_record_notifies() {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let adapter = ExportAdapter::default().with_notifier(Box::new(Recorder {
            messages: messages.clone(),
        }));
        let err = adapter.blob(None, false).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
        assert_eq!(messages.borrow()[0].0, "error");
    }

    #[test]
    fn test_file_sink_rejects_paths() {
        let sink = FileDownloadSink::new(std::env::temp_dir());
        let blob = PdfBlob::new(b"%PDF-1.7".to_vec());
        let err = sink.download("../escape.pdf", &blob).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    struct NoShare;

    impl ShareSink for NoShare {
        fn is_supported(&self) -> bool {
            false
        }

        fn share(&self, _filename: &str, _blob: &PdfBlob) -> std::result::Result<(), ShareError> {
            Err(ShareError::Failed("unsupported".to_string()))
        }
    }

    struct FullDisk;

    impl DownloadSink for FullDisk {
        fn download(&self, _filename: &str, _blob: &PdfBlob) -> Result<PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[test]
    fn test_share_fallback_download_failure_notifies() {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let adapter = ExportAdapter::default().with_notifier(Box::new(Recorder {
            messages: messages.clone(),
        }));
        let err = adapter
            .share(Some(&record()), false, &NoShare, &FullDisk)
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let messages = messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "error");
        assert!(messages[0].1.contains("disk full"));
    }

    #[test]
    fn test_failed_share_escalates() {
        assert!(ShareOutcome::Cancelled.into_result().is_ok());
        let err = ShareOutcome::Failed("boom".to_string())
            .into_result()
            .unwrap_err();
        assert!(matches!(err, Error::Share(_)));
    }
}
