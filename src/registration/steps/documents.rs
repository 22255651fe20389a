//! Step 4: optional supporting documents.
//!
//! Each document kind has one slot. A selected file is checked against the
//! size and type limits before it replaces the slot's content; rejections are
//! recorded against the slot and leave it untouched.
use super::{FieldErrors, StepData, StepForm, StepId};
use crate::error::UploadError;
use crate::registration::preview::{PreviewHandle, PreviewRegistry};
use crate::registration::RegistrationDraft;
use crate::util::format_file_size;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Largest accepted document, in bytes.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_CONTENT_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// The two document slots offered during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    TaxCertificate,
    BusinessRegistration,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [
        DocumentKind::TaxCertificate,
        DocumentKind::BusinessRegistration,
    ];

    /// Value of the `type` part in upload requests.
    pub fn upload_type(&self) -> &'static str {
        match self {
            DocumentKind::TaxCertificate => "krapin",
            DocumentKind::BusinessRegistration => "business-registration",
        }
    }

    /// Key under which the uploaded path is submitted.
    pub fn payload_field(&self) -> &'static str {
        match self {
            DocumentKind::TaxCertificate => "krapinCertificate",
            DocumentKind::BusinessRegistration => "businessRegistrationCertificate",
        }
    }

    /// Key under which slot errors are reported.
    pub fn form_field(&self) -> &'static str {
        match self {
            DocumentKind::TaxCertificate => "kraPinCertificate",
            DocumentKind::BusinessRegistration => "businessRegistrationCertificate",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::TaxCertificate => "KRA PIN Certificate",
            DocumentKind::BusinessRegistration => "Business Registration Certificate",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.upload_type())
    }
}

/// An in-memory file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub data: Arc<[u8]>,
}

impl Attachment {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: Arc::from(data.into()),
        }
    }

    /// Read a file from disk, deriving its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self::new(name, content_type_for_path(path), data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Map a file extension to the content type a browser would report.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Check a file against the size and type limits.
pub fn validate_attachment(file: &Attachment) -> Result<(), UploadError> {
    if file.size() > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge { size: file.size() });
    }
    let content_type = file.content_type.to_ascii_lowercase();
    if !ACCEPTED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(UploadError::UnsupportedType {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// The files carried in the draft, one optional file per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    pub tax_certificate: Option<Attachment>,
    pub business_registration_certificate: Option<Attachment>,
}

impl DocumentSet {
    pub fn get(&self, kind: DocumentKind) -> Option<&Attachment> {
        match kind {
            DocumentKind::TaxCertificate => self.tax_certificate.as_ref(),
            DocumentKind::BusinessRegistration => self.business_registration_certificate.as_ref(),
        }
    }
}

/// A slot's file together with its live preview.
#[derive(Debug)]
pub struct FilePreview {
    file: Attachment,
    preview: PreviewHandle,
}

impl FilePreview {
    pub fn file(&self) -> &Attachment {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn url(&self) -> &str {
        self.preview.url()
    }

    /// Human-readable size, e.g. `2 MB`.
    pub fn display_size(&self) -> String {
        format_file_size(self.size())
    }
}

/// Slot state for the documents step. Previews are released on drop.
#[derive(Debug)]
pub struct DocumentsForm {
    registry: PreviewRegistry,
    slots: BTreeMap<DocumentKind, FilePreview>,
    upload_errors: BTreeMap<DocumentKind, String>,
}

impl DocumentsForm {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            registry,
            slots: BTreeMap::new(),
            upload_errors: BTreeMap::new(),
        }
    }

    /// Rebuild slots from files already in the draft, with fresh previews.
    pub fn from_draft(draft: &RegistrationDraft, registry: PreviewRegistry) -> Self {
        let mut form = Self::new(registry);
        for kind in DocumentKind::ALL {
            if let Some(file) = draft.attachment(kind) {
                let preview = form.registry.acquire(&file.name);
                form.slots.insert(
                    kind,
                    FilePreview {
                        file: file.clone(),
                        preview,
                    },
                );
            }
        }
        form
    }

    /// Put `file` into the slot for `kind`.
    ///
    /// On rejection the slot keeps its previous file and the error is
    /// recorded for that slot only.
    pub fn select(&mut self, kind: DocumentKind, file: Attachment) -> Result<(), UploadError> {
        if let Err(err) = validate_attachment(&file) {
            tracing::info!(slot = %kind, file = %file.name, error = %err, "document rejected");
            self.upload_errors.insert(kind, err.to_string());
            return Err(err);
        }
        self.upload_errors.remove(&kind);
        // Release the old preview before acquiring one for the new file.
        drop(self.slots.remove(&kind));
        let preview = self.registry.acquire(&file.name);
        tracing::debug!(slot = %kind, file = %file.name, bytes = file.size(), "document attached");
        self.slots.insert(kind, FilePreview { file, preview });
        Ok(())
    }

    /// Empty the slot and clear its error.
    pub fn remove(&mut self, kind: DocumentKind) {
        drop(self.slots.remove(&kind));
        self.upload_errors.remove(&kind);
    }

    pub fn slot(&self, kind: DocumentKind) -> Option<&FilePreview> {
        self.slots.get(&kind)
    }

    pub fn upload_error(&self, kind: DocumentKind) -> Option<&str> {
        self.upload_errors.get(&kind).map(String::as_str)
    }

    fn document_set(&self) -> DocumentSet {
        let file = |kind: DocumentKind| self.slots.get(&kind).map(|slot| slot.file.clone());
        DocumentSet {
            tax_certificate: file(DocumentKind::TaxCertificate),
            business_registration_certificate: file(DocumentKind::BusinessRegistration),
        }
    }
}

impl StepForm for DocumentsForm {
    const STEP: StepId = StepId::Documents;

    /// Documents are optional; slot errors never block the step.
    fn validate(&self) -> FieldErrors {
        FieldErrors::new()
    }

    fn step_data(&self) -> StepData {
        StepData::Documents(self.document_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;

    fn pdf(name: &str, bytes: usize) -> Attachment {
        Attachment::new(name, "application/pdf", vec![0u8; bytes])
    }

    #[test]
    fn oversized_file_is_rejected_and_slot_stays_empty() {
        let registry = PreviewRegistry::new();
        let mut form = DocumentsForm::new(registry.clone());

        let err = form
            .select(DocumentKind::TaxCertificate, pdf("big.pdf", 6 * MIB))
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert!(form.slot(DocumentKind::TaxCertificate).is_none());
        assert_eq!(
            form.upload_error(DocumentKind::TaxCertificate),
            Some("File size must be less than 5MB")
        );
        assert_eq!(registry.live_count(), 0);

        form.select(DocumentKind::TaxCertificate, pdf("pin.pdf", 2 * MIB))
            .expect("accept 2 MiB pdf");
        let slot = form.slot(DocumentKind::TaxCertificate).expect("slot filled");
        assert_eq!(slot.name(), "pin.pdf");
        assert_eq!(slot.display_size(), "2 MB");
        assert_eq!(form.upload_error(DocumentKind::TaxCertificate), None);
    }

    #[test]
    fn unsupported_type_is_scoped_to_its_slot() {
        let mut form = DocumentsForm::new(PreviewRegistry::new());
        form.select(DocumentKind::TaxCertificate, pdf("pin.pdf", 10))
            .expect("accept pdf");
        let doc = Attachment::new("notes.docx", "application/msword", vec![1u8; 10]);
        let err = form
            .select(DocumentKind::BusinessRegistration, doc)
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert_eq!(form.upload_error(DocumentKind::TaxCertificate), None);
        assert!(form.upload_error(DocumentKind::BusinessRegistration).is_some());
        assert!(form.slot(DocumentKind::TaxCertificate).is_some());
        assert!(form.controls().next_enabled);
    }

    #[test]
    fn replacing_a_file_releases_the_previous_preview() {
        let registry = PreviewRegistry::new();
        let mut form = DocumentsForm::new(registry.clone());
        form.select(DocumentKind::BusinessRegistration, pdf("v1.pdf", 10))
            .expect("accept first");
        let first_url = form
            .slot(DocumentKind::BusinessRegistration)
            .map(|slot| slot.url().to_string())
            .expect("first preview");

        let png = Attachment::new("v2.png", "image/png", vec![1u8; 10]);
        form.select(DocumentKind::BusinessRegistration, png)
            .expect("accept replacement");
        assert!(!registry.is_live(&first_url));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn rejected_replacement_keeps_existing_file_and_preview() {
        let registry = PreviewRegistry::new();
        let mut form = DocumentsForm::new(registry.clone());
        form.select(DocumentKind::TaxCertificate, pdf("pin.pdf", 10))
            .expect("accept first");
        let url = form
            .slot(DocumentKind::TaxCertificate)
            .map(|slot| slot.url().to_string())
            .expect("preview");
        let _ = form.select(DocumentKind::TaxCertificate, pdf("huge.pdf", 6 * MIB));
        assert!(registry.is_live(&url));
        assert_eq!(
            form.slot(DocumentKind::TaxCertificate).map(FilePreview::name),
            Some("pin.pdf")
        );
    }

    #[test]
    fn remove_and_teardown_release_previews() {
        let registry = PreviewRegistry::new();
        let mut form = DocumentsForm::new(registry.clone());
        form.select(DocumentKind::TaxCertificate, pdf("a.pdf", 10))
            .expect("accept a");
        form.select(DocumentKind::BusinessRegistration, pdf("b.pdf", 10))
            .expect("accept b");
        assert_eq!(registry.live_count(), 2);

        form.remove(DocumentKind::TaxCertificate);
        assert_eq!(registry.live_count(), 1);
        drop(form);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn emitted_set_carries_files_without_previews() {
        let registry = PreviewRegistry::new();
        let mut form = DocumentsForm::new(registry.clone());
        form.select(DocumentKind::TaxCertificate, pdf("pin.pdf", 10))
            .expect("accept");
        let StepData::Documents(set) = form.step_data() else {
            panic!("expected documents slice");
        };
        assert_eq!(set.tax_certificate.as_ref().map(|f| f.name.as_str()), Some("pin.pdf"));
        assert!(set.business_registration_certificate.is_none());
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for_path(Path::new("a/B.PDF")), "application/pdf");
        assert_eq!(content_type_for_path(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(
            content_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }
}
