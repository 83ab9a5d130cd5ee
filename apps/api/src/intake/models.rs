use bytes::Bytes;

use crate::claims::DocumentKind;

/// One file pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub kind: DocumentKind,
    /// Filename as declared by the client. Sanitized at upload time.
    pub file_name: String,
    pub body: Bytes,
}

/// Submission order: all car photos first, then supporting documents, each
/// group keeping its multipart arrival order. Browsers send the parts of one
/// input together, but nothing forces a client to; grouping here keeps the
/// document list deterministic either way.
pub fn in_submission_order(files: Vec<UploadedFile>) -> Vec<UploadedFile> {
    let (photos, documents): (Vec<_>, Vec<_>) = files
        .into_iter()
        .partition(|f| f.kind == DocumentKind::Photo);
    photos.into_iter().chain(documents).collect()
}

/// A parsed claim submission. Ephemeral: built per request, consumed by the
/// orchestrator, never stored in this form.
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub name: String,
    pub email: String,
    pub accident_description: String,
    pub accident_date: String,
    pub vehicle_model: String,
    pub files: Vec<UploadedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(kind: DocumentKind, name: &str) -> UploadedFile {
        UploadedFile {
            kind,
            file_name: name.to_string(),
            body: Bytes::from_static(b"bytes"),
        }
    }

    #[test]
    fn test_interleaved_files_group_photos_first() {
        let files = vec![
            file(DocumentKind::SupportingDocument, "report.pdf"),
            file(DocumentKind::Photo, "front.jpg"),
            file(DocumentKind::SupportingDocument, "invoice.pdf"),
            file(DocumentKind::Photo, "rear.jpg"),
        ];

        let ordered = in_submission_order(files);
        let names: Vec<&str> = ordered.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["front.jpg", "rear.jpg", "report.pdf", "invoice.pdf"]);
    }

    #[test]
    fn test_single_group_keeps_arrival_order() {
        let files = vec![
            file(DocumentKind::Photo, "a.jpg"),
            file(DocumentKind::Photo, "b.jpg"),
        ];

        let ordered = in_submission_order(files);
        let names: Vec<&str> = ordered.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }
}
