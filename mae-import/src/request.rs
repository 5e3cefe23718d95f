//! Request builder for `POST {base}/process`.
//!
//! The body is multipart/form-data with three parts in order: `mode`,
//! `response_format` (always `json`) and `files` (the PDF bytes, untouched).
//! The multipart boundary is generated per request.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use url::Url;

use mae_core::{ImportMode, StatementFile};

pub const PROCESS_PATH: &str = "process";
pub const MODES_PATH: &str = "modes";
pub const HEALTH_PATH: &str = "health";

pub const FIELD_MODE: &str = "mode";
pub const FIELD_RESPONSE_FORMAT: &str = "response_format";
pub const FIELD_FILES: &str = "files";
pub const RESPONSE_FORMAT_JSON: &str = "json";
pub const PDF_MIME: &str = "application/pdf";

/// Resolve `path` under the service base URL, tolerating a base without a
/// trailing slash (`https://host/api` behaves like `https://host/api/`).
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .with_context(|| format!("resolve {path} against {base}"))
}

/// One attempt: a mode plus the statement to interpret with it.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub url: Url,
    pub mode: ImportMode,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ProcessRequest {
    pub fn new(base: &Url, mode: &ImportMode, file: &StatementFile) -> Result<Self> {
        Ok(Self {
            url: endpoint(base, PROCESS_PATH)?,
            mode: mode.clone(),
            filename: file.filename().to_string(),
            bytes: file.bytes().to_vec(),
        })
    }

    /// Encode the multipart body. Consumes the request's byte buffer.
    pub fn into_form(self) -> Result<Form> {
        let file = Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(PDF_MIME)
            .context("pdf part content type")?;

        Ok(Form::new()
            .text(FIELD_MODE, self.mode.as_str().to_string())
            .text(FIELD_RESPONSE_FORMAT, RESPONSE_FORMAT_JSON)
            .part(FIELD_FILES, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        assert_eq!(
            endpoint(&base("http://localhost:8000/"), PROCESS_PATH).unwrap().as_str(),
            "http://localhost:8000/process"
        );
        assert_eq!(
            endpoint(&base("https://pdf.example.test/api"), PROCESS_PATH).unwrap().as_str(),
            "https://pdf.example.test/api/process"
        );
        assert_eq!(
            endpoint(&base("https://pdf.example.test/api/"), MODES_PATH).unwrap().as_str(),
            "https://pdf.example.test/api/modes"
        );
    }

    #[test]
    fn test_request_copies_file_and_mode() {
        let file = StatementFile::new(b"%PDF-1.4 body".to_vec(), "mar.pdf").unwrap();
        let mode = ImportMode::parse("maybank_debit").unwrap();
        let req = ProcessRequest::new(&base("http://localhost:8000/"), &mode, &file).unwrap();
        assert_eq!(req.url.path(), "/process");
        assert_eq!(req.mode, mode);
        assert_eq!(req.filename, "mar.pdf");
        assert_eq!(req.bytes, b"%PDF-1.4 body");
    }

    #[test]
    fn test_each_form_gets_its_own_boundary() {
        let file = StatementFile::new(vec![1, 2, 3], "a.pdf").unwrap();
        let mode = ImportMode::parse("rhb_flex").unwrap();
        let req = ProcessRequest::new(&base("http://localhost:8000/"), &mode, &file).unwrap();

        let first = req.clone().into_form().unwrap();
        let second = req.into_form().unwrap();
        assert!(!first.boundary().is_empty());
        assert_ne!(first.boundary(), second.boundary());
    }
}
