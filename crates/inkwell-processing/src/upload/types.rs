//! Types for the upload pipeline.

use bytes::Bytes;

/// A file part of a decoded request body.
#[derive(Clone, Debug)]
pub struct FilePart {
    pub field_name: String,
    /// File name declared by the client, unsanitized.
    pub file_name: String,
    pub data: Bytes,
}

/// Transport-neutral view of a request body: file parts plus text fields.
///
/// Multipart and url-encoded bodies both decode into this shape, so the
/// pipeline never sees the wire format.
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    files: Vec<FilePart>,
    fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_file(
        &mut self,
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
    ) {
        self.files.push(FilePart {
            field_name: field_name.into(),
            file_name: file_name.into(),
            data: data.into(),
        });
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First file part submitted under `name`.
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files.iter().find(|part| part.field_name == name)
    }

    /// First text field submitted under `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every text value submitted under `name`, in submission order.
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.fields.is_empty()
    }
}
