/// An image received from the caller. Held in memory for one request only.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    content_type: String,
    file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
            file_name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type as declared by the client.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Image payloads are large; keep them out of logs.
impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}
