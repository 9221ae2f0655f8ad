/// A snapshot of a page stored by the Internet Archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedPageReference {
    pub url: String,
    /// Capture time as the archive formats it (`YYYYMMDDhhmmss`)
    pub timestamp: Option<String>,
}
