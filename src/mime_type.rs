//! MIME type guessing from file names

use std::path::Path;

/// Type used when nothing better can be determined
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Result of guessing a file's type from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    /// Content type, if the extension is known
    pub mime_type: Option<&'static str>,

    /// Compression applied on top of the content (e.g. "gzip")
    pub encoding: Option<&'static str>,
}

impl Guess {
    /// The type to declare for an attachment: the guessed type, unless it is
    /// unknown or wrapped in a compression encoding
    #[must_use]
    pub fn attachment_type(&self) -> &'static str {
        match (self.mime_type, self.encoding) {
            (Some(mime_type), None) => mime_type,
            _ => OCTET_STREAM,
        }
    }
}

/// Shorthand suffixes that stand for a type plus a compression suffix
const SUFFIX_MAP: &[(&str, &str)] = &[
    ("svgz", "svg.gz"),
    ("tgz", "tar.gz"),
    ("taz", "tar.gz"),
    ("tz", "tar.gz"),
    ("tbz2", "tar.bz2"),
    ("txz", "tar.xz"),
];

const ENCODINGS: &[(&str, &str)] = &[
    ("gz", "gzip"),
    ("z", "compress"),
    ("bz2", "bzip2"),
    ("xz", "xz"),
    ("br", "br"),
];

const TYPES: &[(&str, &str)] = &[
    // text
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("log", "text/plain"),
    ("c", "text/plain"),
    ("h", "text/plain"),
    ("py", "text/x-python"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("md", "text/markdown"),
    ("markdown", "text/markdown"),
    ("xml", "text/xml"),
    ("ics", "text/calendar"),
    ("vcf", "text/x-vcard"),
    ("rtx", "text/richtext"),
    ("tsv", "text/tab-separated-values"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    // images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/vnd.microsoft.icon"),
    ("avif", "image/avif"),
    ("heic", "image/heic"),
    // audio / video
    ("mp3", "audio/mpeg"),
    ("wav", "audio/x-wav"),
    ("ogg", "audio/ogg"),
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    // documents and archives
    ("pdf", "application/pdf"),
    ("json", "application/json"),
    ("zip", "application/zip"),
    ("tar", "application/x-tar"),
    ("gtar", "application/x-gtar"),
    ("doc", "application/msword"),
    ("dot", "application/msword"),
    ("xls", "application/vnd.ms-excel"),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("rtf", "application/rtf"),
    ("eml", "message/rfc822"),
    ("mht", "message/rfc822"),
    ("wasm", "application/wasm"),
    ("bin", "application/octet-stream"),
    ("exe", "application/octet-stream"),
    ("so", "application/octet-stream"),
    ("sh", "application/x-sh"),
    ("ps", "application/postscript"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(ext, _)| *ext == key)
        .map(|(_, value)| *value)
}

/// Guess the content type and compression encoding of a file from its name.
///
/// Only the final path component is considered. Extensions are matched
/// case-insensitively; a trailing compression suffix (`.gz`, `.bz2`, ...) is
/// reported as the encoding and the type is guessed from what precedes it.
#[must_use]
pub fn guess(path: impl AsRef<Path>) -> Guess {
    let mut name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some((stem, ext)) = name.rsplit_once('.')
        && let Some(expanded) = lookup(SUFFIX_MAP, ext)
    {
        name = format!("{stem}.{expanded}");
    }

    let mut encoding = None;
    if let Some((stem, ext)) = name.rsplit_once('.')
        && let Some(found) = lookup(ENCODINGS, ext)
    {
        encoding = Some(found);
        name = stem.to_string();
    }

    let mime_type = name
        .rsplit_once('.')
        .and_then(|(stem, ext)| (!stem.is_empty()).then(|| lookup(TYPES, ext)).flatten());

    Guess {
        mime_type,
        encoding,
    }
}
