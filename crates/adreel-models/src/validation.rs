//! Upload input validation.
//!
//! Shared by the relay (authoritative checks) and the front end (early
//! feedback before any bytes are sent).

use thiserror::Error;
use url::Url;

/// Uploads above this size get a warning.
pub const FILE_SIZE_WARN_BYTES: u64 = 50 * 1024 * 1024;

/// Uploads above this size are rejected.
pub const FILE_SIZE_LIMIT_BYTES: u64 = 100 * 1024 * 1024;

/// Container formats the provider accepts.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL is empty")]
    EmptyUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("File is too large: {size} bytes (limit is {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Provide either a file or a URL")]
    MissingSource,
}

/// Outcome of a file-size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    Ok,
    /// Accepted, but slow to upload and analyze
    Warning,
    TooLarge,
}

impl SizeCheck {
    pub fn into_result(self, size: u64) -> Result<Self, ValidationError> {
        match self {
            SizeCheck::TooLarge => Err(ValidationError::FileTooLarge {
                size,
                limit: FILE_SIZE_LIMIT_BYTES,
            }),
            other => Ok(other),
        }
    }
}

/// Classify an upload size against the 50MB / 100MB thresholds.
pub fn check_file_size(bytes: u64) -> SizeCheck {
    if bytes > FILE_SIZE_LIMIT_BYTES {
        SizeCheck::TooLarge
    } else if bytes >= FILE_SIZE_WARN_BYTES {
        SizeCheck::Warning
    } else {
        SizeCheck::Ok
    }
}

/// Parse and validate a video URL. Only absolute http(s) URLs with a host pass.
pub fn validate_url(input: &str) -> Result<Url, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ValidationError::InvalidUrl(format!("{}: missing host", trimmed))),
    }
}

/// Check that a filename carries a supported video extension.
pub fn validate_video_filename(filename: &str) -> Result<(), ValidationError> {
    let ext = std::path::Path::new(filename.trim())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::UnsupportedFileType(filename.to_string())),
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_urls() {
        for url in [
            "https://example.com/video.mp4",
            "http://cdn.example.org:8080/a/b?c=d",
            "  https://www.youtube.com/watch?v=dQw4w9WgXcQ  ",
        ] {
            assert!(validate_url(url).is_ok(), "{} should be valid", url);
        }
    }

    #[test]
    fn test_rejects_malformed_urls() {
        assert_eq!(validate_url(""), Err(ValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(ValidationError::EmptyUrl));
        assert!(matches!(validate_url("not a url"), Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(validate_url("/relative/path.mp4"), Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(validate_url("https://"), Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(
            validate_url("ftp://example.com/video.mp4"),
            Err(ValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(ValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_file_size_thresholds() {
        assert_eq!(check_file_size(0), SizeCheck::Ok);
        assert_eq!(check_file_size(FILE_SIZE_WARN_BYTES - 1), SizeCheck::Ok);
        assert_eq!(check_file_size(FILE_SIZE_WARN_BYTES), SizeCheck::Warning);
        assert_eq!(check_file_size(FILE_SIZE_LIMIT_BYTES), SizeCheck::Warning);
        assert_eq!(check_file_size(FILE_SIZE_LIMIT_BYTES + 1), SizeCheck::TooLarge);
    }

    #[test]
    fn test_size_check_into_result() {
        let size = FILE_SIZE_LIMIT_BYTES + 10;
        assert_eq!(
            check_file_size(size).into_result(size),
            Err(ValidationError::FileTooLarge {
                size,
                limit: FILE_SIZE_LIMIT_BYTES
            })
        );
        assert_eq!(check_file_size(10).into_result(10), Ok(SizeCheck::Ok));
    }

    #[test]
    fn test_video_filename() {
        assert!(validate_video_filename("spot.MP4").is_ok());
        assert!(validate_video_filename("teaser.webm").is_ok());
        assert!(validate_video_filename("notes.txt").is_err());
        assert!(validate_video_filename("no_extension").is_err());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(FILE_SIZE_WARN_BYTES), "50.0 MB");
    }
}
