use std::path::Path;

/// Lowercased file extension, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported_audio(path: &Path) -> bool {
    matches!(
        file_extension(path).as_str(),
        "wav" | "mp3" | "m4a" | "ogg" | "webm" | "flac"
    )
}
