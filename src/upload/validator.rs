use crate::config::UploadConfig;
use crate::upload::types::CandidateFile;
use thiserror::Error;

/// Why a candidate was kept out of the queue. The message is what the user sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("File {name} is too large. Maximum size is {max_size_mb}MB.")]
    FileTooLarge {
        name: String,
        size: u64,
        max_size_mb: f64,
    },
    #[error("File type {extension} of {name} is not supported.")]
    UnsupportedType { name: String, extension: String },
}

impl Rejection {
    pub fn file_name(&self) -> &str {
        match self {
            Rejection::FileTooLarge { name, .. } | Rejection::UnsupportedType { name, .. } => name,
        }
    }
}

/// Lowercased text after the final `.`, with a leading dot. A name without
/// any dot yields the whole name.
pub fn file_extension(name: &str) -> String {
    let tail = name.rsplit('.').next().unwrap_or(name);
    format!(".{}", tail.to_lowercase())
}

/// Size first, then extension.
pub fn validate(file: &CandidateFile, config: &UploadConfig) -> Result<(), Rejection> {
    if file.size > config.max_size_bytes() {
        return Err(Rejection::FileTooLarge {
            name: file.name.clone(),
            size: file.size,
            max_size_mb: config.max_size_mb(),
        });
    }

    let extension = file_extension(&file.name);
    if !config.accepts_extension(&extension) {
        return Err(Rejection::UnsupportedType {
            name: file.name.clone(),
            extension,
        });
    }

    Ok(())
}
