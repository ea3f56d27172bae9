// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

const FALLBACK_UPLOAD_NAME: &str = "upload.csv";
const MAX_USERNAME_CHARS: usize = 64;
const MIB: usize = 1024 * 1024;

pub struct Validator;

impl Validator {
    /// Any printable name up to 64 characters, without surrounding whitespace.
    pub fn validate_username(username: &str) -> Result<()> {
        let valid = !username.is_empty()
            && username.trim() == username
            && username.chars().count() <= MAX_USERNAME_CHARS
            && !username.chars().any(char::is_control);

        if !valid {
            return Err(PipelineError::Validation(format!(
                "Invalid username: '{}'",
                username
            )));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(PipelineError::Validation(
                "Password must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_csv_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
            _ => Err(PipelineError::Validation(format!(
                "File is not a CSV file: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_content_not_empty(content: &[u8]) -> Result<()> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err(PipelineError::Validation("Uploaded file is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_upload_size(size: usize, max_bytes: usize) -> Result<()> {
        if size > max_bytes {
            return Err(PipelineError::Validation(format!(
                "File too large. Maximum {}.",
                describe_limit(max_bytes)
            )));
        }
        Ok(())
    }

    /// Keep only the final path component of a client-supplied file name.
    pub fn sanitize_upload_filename(name: &str) -> String {
        let base = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>();

        let base = base.trim();
        if base.is_empty() || base == "." || base == ".." {
            FALLBACK_UPLOAD_NAME.to_string()
        } else {
            base.to_string()
        }
    }
}

fn describe_limit(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{}KB", bytes.div_ceil(1024))
    }
}
