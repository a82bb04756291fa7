use crate::config::UploadConfig;
use crate::error::FileRejection;

pub const DRAGOVER_CLASS: &str =
  "dragover";

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FileMeta {
  pub name:      String,
  pub size:      u64,
  pub mime_type: String
}

/// A handle to user-supplied file data,
/// whatever the host represents it as.
pub trait IntakeFile {
  fn meta(&self) -> FileMeta;
}

impl IntakeFile for FileMeta {
  fn meta(&self) -> FileMeta {
    self.clone()
  }
}

pub fn validate_file(
  file: &FileMeta,
  constraints: &UploadConfig
) -> Result<(), FileRejection> {
  if file.size > constraints.max_size {
    return Err(FileRejection::TooLarge {
      size:     file.size,
      limit_mb: megabytes(
        constraints.max_size
      )
    });
  }

  if !constraints
    .allowed_types
    .is_empty()
    && !constraints
      .allowed_types
      .iter()
      .any(|allowed| {
        allowed == &file.mime_type
      })
  {
    return Err(
      FileRejection::TypeNotAllowed {
        mime_type: file
          .mime_type
          .clone(),
        allowed:   constraints
          .allowed_types
          .clone()
      }
    );
  }

  Ok(())
}

pub fn is_image(mime_type: &str) -> bool {
  mime_type.starts_with("image/")
}

/// `5242880` -> `"5"`, `524288` ->
/// `"0.5"`.
fn megabytes(bytes: u64) -> String {
  let mb = bytes as f64 / 1024.0 / 1024.0;
  format!("{mb}")
}

const SIZE_UNITS: [&str; 4] =
  ["Bytes", "KB", "MB", "GB"];

/// Human size with at most two decimals,
/// trailing zeros dropped.
#[must_use]
pub fn format_file_size(
  bytes: u64
) -> String {
  if bytes == 0 {
    return "0 Bytes".to_string();
  }

  let mut value = bytes as f64;
  let mut unit = 0;
  while value >= 1024.0
    && unit < SIZE_UNITS.len() - 1
  {
    value /= 1024.0;
    unit += 1;
  }

  let rounded =
    (value * 100.0).round() / 100.0;
  format!("{rounded} {}", SIZE_UNITS[unit])
}
