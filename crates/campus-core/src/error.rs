/// Failures of a JSON or text request.
#[derive(
  Debug, Clone, PartialEq, Eq, thiserror::Error,
)]
pub enum ApiError {
  /// The request never produced a
  /// response (offline, CORS, aborted).
  #[error("request to {url} failed: {message}")]
  Network { url: String, message: String },
  #[error("request to {url} returned status {status}")]
  Status { url: String, status: u16 },
  /// The body was not JSON or did not
  /// match the expected shape.
  #[error("response from {url} could not be decoded: {message}")]
  Decode { url: String, message: String },
  #[error("request body for {url} could not be encoded: {message}")]
  Encode { url: String, message: String },
  /// Neither the hidden form field nor
  /// the meta tag carried an
  /// anti-forgery token.
  #[error("anti-forgery token not found on the page")]
  MissingToken
}

impl ApiError {
  pub fn network(
    url: &str,
    message: impl ToString
  ) -> Self {
    Self::Network {
      url:     url.to_string(),
      message: message.to_string()
    }
  }

  pub fn decode(
    url: &str,
    message: impl ToString
  ) -> Self {
    Self::Decode {
      url:     url.to_string(),
      message: message.to_string()
    }
  }
}

/// Why an incoming file was not staged.
/// The display text is shown to the user
/// verbatim.
#[derive(
  Debug, Clone, PartialEq, Eq, thiserror::Error,
)]
pub enum FileRejection {
  #[error("File size must be less than {limit_mb}MB")]
  TooLarge { size: u64, limit_mb: String },
  #[error("File type not allowed. Allowed types: {}", allowed.join(", "))]
  TypeNotAllowed {
    mime_type: String,
    allowed:   Vec<String>
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("config section `{0}` must be a table")]
  NotATable(String)
}
