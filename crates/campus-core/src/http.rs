use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub const AJAX_HEADER: &str =
  "X-Requested-With";
pub const AJAX_HEADER_VALUE: &str =
  "XMLHttpRequest";
pub const CSRF_HEADER: &str =
  "X-CSRFToken";
pub const CSRF_FIELD_NAME: &str =
  "csrfmiddlewaretoken";
pub const CSRF_META_NAME: &str =
  "csrf-token";
pub const CONTENT_TYPE_HEADER: &str =
  "Content-Type";
pub const JSON_CONTENT_TYPE: &str =
  "application/json";

/// The calls the page makes to its own
/// server. Implemented over `fetch` in the
/// browser and by in-memory fakes in
/// tests.
pub trait Api {
  fn get(
    &self,
    url: &str
  ) -> impl Future<
    Output = Result<Value, ApiError>
  >;

  fn post(
    &self,
    url: &str,
    body: &Value
  ) -> impl Future<
    Output = Result<Value, ApiError>
  >;

  /// Plain GET returning the raw body.
  fn get_text(
    &self,
    url: &str
  ) -> impl Future<
    Output = Result<String, ApiError>
  >;

  fn get_as<T: DeserializeOwned>(
    &self,
    url: &str
  ) -> impl Future<
    Output = Result<T, ApiError>
  > {
    async move {
      let value = self.get(url).await?;
      decode_value(url, value)
    }
  }

  fn post_as<T: DeserializeOwned>(
    &self,
    url: &str,
    body: &Value
  ) -> impl Future<
    Output = Result<T, ApiError>
  > {
    async move {
      let value =
        self.post(url, body).await?;
      decode_value(url, value)
    }
  }
}

pub fn decode_value<T: DeserializeOwned>(
  url: &str,
  value: Value
) -> Result<T, ApiError> {
  serde_json::from_value(value)
    .map_err(|e| ApiError::decode(url, e))
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post
}

/// A fully prepared request: what goes on
/// the wire, independent of the transport
/// that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
  pub method:  Method,
  pub url:     String,
  pub headers: Vec<(&'static str, String)>,
  pub body:    Option<String>
}

impl RequestSpec {
  pub fn ajax_get(url: &str) -> Self {
    Self {
      method:  Method::Get,
      url:     url.to_string(),
      headers: vec![(
        AJAX_HEADER,
        AJAX_HEADER_VALUE.to_string()
      )],
      body:    None
    }
  }

  pub fn plain_get(url: &str) -> Self {
    Self {
      method:  Method::Get,
      url:     url.to_string(),
      headers: vec![],
      body:    None
    }
  }

  /// Builds a JSON POST. The token is
  /// resolved by the caller on every call
  /// so a rotated token is always picked
  /// up.
  pub fn ajax_post(
    url: &str,
    body: &Value,
    csrf_token: Result<String, ApiError>
  ) -> Result<Self, ApiError> {
    let token = csrf_token?;
    let body = serde_json::to_string(body)
      .map_err(|e| ApiError::Encode {
        url:     url.to_string(),
        message: e.to_string()
      })?;

    Ok(Self {
      method:  Method::Post,
      url:     url.to_string(),
      headers: vec![
        (
          CONTENT_TYPE_HEADER,
          JSON_CONTENT_TYPE.to_string()
        ),
        (CSRF_HEADER, token),
        (
          AJAX_HEADER,
          AJAX_HEADER_VALUE.to_string()
        ),
      ],
      body:    Some(body)
    })
  }

  pub fn header(
    &self,
    name: &str
  ) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| {
        key.eq_ignore_ascii_case(name)
      })
      .map(|(_, value)| value.as_str())
  }
}

/// Picks the hidden form field first and
/// the meta tag second; blank values count
/// as absent.
pub fn resolve_csrf_token(
  form_field: Option<String>,
  meta_tag: Option<String>
) -> Result<String, ApiError> {
  form_field
    .filter(|value| {
      !value.trim().is_empty()
    })
    .or_else(|| {
      meta_tag.filter(|value| {
        !value.trim().is_empty()
      })
    })
    .ok_or(ApiError::MissingToken)
}

pub fn search_url(
  base: &str,
  query: &str
) -> String {
  let separator = if base.contains('?')
  {
    '&'
  } else {
    '?'
  };
  format!(
    "{base}{separator}q={}",
    urlencoding::encode(query)
  )
}

pub fn mark_read_url(
  template: &str,
  id: i64
) -> String {
  template.replace("{id}", &id.to_string())
}
