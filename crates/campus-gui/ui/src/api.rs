use campus_core::ApiError;
use campus_core::http::{
  Api,
  CSRF_FIELD_NAME,
  CSRF_META_NAME,
  Method,
  RequestSpec,
  resolve_csrf_token
};
use gloo::net::http::{
  Request,
  RequestBuilder,
  Response
};
use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

/// `fetch`-backed client for the page's
/// own server.
#[derive(Debug, Default)]
pub struct HttpClient;

impl HttpClient {
  /// Read on every call; the server may
  /// rotate the token between requests.
  fn csrf_token() -> Result<String, ApiError> {
    let document = gloo::utils::document();
    let form_field = document
      .query_selector(&format!(
        "[name={CSRF_FIELD_NAME}]"
      ))
      .ok()
      .flatten()
      .and_then(|element| {
        element
          .dyn_into::<HtmlInputElement>()
          .ok()
      })
      .map(|input| input.value());
    let meta_tag = document
      .query_selector(&format!(
        "meta[name={CSRF_META_NAME}]"
      ))
      .ok()
      .flatten()
      .and_then(|element| {
        element.get_attribute("content")
      });

    resolve_csrf_token(form_field, meta_tag)
  }

  async fn send(
    spec: RequestSpec
  ) -> Result<Response, ApiError> {
    let builder = match spec.method {
      | Method::Get => Request::get(&spec.url),
      | Method::Post => {
        Request::post(&spec.url)
      }
    };
    let builder = spec.headers.iter().fold(
      builder,
      |builder: RequestBuilder,
       (name, value)| {
        builder.header(name, value)
      }
    );

    let request = match spec.body {
      | Some(body) => builder.body(body),
      | None => builder.build()
    }
    .map_err(|e| {
      ApiError::network(&spec.url, e)
    })?;

    let response =
      request.send().await.map_err(|e| {
        ApiError::network(&spec.url, e)
      })?;

    if !response.ok() {
      return Err(ApiError::Status {
        url:    spec.url,
        status: response.status()
      });
    }
    Ok(response)
  }

  async fn send_json(
    spec: RequestSpec
  ) -> Result<Value, ApiError> {
    let url = spec.url.clone();
    let response = Self::send(spec).await?;
    response
      .json::<Value>()
      .await
      .map_err(|e| ApiError::decode(&url, e))
  }
}

impl Api for HttpClient {
  async fn get(
    &self,
    url: &str
  ) -> Result<Value, ApiError> {
    Self::send_json(RequestSpec::ajax_get(
      url
    ))
    .await
    .inspect_err(|error| {
      tracing::error!(%error, "API GET error");
    })
  }

  async fn post(
    &self,
    url: &str,
    body: &Value
  ) -> Result<Value, ApiError> {
    let outcome = match RequestSpec::ajax_post(
      url,
      body,
      Self::csrf_token()
    ) {
      | Ok(spec) => {
        Self::send_json(spec).await
      }
      | Err(error) => Err(error)
    };
    outcome.inspect_err(|error| {
      tracing::error!(%error, "API POST error");
    })
  }

  async fn get_text(
    &self,
    url: &str
  ) -> Result<String, ApiError> {
    let response = Self::send(
      RequestSpec::plain_get(url)
    )
    .await?;
    response
      .text()
      .await
      .map_err(|e| ApiError::decode(url, e))
  }
}
