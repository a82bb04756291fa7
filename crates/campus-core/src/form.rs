use std::collections::BTreeMap;

pub const FIELD_ERROR_CLASS: &str =
  "border-red-500";
pub const FORM_INVALID_MESSAGE: &str =
  "Please fill in all required fields";

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct FormField {
  pub name:      String,
  pub value:     String,
  pub required:  bool,
  pub disabled:  bool,
  /// `Some(checked)` for checkboxes and
  /// radio buttons.
  pub checked:   Option<bool>
}

impl FormField {
  fn is_submitted(&self) -> bool {
    !self.name.is_empty()
      && !self.disabled
      && self.checked.unwrap_or(true)
  }

  fn is_filled(&self) -> bool {
    !self.value.trim().is_empty()
  }
}

/// Whether a `form.elements` entry carries a
/// text value in the form-encoded payload.
/// Buttons, fieldsets and file pickers do
/// not.
pub fn is_submittable(
  tag: &str,
  input_type: &str
) -> bool {
  match tag.to_ascii_lowercase().as_str() {
    | "input" => !matches!(
      input_type
        .trim()
        .to_ascii_lowercase()
        .as_str(),
      "submit"
        | "reset"
        | "button"
        | "image"
        | "file"
    ),
    | "select" | "textarea" => true,
    | _ => false
  }
}

/// A live form control: something that can
/// describe itself and show an error cue.
pub trait FormControl {
  fn field(&self) -> FormField;
  fn set_invalid(&self, invalid: bool);
}

/// Name/value pairs as the browser would
/// submit them; a repeated name keeps its
/// last value.
pub fn serialize(
  fields: &[FormField]
) -> BTreeMap<String, String> {
  fields
    .iter()
    .filter(|field| field.is_submitted())
    .map(|field| {
      (
        field.name.clone(),
        field.value.clone()
      )
    })
    .collect()
}

/// Indices of required fields left blank.
pub fn missing_required(
  fields: &[FormField]
) -> Vec<usize> {
  fields
    .iter()
    .enumerate()
    .filter(|(_, field)| {
      field.required && !field.is_filled()
    })
    .map(|(idx, _)| idx)
    .collect()
}

/// Checks every required control and
/// toggles its error cue. True when all of
/// them are filled.
pub fn validate<C: FormControl>(
  controls: &[C]
) -> bool {
  let fields: Vec<FormField> = controls
    .iter()
    .map(FormControl::field)
    .collect();
  let missing = missing_required(&fields);

  for (idx, (control, field)) in
    controls.iter().zip(&fields).enumerate()
  {
    if field.required {
      control
        .set_invalid(missing.contains(&idx));
    }
  }

  if !missing.is_empty() {
    tracing::debug!(
      missing = missing.len(),
      "form has blank required fields"
    );
  }
  missing.is_empty()
}
