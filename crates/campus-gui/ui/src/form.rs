use std::collections::BTreeMap;

use campus_core::form::{
  FIELD_ERROR_CLASS,
  FormControl,
  FormField,
  is_submittable
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlFormElement,
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};

use crate::dom::set_class;

/// One element of `form.elements`.
pub struct DomControl(Element);

impl DomControl {
  fn submittable(&self) -> bool {
    let input_type = self
      .0
      .dyn_ref::<HtmlInputElement>()
      .map(HtmlInputElement::type_)
      .unwrap_or_default();
    is_submittable(
      &self.0.tag_name(),
      &input_type
    )
  }
}

impl FormControl for DomControl {
  fn field(&self) -> FormField {
    let element = &self.0;
    let (value, checked) =
      if let Some(input) =
        element.dyn_ref::<HtmlInputElement>()
      {
        let checkable = matches!(
          input.type_().as_str(),
          "checkbox" | "radio"
        );
        (
          input.value(),
          checkable.then(|| input.checked())
        )
      } else if let Some(select) =
        element.dyn_ref::<HtmlSelectElement>()
      {
        (select.value(), None)
      } else if let Some(area) = element
        .dyn_ref::<HtmlTextAreaElement>()
      {
        (area.value(), None)
      } else {
        (String::new(), None)
      };

    FormField {
      name: element
        .get_attribute("name")
        .unwrap_or_default(),
      value,
      required: element
        .has_attribute("required"),
      disabled: element
        .has_attribute("disabled"),
      checked
    }
  }

  fn set_invalid(&self, invalid: bool) {
    set_class(
      &self.0,
      FIELD_ERROR_CLASS,
      invalid
    );
  }
}

pub fn controls(
  form: &HtmlFormElement
) -> Vec<DomControl> {
  let elements = form.elements();
  (0..elements.length())
    .filter_map(|idx| elements.item(idx))
    .map(DomControl)
    .collect()
}

pub fn serialize(
  form: &HtmlFormElement
) -> BTreeMap<String, String> {
  let fields: Vec<FormField> = controls(form)
    .iter()
    .filter(|control| control.submittable())
    .map(FormControl::field)
    .collect();
  campus_core::form::serialize(&fields)
}

pub fn validate(
  form: &HtmlFormElement
) -> bool {
  campus_core::form::validate(&controls(
    form
  ))
}
