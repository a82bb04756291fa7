use std::rc::Rc;

use campus_core::intake::{
  DRAGOVER_CLASS,
  FileMeta,
  IntakeFile
};
use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::file::ObjectUrl;
use wasm_bindgen::JsCast;
use web_sys::{
  DragEvent,
  Element,
  FileList
};

use crate::dom::set_class;

#[derive(Debug, Clone, PartialEq)]
pub struct WebFile(pub web_sys::File);

impl IntakeFile for WebFile {
  fn meta(&self) -> FileMeta {
    FileMeta {
      name:      self.0.name(),
      size:      self.0.size().max(0.0)
        as u64,
      mime_type: self.0.type_()
    }
  }
}

/// Object URL for an image preview,
/// revoked once the last copy is dropped.
#[derive(Clone)]
pub struct Preview(Rc<ObjectUrl>);

impl Preview {
  pub fn of(file: &WebFile) -> Self {
    Self(Rc::new(ObjectUrl::from(
      gloo::file::File::from(
        file.0.clone()
      )
    )))
  }

  pub fn url(&self) -> String {
    String::from(&**self.0)
  }
}

impl PartialEq for Preview {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

pub fn files_from_list(
  list: Option<FileList>
) -> Vec<WebFile> {
  let Some(list) = list else {
    return vec![];
  };
  (0..list.length())
    .filter_map(|idx| list.get(idx))
    .map(WebFile)
    .collect()
}

/// Keeps the drag handlers attached;
/// dropping it detaches them.
pub struct DropZone {
  _listeners: [EventListener; 3]
}

/// Highlights `element` while files hover
/// over it and hands dropped files to
/// `on_drop` unvalidated.
pub fn setup_drop_zone(
  element: &Element,
  on_drop: impl Fn(Vec<WebFile>) + 'static
) -> DropZone {
  let dragover = {
    let target = element.clone();
    EventListener::new_with_options(
      element,
      "dragover",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        set_class(&target, DRAGOVER_CLASS, true);
      }
    )
  };

  let dragleave = {
    let target = element.clone();
    EventListener::new_with_options(
      element,
      "dragleave",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        set_class(
          &target,
          DRAGOVER_CLASS,
          false
        );
      }
    )
  };

  let dropped = {
    let target = element.clone();
    EventListener::new_with_options(
      element,
      "drop",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        set_class(
          &target,
          DRAGOVER_CLASS,
          false
        );
        let files = event
          .dyn_ref::<DragEvent>()
          .and_then(DragEvent::data_transfer)
          .map(|transfer| transfer.files())
          .map(files_from_list)
          .unwrap_or_default();
        tracing::debug!(
          count = files.len(),
          "files dropped"
        );
        on_drop(files);
      }
    )
  };

  DropZone {
    _listeners: [dragover, dragleave, dropped]
  }
}
