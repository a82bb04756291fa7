use std::rc::Rc;

use campus_core::components::{
  StagedFile,
  Uploader
};
use campus_core::config::UploadConfig;
use campus_core::intake::format_file_size;
use web_sys::{
  Element,
  HtmlInputElement
};
use yew::{
  Callback,
  Event,
  Html,
  MouseEvent,
  NodeRef,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_node_ref
};

use super::use_store;
use crate::AppServices;
use crate::dropzone::{
  Preview,
  WebFile,
  files_from_list,
  setup_drop_zone
};

type WebUploader = Uploader<WebFile, Preview>;

#[derive(Properties, PartialEq)]
pub struct FileUploaderProps {
  pub services: AppServices,
  pub options:  UploadConfig
}

#[function_component(FileUploader)]
pub fn file_uploader(
  props: &FileUploaderProps
) -> Html {
  let uploader = use_memo(
    props.options.clone(),
    |options| WebUploader::new(options.clone())
  );
  let state = use_store(uploader.store());
  let zone_ref = use_node_ref();

  let on_files = {
    let uploader = Rc::clone(&uploader);
    let notifier =
      Rc::clone(&props.services.notifier);
    Callback::from(
      move |files: Vec<WebFile>| {
        uploader.handle_files(
          files,
          notifier.as_ref(),
          |file| Some(Preview::of(file))
        );
      }
    )
  };

  {
    let on_files = on_files.clone();
    use_effect_with(
      zone_ref.clone(),
      move |zone_ref: &NodeRef| {
        let zone = zone_ref
          .cast::<Element>()
          .map(|element| {
            setup_drop_zone(
              &element,
              move |files| on_files.emit(files)
            )
          });
        move || drop(zone)
      }
    );
  }

  let onchange = {
    let on_files = on_files.clone();
    Callback::from(move |event: Event| {
      let input: HtmlInputElement =
        event.target_unchecked_into();
      on_files.emit(files_from_list(
        input.files()
      ));
      input.set_value("");
    })
  };

  let accept =
    props.options.allowed_types.join(",");

  html! {
      <div class="file-uploader">
          <div ref={zone_ref} class="drop-zone">
              <i class="fas fa-cloud-upload-alt"></i>
              <p>{ "Drag files here or click to browse" }</p>
              <input
                  type="file"
                  accept={accept}
                  multiple={props.options.multiple}
                  {onchange}
              />
          </div>
          <ul class="file-list">
              {
                  for state.files.iter().enumerate().map(|(index, staged)| {
                      staged_row(index, staged, &uploader)
                  })
              }
          </ul>
      </div>
  }
}

fn staged_row(
  index: usize,
  staged: &StagedFile<WebFile, Preview>,
  uploader: &Rc<WebUploader>
) -> Html {
  let onclick = {
    let uploader = Rc::clone(uploader);
    Callback::from(move |_: MouseEvent| {
      if let Some(removed) =
        uploader.remove_file(index)
      {
        tracing::debug!(
          file = %removed.name,
          "removed staged file"
        );
      }
    })
  };

  html! {
      <li class="file-item">
          {
              match &staged.preview {
                  | Some(preview) => html! {
                      <img class="file-preview" src={preview.url()} alt={staged.name.clone()} />
                  },
                  | None => html! { <i class="fas fa-file"></i> }
              }
          }
          <span class="file-name">{ &staged.name }</span>
          <span class="file-size">{ format_file_size(staged.size) }</span>
          <button type="button" class="file-remove" {onclick}>
              <i class="fas fa-times"></i>
          </button>
      </li>
  }
}
