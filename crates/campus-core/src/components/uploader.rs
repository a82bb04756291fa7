use campus_shared::Severity;
use tracing::{
  debug,
  warn
};

use crate::config::UploadConfig;
use crate::intake::{
  IntakeFile,
  is_image,
  validate_file
};
use crate::notify::Notifier;
use crate::store::Store;

/// An accepted file waiting for upload.
/// `P` is the host's preview handle (an
/// object URL in the browser).
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile<F, P> {
  pub file:      F,
  pub name:      String,
  pub size:      u64,
  pub mime_type: String,
  pub preview:   Option<P>
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploaderState<F, P> {
  pub files: Vec<StagedFile<F, P>>
}

impl<F, P> Default for UploaderState<F, P> {
  fn default() -> Self {
    Self { files: vec![] }
  }
}

pub struct Uploader<F, P> {
  options: UploadConfig,
  store:   Store<UploaderState<F, P>>
}

impl<F, P> Uploader<F, P>
where
  F: IntakeFile + Clone + 'static,
  P: Clone + 'static
{
  pub fn new(options: UploadConfig) -> Self {
    Self {
      options,
      store: Store::new(
        UploaderState::default()
      )
    }
  }

  pub fn options(&self) -> &UploadConfig {
    &self.options
  }

  pub fn store(
    &self
  ) -> &Store<UploaderState<F, P>> {
    &self.store
  }

  /// Validates and stages a batch. Without
  /// multi-select the batch replaces what
  /// was staged before. Rejections become
  /// error toasts. Returns how many files
  /// were staged.
  pub fn handle_files<N, M>(
    &self,
    incoming: Vec<F>,
    notifier: &N,
    mut make_preview: M
  ) -> usize
  where
    N: Notifier + ?Sized,
    M: FnMut(&F) -> Option<P>
  {
    let mut accepted = Vec::new();
    for file in incoming {
      let meta = file.meta();
      match validate_file(
        &meta,
        &self.options
      ) {
        | Ok(()) => {
          let preview =
            if is_image(&meta.mime_type) {
              make_preview(&file)
            } else {
              None
            };
          accepted.push(StagedFile {
            file,
            name: meta.name,
            size: meta.size,
            mime_type: meta.mime_type,
            preview
          });
        }
        | Err(rejection) => {
          warn!(
            file = %meta.name,
            reason = %rejection,
            "rejected incoming file"
          );
          notifier.notify(
            &rejection.to_string(),
            Severity::Error
          );
        }
      }
    }

    let staged = accepted.len();
    let multiple = self.options.multiple;
    self.store.update(move |state| {
      if !multiple {
        state.files.clear();
      }
      state.files.extend(accepted);
      // Several files dropped at once with
      // multi-select off: the last one wins.
      if !multiple && state.files.len() > 1
      {
        let keep_from =
          state.files.len() - 1;
        state.files.drain(..keep_from);
      }
    });
    debug!(staged, "handled file batch");
    staged
  }

  pub fn remove_file(
    &self,
    index: usize
  ) -> Option<StagedFile<F, P>> {
    self.store.update(|state| {
      (index < state.files.len())
        .then(|| state.files.remove(index))
    })
  }
}
