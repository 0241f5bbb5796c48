//! Contract for whatever stores uploaded files.
//!
//! File storage lives outside this crate, so no concrete uploader ships
//! with it. The embedding application implements [`FileUploader`] against
//! its own storage (an object store bucket, a backend upload endpoint) and
//! hands it to [`MehfilForm::attach_audio`](crate::forms::mehfil::MehfilForm::attach_audio).
//! Tests use [`mock::MockFileUploader`].

use crate::transport::ApiResult;

/// Stores a file and returns the public URL it can be fetched from.
///
/// Implementations must return a URL that already resolves to the stored
/// bytes; the form saves it verbatim as the record's `filepath`. Failures
/// are reported as [`ApiError`](crate::transport::ApiError) and leave the
/// form untouched.
pub trait FileUploader {
    fn upload(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String>;
}

impl<T: FileUploader + ?Sized> FileUploader for &T {
    fn upload(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String> {
        (**self).upload(file_name, bytes)
    }
}

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock {
    use mockall::mock;

    use super::FileUploader;
    use crate::transport::ApiResult;

    mock! {
        pub FileUploader {}

        impl FileUploader for FileUploader {
            fn upload(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String>;
        }
    }
}
