//! Client-side photo validation. Rejections are reported inline and never
//! reach the network.

/// Largest accepted photo: 16 MiB, matching the server's request cap.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoRejection {
    NotAnImage,
    TooLarge,
}

impl PhotoRejection {
    pub fn user_message(self) -> &'static str {
        match self {
            PhotoRejection::NotAnImage => "Please select a valid image file",
            PhotoRejection::TooLarge => "Image size must be less than 16MB",
        }
    }
}

/// Accepts any `image/*` MIME type up to the size ceiling.
pub fn validate_photo(mime_type: &str, size_bytes: u64) -> Result<(), PhotoRejection> {
    if !mime_type.starts_with("image/") {
        return Err(PhotoRejection::NotAnImage);
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(PhotoRejection::TooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_up_to_the_ceiling() {
        assert_eq!(validate_photo("image/jpeg", 1024), Ok(()));
        assert_eq!(validate_photo("image/png", MAX_UPLOAD_BYTES), Ok(()));
        assert_eq!(validate_photo("image/webp", 0), Ok(()));
    }

    #[test]
    fn rejects_non_image_types_before_size() {
        assert_eq!(
            validate_photo("application/pdf", 10),
            Err(PhotoRejection::NotAnImage)
        );
        assert_eq!(
            validate_photo("text/html", MAX_UPLOAD_BYTES + 1),
            Err(PhotoRejection::NotAnImage)
        );
    }

    #[test]
    fn rejects_oversized_images() {
        assert_eq!(
            validate_photo("image/jpeg", MAX_UPLOAD_BYTES + 1),
            Err(PhotoRejection::TooLarge)
        );
    }
}
