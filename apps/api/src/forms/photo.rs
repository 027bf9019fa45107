//! Profile photo: permission → acquire → save. Removal goes through the
//! confirmation flow like any other delete.

use tracing::{info, warn};

use crate::collab::{CollabError, ImageSource, Permission};
use crate::models::ProfileImage;
use crate::store::CvDocument;

/// Asks the source for permission and an image. `Ok(None)` means the user
/// cancelled; nothing should change in that case.
pub async fn acquire_photo(source: &dyn ImageSource) -> Result<Option<ProfileImage>, CollabError> {
    if source.request_permission().await == Permission::Denied {
        warn!("photo permission denied");
        return Err(CollabError::PermissionDenied(
            "We need access to your photos to set a profile picture.".to_string(),
        ));
    }

    let image = source.acquire().await.into_result(CollabError::Image)?;
    match &image {
        None => info!("photo selection cancelled"),
        Some(image) if image.is_empty() => {
            return Err(CollabError::Image("the selected image has no data".to_string()))
        }
        Some(_) => {}
    }
    Ok(image)
}

pub fn save_photo(document: &mut CvDocument, image: ProfileImage) {
    document.set_profile_image(image);
}
