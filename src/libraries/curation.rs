use tracing::warn;

use crate::models::{
    FoodRegion, FoodRegionForm, GeoPoint, ImagePayload, NewsForm, NewsItem, Shelter, ShelterForm,
    ValidationError,
};
use crate::services::backend::{BackendClient, BackendError};
use crate::services::notify::{Notice, Notifier};
use crate::services::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum CurationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Admin write surface for shelters, food regions, and news.
///
/// Forms are validated client-side before any bytes go out: coordinates must
/// be in-domain and an `add` must carry a non-empty image. Each operation
/// produces exactly one notice.
pub struct Curator<'a> {
    api: &'a BackendClient,
    session: &'a Session,
    notifier: &'a dyn Notifier,
}

impl<'a> Curator<'a> {
    pub fn new(api: &'a BackendClient, session: &'a Session, notifier: &'a dyn Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    // ---- shelters ----

    pub async fn add_shelter(&self, form: &ShelterForm) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, true)?;
        let result = self.api.add_shelter(self.session, form).await;
        self.finish(result, "Shelter added successfully.", "Failed to add shelter.")
    }

    pub async fn update_shelter(&self, id: &str, form: &ShelterForm) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, false)?;
        let result = self.api.update_shelter(self.session, id, form).await;
        self.finish(result, "Shelter updated successfully.", "Failed to update shelter.")
    }

    pub async fn delete_shelter(&self, id: &str) -> Result<(), CurationError> {
        let result = self.api.delete_shelter(self.session, id).await;
        self.finish(result, "Shelter deleted successfully.", "Failed to delete shelter.")
    }

    pub async fn my_shelters(&self) -> Result<Vec<Shelter>, CurationError> {
        self.listing(
            self.api.my_shelters(self.session).await,
            "Failed to load your shelters.",
        )
    }

    // ---- food regions ----

    pub async fn add_food_region(&self, form: &FoodRegionForm) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, true)?;
        let result = self.api.add_food_region(self.session, form).await;
        self.finish(
            result,
            "Food providing region added successfully.",
            "Failed to add food providing region.",
        )
    }

    pub async fn update_food_region(
        &self,
        id: &str,
        form: &FoodRegionForm,
    ) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, false)?;
        let result = self.api.update_food_region(self.session, id, form).await;
        self.finish(
            result,
            "Food providing region updated successfully.",
            "Failed to update food providing region.",
        )
    }

    pub async fn delete_food_region(&self, id: &str) -> Result<(), CurationError> {
        let result = self.api.delete_food_region(self.session, id).await;
        self.finish(
            result,
            "Food providing region deleted successfully.",
            "Failed to delete food providing region.",
        )
    }

    pub async fn my_food_regions(&self) -> Result<Vec<FoodRegion>, CurationError> {
        self.listing(
            self.api.my_food_regions(self.session).await,
            "Failed to load your food providing regions.",
        )
    }

    // ---- news ----

    pub async fn add_news(&self, form: &NewsForm) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, true)?;
        let result = self.api.add_news(self.session, form).await;
        self.finish(result, "News added successfully.", "Failed to add news.")
    }

    pub async fn update_news(&self, id: &str, form: &NewsForm) -> Result<(), CurationError> {
        self.check(form.position(), &form.image, false)?;
        let result = self.api.update_news(self.session, id, form).await;
        self.finish(result, "News updated successfully.", "Failed to update news.")
    }

    pub async fn delete_news(&self, id: &str) -> Result<(), CurationError> {
        let result = self.api.delete_news(self.session, id).await;
        self.finish(result, "News deleted successfully.", "Failed to delete news.")
    }

    pub async fn my_news(&self) -> Result<Vec<NewsItem>, CurationError> {
        self.listing(
            self.api.my_news(self.session).await,
            "Failed to load your news.",
        )
    }

    // ---- shared ----

    fn check(
        &self,
        position: GeoPoint,
        image: &Option<ImagePayload>,
        image_required: bool,
    ) -> Result<(), CurationError> {
        if let Err(err) = validate_form(position, image, image_required) {
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }
        Ok(())
    }

    fn finish(
        &self,
        result: Result<(), BackendError>,
        done: &str,
        failed: &str,
    ) -> Result<(), CurationError> {
        match result {
            Ok(()) => {
                self.notifier.notify(Notice::success(done));
                Ok(())
            }
            Err(err) => {
                warn!(%err, "{failed}");
                self.notifier.notify(Notice::error(failed));
                Err(err.into())
            }
        }
    }

    fn listing<T>(
        &self,
        result: Result<Vec<T>, BackendError>,
        failed: &str,
    ) -> Result<Vec<T>, CurationError> {
        result.map_err(|err| {
            warn!(%err, "{failed}");
            self.notifier.notify(Notice::error(failed));
            err.into()
        })
    }
}

fn validate_form(
    position: GeoPoint,
    image: &Option<ImagePayload>,
    image_required: bool,
) -> Result<(), ValidationError> {
    if !position.is_valid() {
        return Err(ValidationError::InvalidCoordinates);
    }
    match image {
        Some(payload) if payload.bytes.is_empty() => Err(ValidationError::EmptyImage),
        None if image_required => Err(ValidationError::MissingImage),
        _ => Ok(()),
    }
}
