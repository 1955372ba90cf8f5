use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::models::requests::{
    FoodRegionList, LoginResponse, NewsList, ShelterList, SosAlertList,
};
use crate::models::{
    DateWindow, FoodRegion, FoodRegionForm, GeoPoint, NewsForm, NewsItem, Radius, Shelter,
    ShelterForm, SosAlert, SosReceipt,
};
use crate::services::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("backend returned HTTP {0}")]
    Status(StatusCode),

    #[error("backend request timed out")]
    Timeout,

    #[error("could not decode backend response: {0}")]
    Decode(reqwest::Error),
}

impl BackendError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Transport(err)
        }
    }
}

/// HTTP client for the relief coordination backend.
///
/// Purely a wire adapter: every method maps one endpoint, attaches the bearer
/// token where the route is authenticated, and decodes the response envelope.
/// Distance filtering semantics belong to the backend; callers re-derive
/// display distances themselves.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("relief-client/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(BackendError::from_transport)?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query parameters for the uniform proximity listing. The `All` radius
    /// omits the `distance` parameter entirely; it is a flag, not a number.
    fn proximity_query(origin: GeoPoint, radius: Radius) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", origin.latitude.to_string()),
            ("longitude", origin.longitude.to_string()),
        ];
        if let Some(km) = radius.kilometers() {
            query.push(("distance", km.to_string()));
        }
        query
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(BackendError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "backend rejected request");
            return Err(BackendError::Status(status));
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(BackendError::Decode)
    }

    // ---- auth ----

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response: LoginResponse = self
            .fetch_json(self.http.post(self.url("/auth/login")).json(
                &serde_json::json!({ "email": email, "password": password }),
            ))
            .await?;
        Ok(response.into())
    }

    // ---- proximity listings ----

    pub async fn shelters(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<Shelter>, BackendError> {
        let list: ShelterList = self
            .fetch_json(
                self.http
                    .get(self.url("/shelter/list"))
                    .query(&Self::proximity_query(origin, radius)),
            )
            .await?;
        Ok(list.shelters)
    }

    pub async fn food_regions(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<FoodRegion>, BackendError> {
        let list: FoodRegionList = self
            .fetch_json(
                self.http
                    .get(self.url("/food/list"))
                    .query(&Self::proximity_query(origin, radius)),
            )
            .await?;
        Ok(list.food)
    }

    pub async fn news(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<NewsItem>, BackendError> {
        let list: NewsList = self
            .fetch_json(
                self.http
                    .get(self.url("/news/list"))
                    .query(&Self::proximity_query(origin, radius)),
            )
            .await?;
        Ok(list.news)
    }

    // ---- SOS ----

    pub async fn send_sos(
        &self,
        session: &Session,
        position: GeoPoint,
        persons: u32,
    ) -> Result<SosReceipt, BackendError> {
        self.fetch_json(
            self.http
                .post(self.url("/sos/sos"))
                .bearer_auth(session.access_token())
                .query(&[
                    ("latitude", position.latitude.to_string()),
                    ("longitude", position.longitude.to_string()),
                    ("persons", persons.to_string()),
                ]),
        )
        .await
    }

    /// Unresolved alerts near the admin within the given date window.
    pub async fn active_sos(
        &self,
        session: &Session,
        origin: GeoPoint,
        radius: Radius,
        window: DateWindow,
    ) -> Result<Vec<SosAlert>, BackendError> {
        let mut query = vec![
            ("admin_latitude", origin.latitude.to_string()),
            ("admin_longitude", origin.longitude.to_string()),
            ("start_date", window.start.format("%Y-%m-%d").to_string()),
            ("end_date", window.end.format("%Y-%m-%d").to_string()),
        ];
        if let Some(km) = radius.kilometers() {
            query.push(("radius", km.to_string()));
        }

        let list: SosAlertList = self
            .fetch_json(
                self.http
                    .get(self.url("/sos/all"))
                    .bearer_auth(session.access_token())
                    .query(&query),
            )
            .await?;
        Ok(list.sos_alerts)
    }

    pub async fn resolved_sos(&self, session: &Session) -> Result<Vec<SosAlert>, BackendError> {
        let list: SosAlertList = self
            .fetch_json(
                self.http
                    .get(self.url("/sos/resolved"))
                    .bearer_auth(session.access_token()),
            )
            .await?;
        Ok(list.sos_alerts)
    }

    pub async fn resolve_sos(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        self.send(
            self.http
                .put(self.url(&format!("/sos/resolve/{id}")))
                .bearer_auth(session.access_token()),
        )
        .await?;
        Ok(())
    }

    // ---- curation: shelters ----

    pub async fn add_shelter(
        &self,
        session: &Session,
        form: &ShelterForm,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .post(self.url("/shelter/add"))
                .bearer_auth(session.access_token())
                .multipart(shelter_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn update_shelter(
        &self,
        session: &Session,
        id: &str,
        form: &ShelterForm,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .put(self.url(&format!("/shelter/update/{id}")))
                .bearer_auth(session.access_token())
                .multipart(shelter_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_shelter(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        self.send(
            self.http
                .delete(self.url(&format!("/shelter/delete/{id}")))
                .bearer_auth(session.access_token()),
        )
        .await?;
        Ok(())
    }

    /// Shelters submitted by the calling admin, newest first.
    pub async fn my_shelters(&self, session: &Session) -> Result<Vec<Shelter>, BackendError> {
        let list: ShelterList = self
            .fetch_json(
                self.http
                    .get(self.url("/shelter/mine"))
                    .bearer_auth(session.access_token()),
            )
            .await?;
        Ok(list.shelters)
    }

    // ---- curation: food regions ----

    pub async fn add_food_region(
        &self,
        session: &Session,
        form: &FoodRegionForm,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .post(self.url("/food/add"))
                .bearer_auth(session.access_token())
                .multipart(food_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn update_food_region(
        &self,
        session: &Session,
        id: &str,
        form: &FoodRegionForm,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .put(self.url(&format!("/food/update/{id}")))
                .bearer_auth(session.access_token())
                .multipart(food_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_food_region(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .delete(self.url(&format!("/food/delete/{id}")))
                .bearer_auth(session.access_token()),
        )
        .await?;
        Ok(())
    }

    pub async fn my_food_regions(
        &self,
        session: &Session,
    ) -> Result<Vec<FoodRegion>, BackendError> {
        let list: FoodRegionList = self
            .fetch_json(
                self.http
                    .get(self.url("/food/mine"))
                    .bearer_auth(session.access_token()),
            )
            .await?;
        Ok(list.food)
    }

    // ---- curation: news ----

    pub async fn add_news(&self, session: &Session, form: &NewsForm) -> Result<(), BackendError> {
        self.send(
            self.http
                .post(self.url("/news/add"))
                .bearer_auth(session.access_token())
                .multipart(news_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn update_news(
        &self,
        session: &Session,
        id: &str,
        form: &NewsForm,
    ) -> Result<(), BackendError> {
        self.send(
            self.http
                .put(self.url(&format!("/news/update/{id}")))
                .bearer_auth(session.access_token())
                .multipart(news_multipart(form)?),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_news(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        self.send(
            self.http
                .delete(self.url(&format!("/news/delete/{id}")))
                .bearer_auth(session.access_token()),
        )
        .await?;
        Ok(())
    }

    pub async fn my_news(&self, session: &Session) -> Result<Vec<NewsItem>, BackendError> {
        let list: NewsList = self
            .fetch_json(
                self.http
                    .get(self.url("/news/mine"))
                    .bearer_auth(session.access_token()),
            )
            .await?;
        Ok(list.news)
    }
}

fn image_part(image: &crate::models::ImagePayload) -> Result<Part, BackendError> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(BackendError::Transport)
}

fn shelter_multipart(form: &ShelterForm) -> Result<Form, BackendError> {
    let mut multipart = Form::new()
        .text("name", form.name.clone())
        .text("address", form.address.clone())
        .text("pincode", form.pincode.clone())
        .text("latitude", form.latitude.to_string())
        .text("longitude", form.longitude.to_string());
    if let Some(description) = &form.description {
        multipart = multipart.text("description", description.clone());
    }
    if let Some(viewer) = form.viewer {
        multipart = multipart
            .text("userLatitude", viewer.latitude.to_string())
            .text("userLongitude", viewer.longitude.to_string());
    }
    if let Some(image) = &form.image {
        multipart = multipart.part("image", image_part(image)?);
    }
    Ok(multipart)
}

fn food_multipart(form: &FoodRegionForm) -> Result<Form, BackendError> {
    let mut multipart = Form::new()
        .text("address", form.address.clone())
        .text("pincode", form.pincode.clone())
        .text("description", form.description.clone())
        .text("latitude", form.latitude.to_string())
        .text("longitude", form.longitude.to_string());
    if let Some(viewer) = form.viewer {
        multipart = multipart
            .text("userLatitude", viewer.latitude.to_string())
            .text("userLongitude", viewer.longitude.to_string());
    }
    if let Some(image) = &form.image {
        multipart = multipart.part("image", image_part(image)?);
    }
    Ok(multipart)
}

fn news_multipart(form: &NewsForm) -> Result<Form, BackendError> {
    let mut multipart = Form::new()
        .text("title", form.title.clone())
        .text("description", form.description.clone())
        .text("latitude", form.latitude.to_string())
        .text("longitude", form.longitude.to_string());
    if let Some(image) = &form.image {
        multipart = multipart.part("image", image_part(image)?);
    }
    Ok(multipart)
}
