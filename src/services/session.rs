use crate::models::LoginResponse;

/// An authenticated session with the relief backend.
///
/// Tokens live here and nowhere else; anything that needs authentication
/// takes a `&Session` explicitly instead of reaching into ambient storage.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
    refresh_token: String,
    user_id: String,
    username: String,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session::new(
            response.access_token,
            response.refresh_token,
            response.id,
            response.username,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_login_response() {
        let session: Session = LoginResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            id: "42".to_string(),
            username: "asha".to_string(),
        }
        .into();

        assert_eq!(session.access_token(), "at");
        assert_eq!(session.refresh_token(), "rt");
        assert_eq!(session.user_id(), "42");
        assert_eq!(session.username(), "asha");
    }
}
