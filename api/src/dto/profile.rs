use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use lp_core::services::ProfileUpdate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(request: ProfileUpdateRequest) -> Self {
        ProfileUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        }
    }
}

/// Body of `POST /api/client/logout`: the login time of the session being closed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(alias = "loginTime")]
    pub login_time: DateTime<Utc>,
}
