//! Wire formats for the provider token and profile endpoints.

use serde::Deserialize;

use crate::domain::ProviderProfile;

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub access_token: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubUserDto {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl GitHubUserDto {
    pub(super) fn into_profile(self) -> ProviderProfile {
        ProviderProfile {
            id: self.id.to_string(),
            name: Some(self.name.unwrap_or(self.login)),
            email: self.email,
            image: self.avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FacebookUserDto {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<FacebookPictureDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FacebookPictureDto {
    pub data: FacebookPictureDataDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct FacebookPictureDataDto {
    pub url: Option<String>,
}

impl FacebookUserDto {
    pub(super) fn into_profile(self) -> ProviderProfile {
        ProviderProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            image: self.picture.and_then(|picture| picture.data.url),
        }
    }
}
