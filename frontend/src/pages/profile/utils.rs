use base64::{engine::general_purpose::STANDARD, Engine as _};
use leptos::*;

use crate::api::{UpdateProfileRequest, UserProfile};

/// Editable copy of the profile fields.
#[derive(Clone, Copy)]
pub struct ProfileForm {
    pub first_name: RwSignal<String>,
    pub last_name: RwSignal<String>,
    pub email: RwSignal<String>,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            first_name: create_rw_signal(String::new()),
            last_name: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
        }
    }
}

impl ProfileForm {
    pub fn fill(&self, user: &UserProfile) {
        self.first_name.set(user.first_name.clone().unwrap_or_default());
        self.last_name.set(user.last_name.clone().unwrap_or_default());
        self.email.set(user.email.clone().unwrap_or_default());
    }

    pub fn request(&self, avatar_url: Option<String>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            first_name: self.first_name.get_untracked().trim().to_string(),
            last_name: self.last_name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            avatar_url,
        }
    }
}

/// Returns the i18n key of the first invalid field.
pub fn validate_profile(request: &UpdateProfileRequest) -> Result<(), &'static str> {
    if request.first_name.is_empty() {
        return Err("profile.first_name_required");
    }
    let email = request.email.as_str();
    if !email.is_empty() {
        let valid = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid {
            return Err("profile.invalid_email");
        }
    }
    Ok(())
}

pub fn validate_avatar(mime: Option<&str>) -> Result<(), &'static str> {
    match mime {
        Some(mime) if mime.starts_with("image/") => Ok(()),
        _ => Err("profile.avatar_not_image"),
    }
}

/// Inline preview of a picked file before the upload completes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(first: &str, email: &str) -> UpdateProfileRequest {
        UpdateProfileRequest {
            first_name: first.into(),
            last_name: String::new(),
            email: email.into(),
            avatar_url: None,
        }
    }

    #[test]
    fn first_name_is_required() {
        assert_eq!(
            validate_profile(&request("", "a@b.io")),
            Err("profile.first_name_required")
        );
    }

    #[test]
    fn email_is_optional_but_checked() {
        assert_eq!(validate_profile(&request("Alice", "")), Ok(()));
        assert_eq!(validate_profile(&request("Alice", "alice@example.com")), Ok(()));
        assert_eq!(
            validate_profile(&request("Alice", "alice")),
            Err("profile.invalid_email")
        );
        assert_eq!(
            validate_profile(&request("Alice", "@example.com")),
            Err("profile.invalid_email")
        );
    }

    #[test]
    fn only_images_are_accepted() {
        assert_eq!(validate_avatar(Some("image/png")), Ok(()));
        assert_eq!(validate_avatar(Some("text/plain")), Err("profile.avatar_not_image"));
        assert_eq!(validate_avatar(None), Err("profile.avatar_not_image"));
    }

    #[test]
    fn data_url_embeds_base64_payload() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }
}
