//! Avatar resolution: display name in, image URL out.

/// Default avatar service. Renders initials from the `name` parameter.
pub const UI_AVATARS_BASE_URL: &str = "https://ui-avatars.com/api/";

pub trait AvatarResolver: Send + Sync {
    fn avatar_url(&self, display_name: &str) -> String;
}

/// Resolver backed by an initials-avatar HTTP service.
#[derive(Debug, Clone)]
pub struct UiAvatars {
    base_url: String,
}

impl UiAvatars {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for UiAvatars {
    fn default() -> Self {
        Self::new(UI_AVATARS_BASE_URL)
    }
}

impl AvatarResolver for UiAvatars {
    fn avatar_url(&self, display_name: &str) -> String {
        format!(
            "{}?name={}",
            self.base_url,
            urlencoding::encode(display_name.trim())
        )
    }
}
