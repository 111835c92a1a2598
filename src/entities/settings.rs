use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// Per-role theme overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleThemes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<Theme>,
}

impl RoleThemes {
    pub fn get(&self, role: Role) -> Option<Theme> {
        match role {
            Role::Client => self.client,
            Role::Enterprise => self.enterprise,
            Role::Admin => self.admin,
        }
    }

    pub fn set(&mut self, role: Role, theme: Theme) {
        match role {
            Role::Client => self.client = Some(theme),
            Role::Enterprise => self.enterprise = Some(theme),
            Role::Admin => self.admin = Some(theme),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_save: bool,
    pub language: String,
    #[serde(default)]
    pub role_themes: RoleThemes,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            auto_save: true,
            language: "en".to_string(),
            role_themes: RoleThemes::default(),
        }
    }
}

impl AppSettings {
    /// Shallow merge; role overrides are changed through `RoleThemes` only
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(auto_save) = patch.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(language) = &patch.language {
            self.language = language.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub auto_save: Option<bool>,
    pub language: Option<String>,
}
