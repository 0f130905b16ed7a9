//! Client-side form validation.
//!
//! Every form checks its input before anything is sent and reports failures
//! per field. Whitespace-only input counts as empty.

use serde::{Deserialize, Serialize};

use crate::api::models::{GameUserBody, LevelType, NewLevel, Stage};
use crate::error::ValidationErrors;

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipientForm {
    #[serde(default)]
    pub game_user_id: String,
}

impl AddRecipientForm {
    pub fn new(game_user_id: impl Into<String>) -> Self {
        Self {
            game_user_id: game_user_id.into(),
        }
    }

    pub fn validate(&self) -> Result<GameUserBody, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let game_user_id = self.game_user_id.trim();
        if game_user_id.is_empty() {
            errors.add("gameUserId", "Game User ID is required");
        }
        errors.into_result(GameUserBody {
            game_user_id: game_user_id.to_string(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDraft {
    pub target: String,
    pub description: String,
    pub image: String,
}

impl StageDraft {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }
}

/// Editable level before submission. Stage numbers are not part of the
/// draft; they come from the stage's position when the draft is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDraft {
    #[serde(rename = "type")]
    pub level_type: LevelType,
    pub subtype: String,
    pub name: String,
    pub description: String,
    pub stage: Vec<StageDraft>,
}

impl Default for LevelDraft {
    fn default() -> Self {
        Self {
            level_type: LevelType::default(),
            subtype: String::new(),
            name: String::new(),
            description: String::new(),
            stage: vec![StageDraft::default()],
        }
    }
}

impl LevelDraft {
    /// Parse a draft from YAML. JSON documents are valid YAML, so both work.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn add_stage(&mut self, stage: StageDraft) {
        self.stage.push(stage);
    }

    /// The last remaining stage cannot be removed
    pub fn remove_stage(&mut self, index: usize) -> bool {
        if self.stage.len() <= 1 || index >= self.stage.len() {
            return false;
        }
        self.stage.remove(index);
        true
    }

    pub fn validate(&self) -> Result<NewLevel, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        }
        if self.stage.is_empty() {
            errors.add("stage", "At least one stage is required");
        }

        let mut stages = Vec::with_capacity(self.stage.len());
        for (index, draft) in self.stage.iter().enumerate() {
            let target = draft.target.trim();
            if target.is_empty() {
                errors.add(format!("stage.{}.target", index), "Target is required");
            }
            stages.push(Stage {
                number: index as u32,
                target: target.to_string(),
                description: draft.description.trim().to_string(),
                image: draft.image.trim().to_string(),
            });
        }

        errors.into_result(NewLevel {
            level_type: self.level_type,
            subtype: self.subtype.trim().to_string(),
            name: name.to_string(),
            description: self.description.trim().to_string(),
            stage: stages,
        })
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "Username is required");
        }
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Confirm Password is required");
        } else if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords don't match");
        }
        errors.into_result(())
    }
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}
