//! Declarative schemas for the project, role, and application forms.
//!
//! Each form holds raw field values exactly as typed. [`FormSchema::validate`]
//! checks every field, and either returns the validated draft or the inline
//! messages keyed by field name.

use super::validation::{has_min_chars, is_email_shaped, optional_text};
use super::{
    ApplicationDraft, Commitment, FieldErrors, ProjectDraft, ProjectStage, RoleDraft,
};

/// Raw form values that can be validated into a typed draft.
pub trait FormSchema: Clone + Default + PartialEq + Send + Sync {
    /// Validated output.
    type Output;

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the inline messages of every failing field.
    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

/// Minimum project title length.
pub const PROJECT_TITLE_MIN: usize = 3;
/// Minimum project description length.
pub const PROJECT_DESCRIPTION_MIN: usize = 20;
/// Minimum role description length.
pub const ROLE_DESCRIPTION_MIN: usize = 10;
/// Minimum experience and motivation length on applications.
pub const APPLICATION_TEXT_MIN: usize = 10;

/// Values of the create-project form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFormValues {
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// Category, e.g. "Fintech, Health, Education".
    pub category: String,
    /// Selected stage in wire spelling.
    pub stage: String,
}

impl Default for ProjectFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            stage: ProjectStage::default().as_str().to_owned(),
        }
    }
}

impl FormSchema for ProjectFormValues {
    type Output = ProjectDraft;

    fn validate(&self) -> Result<ProjectDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        if !has_min_chars(&self.title, PROJECT_TITLE_MIN) {
            errors.push("title", "Title must be at least 3 characters");
        }
        if !has_min_chars(&self.description, PROJECT_DESCRIPTION_MIN) {
            errors.push(
                "description",
                "Description must be at least 20 characters",
            );
        }
        if self.category.is_empty() {
            errors.push("category", "Please select a category");
        }
        let parsed_stage = self.stage.parse::<ProjectStage>();
        if parsed_stage.is_err() {
            errors.push("stage", "Please select a valid stage");
        }

        match parsed_stage {
            Ok(stage) if errors.is_empty() => Ok(ProjectDraft {
                title: self.title.clone(),
                description: self.description.clone(),
                category: self.category.clone(),
                stage,
            }),
            _ => Err(errors),
        }
    }
}

/// Values of the add-role sub-form on the create-project page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFormValues {
    /// Role title.
    pub title: String,
    /// Role description.
    pub description: String,
    /// Comma-separated skills, e.g. `"React, TypeScript, UI/UX"`.
    pub skills: String,
    /// Commitment in wire spelling.
    pub commitment: String,
    /// Remote flag.
    pub remote: bool,
}

impl Default for RoleFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            skills: String::new(),
            commitment: Commitment::default().as_str().to_owned(),
            remote: true,
        }
    }
}

impl FormSchema for RoleFormValues {
    type Output = RoleDraft;

    fn validate(&self) -> Result<RoleDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.title.is_empty() {
            errors.push("title", "Role title is required");
        }
        if !has_min_chars(&self.description, ROLE_DESCRIPTION_MIN) {
            errors.push(
                "description",
                "Please provide a more detailed description",
            );
        }
        let commitment = self.commitment.parse::<Commitment>();
        if commitment.is_err() {
            errors.push("commitment", "Please select a valid commitment");
        }

        match commitment {
            Ok(commitment) if errors.is_empty() => Ok(RoleDraft {
                title: self.title.clone(),
                description: self.description.clone(),
                skills: normalize_skills(&self.skills),
                commitment,
                remote: self.remote,
            }),
            _ => Err(errors),
        }
    }
}

/// Split a comma-separated skill string into trimmed, non-empty entries.
///
/// # Examples
/// ```
/// use teamup_client::domain::normalize_skills;
///
/// assert_eq!(
///     normalize_skills("React, TypeScript,  UI/UX"),
///     vec!["React", "TypeScript", "UI/UX"],
/// );
/// ```
#[must_use]
pub fn normalize_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Values of the apply-for-role form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFormValues {
    /// Relevant experience.
    pub experience: String,
    /// Why the applicant is interested.
    pub motivation: String,
    /// Optional portfolio, LinkedIn, or GitHub link.
    pub portfolio: String,
    /// Optional phone number.
    pub phone: String,
    /// Contact email address.
    pub email: String,
}

impl FormSchema for ApplicationFormValues {
    type Output = ApplicationDraft;

    fn validate(&self) -> Result<ApplicationDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        if !has_min_chars(&self.experience, APPLICATION_TEXT_MIN) {
            errors.push(
                "experience",
                "Please describe your experience in at least 10 characters",
            );
        }
        if !has_min_chars(&self.motivation, APPLICATION_TEXT_MIN) {
            errors.push(
                "motivation",
                "Please tell us why you are interested in at least 10 characters",
            );
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_email_shaped(email) {
            errors.push("email", "Please enter a valid email address");
        }

        errors.into_result(|| ApplicationDraft {
            experience: self.experience.clone(),
            motivation: self.motivation.clone(),
            portfolio: optional_text(&self.portfolio),
            contact_phone: optional_text(&self.phone),
            contact_email: email.to_owned(),
        })
    }
}
