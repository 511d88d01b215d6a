//! Port for the `applications` table.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{Application, ApplicationWithProject, NewApplication, UserId};

/// Reads and inserts against `applications`.
///
/// Adapters must not deduplicate: the service accepts several applications
/// from one applicant to the same role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert one application row.
    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<Application, BackendError>;

    /// List an applicant's applications, newest first, joined through the
    /// role to its project.
    async fn list_applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ApplicationWithProject>, BackendError>;
}
