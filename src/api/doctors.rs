use std::future::Future;

use crate::http::{ApiClient, ApiError};
use crate::models::Doctor;
use crate::validation::DoctorDraft;

use super::Resource;

pub type DoctorsApi = Resource<Doctor, DoctorDraft>;

pub(crate) fn doctors(client: &ApiClient) -> DoctorsApi {
    Resource::new(client, "/doctors", "doctors", "doctor")
}

/// What the doctor autocomplete needs: search and inline registration.
pub trait DoctorLookup: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Doctor>, ApiError>> + Send;

    fn register(&self, draft: &DoctorDraft) -> impl Future<Output = Result<Doctor, ApiError>> + Send;
}

impl DoctorLookup for DoctorsApi {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Doctor>, ApiError>> + Send {
        Resource::search(self, query)
    }

    fn register(&self, draft: &DoctorDraft) -> impl Future<Output = Result<Doctor, ApiError>> + Send {
        Resource::create(self, draft)
    }
}
