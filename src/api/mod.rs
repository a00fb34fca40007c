//! Endpoint adapters, one per resource family.
//!
//! Every family shares the generic [`Resource`] CRUD surface over
//! `/<resource>`; families with domain verbs add them in their own module.

pub mod appointments;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod doctors;
pub mod meta;
pub mod patient_history;
pub mod representatives;
pub mod scans;
pub mod stock;
pub mod users;

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::http::{unwrap_entity, ApiClient, ApiError, Page, Query};
use crate::models::{Branch, Identified, Patient, Radiologist, ScanCategory};
use crate::validation::{BranchDraft, PatientDraft, RadiologistDraft, ScanCategoryDraft};

pub use appointments::{AppointmentsApi, StatusReport};
pub use audit::{AuditApi, AuditFilter};
pub use auth::{AuthApi, AuthSession, LoginOutcome, RegisterOutcome, TwoFactorChallenge, TwoFactorSetup};
pub use dashboard::DashboardApi;
pub use doctors::{DoctorLookup, DoctorsApi};
pub use meta::MetaApi;
pub use patient_history::PatientHistoryApi;
pub use representatives::RepresentativesApi;
pub use scans::ScansApi;
pub use stock::StockApi;
pub use users::UsersApi;

pub type PatientsApi = Resource<Patient, PatientDraft>;
pub type RadiologistsApi = Resource<Radiologist, RadiologistDraft>;
pub type BranchesApi = Resource<Branch, BranchDraft>;
pub type ScanCategoriesApi = Resource<ScanCategory, ScanCategoryDraft>;

/// Upper bound used when a screen needs a whole catalog for a dropdown.
const OPTIONS_LIMIT: u32 = 1000;

/// The CRUD surface index screens are generic over.
pub trait CrudApi: Send + Sync {
    type Item: Identified + Clone + Send + Sync + 'static;
    type Draft: Serialize + Send + Sync;

    fn list(&self, query: &Query) -> impl Future<Output = Result<Page<Self::Item>, ApiError>> + Send;

    fn create(&self, draft: &Self::Draft) -> impl Future<Output = Result<Self::Item, ApiError>> + Send;

    fn update(
        &self,
        id: &str,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Self::Item, ApiError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Put,
    Patch,
}

// ═══════════════════════════════════════════════════════════
// Resource
// ═══════════════════════════════════════════════════════════

/// CRUD adapter over one REST collection. `T` is the entity read back,
/// `D` the body sent on create and update.
pub struct Resource<T, D> {
    client: ApiClient,
    path: &'static str,
    items_key: &'static str,
    entity_key: &'static str,
    update_verb: UpdateVerb,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<T, D> Clone for Resource<T, D> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            items_key: self.items_key,
            entity_key: self.entity_key,
            update_verb: self.update_verb,
            _marker: PhantomData,
        }
    }
}

impl<T, D> Resource<T, D>
where
    T: DeserializeOwned + Send,
    D: Serialize + Sync,
{
    /// `items_key` names the list field, `entity_key` the wrapper of a
    /// single entity (`{patient: {...}}`).
    pub fn new(client: &ApiClient, path: &'static str, items_key: &'static str, entity_key: &'static str) -> Self {
        Self {
            client: client.clone(),
            path,
            items_key,
            entity_key,
            update_verb: UpdateVerb::Put,
            _marker: PhantomData,
        }
    }

    /// Update with PATCH instead of PUT.
    pub fn patching(mut self) -> Self {
        self.update_verb = UpdateVerb::Patch;
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn update_verb(&self) -> UpdateVerb {
        self.update_verb
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub(crate) fn member(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    pub(crate) fn entity(&self, value: serde_json::Value) -> Result<T, ApiError> {
        unwrap_entity(value, self.entity_key)
    }

    pub(crate) fn page(&self, value: serde_json::Value) -> Result<Page<T>, ApiError> {
        Page::from_value(value, self.items_key)
    }

    pub async fn list(&self, query: &Query) -> Result<Page<T>, ApiError> {
        let value = self.client.get_value(self.path, query).await?;
        self.page(value)
    }

    /// Every entry, for dropdowns.
    pub async fn all(&self) -> Result<Vec<T>, ApiError> {
        let query = Query::new().page(1, OPTIONS_LIMIT);
        Ok(self.list(&query).await?.items)
    }

    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        let value = self.client.get_value(&self.member(id), &Query::new()).await?;
        self.entity(value)
    }

    pub async fn create(&self, body: &D) -> Result<T, ApiError> {
        let value = self.client.post(self.path, body).await?;
        self.entity(value)
    }

    pub async fn update(&self, id: &str, body: &D) -> Result<T, ApiError> {
        let path = self.member(id);
        let value = match self.update_verb {
            UpdateVerb::Put => self.client.put(&path, body).await?,
            UpdateVerb::Patch => self.client.patch(&path, body).await?,
        };
        self.entity(value)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&self.member(id)).await?;
        Ok(())
    }

    /// Free-text search (`?search=`).
    pub async fn search(&self, text: &str) -> Result<Vec<T>, ApiError> {
        let query = Query::new().set("search", text);
        Ok(self.list(&query).await?.items)
    }
}

impl<T, D> CrudApi for Resource<T, D>
where
    T: DeserializeOwned + Identified + Clone + Send + Sync + 'static,
    D: Serialize + Send + Sync,
{
    type Item = T;
    type Draft = D;

    fn list(&self, query: &Query) -> impl Future<Output = Result<Page<T>, ApiError>> + Send {
        Resource::list(self, query)
    }

    fn create(&self, draft: &D) -> impl Future<Output = Result<T, ApiError>> + Send {
        Resource::create(self, draft)
    }

    fn update(&self, id: &str, draft: &D) -> impl Future<Output = Result<T, ApiError>> + Send {
        Resource::update(self, id, draft)
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send {
        Resource::delete(self, id)
    }
}

// ═══════════════════════════════════════════════════════════
// Bundle
// ═══════════════════════════════════════════════════════════

/// Every adapter, sharing one client.
#[derive(Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub users: UsersApi,
    pub patients: PatientsApi,
    pub doctors: DoctorsApi,
    pub radiologists: RadiologistsApi,
    pub appointments: AppointmentsApi,
    pub scans: ScansApi,
    pub scan_categories: ScanCategoriesApi,
    pub stock: StockApi,
    pub branches: BranchesApi,
    pub representatives: RepresentativesApi,
    pub patient_history: PatientHistoryApi,
    pub audit: AuditApi,
    pub meta: MetaApi,
    pub dashboard: DashboardApi,
}

impl Api {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client),
            users: users::users(client),
            patients: Resource::new(client, "/patients", "patients", "patient"),
            doctors: doctors::doctors(client),
            radiologists: Resource::new(client, "/radiologists", "radiologists", "radiologist"),
            appointments: appointments::appointments(client),
            scans: scans::scans(client),
            scan_categories: Resource::new(client, "/scan-categories", "scanCategories", "scanCategory"),
            stock: stock::stock(client),
            branches: Resource::new(client, "/branches", "branches", "branch"),
            representatives: representatives::representatives(client),
            patient_history: patient_history::patient_history(client),
            audit: AuditApi::new(client),
            meta: MetaApi::new(client),
            dashboard: DashboardApi::new(client),
        }
    }
}
