//! In-memory row store
//!
//! Implements both repository ports over one pair of tables so the
//! owner-scoped joins (response counts per form, responses per owner) can
//! be answered without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::aggregates::{FormRecord, ResponseRecord};
use crate::domain::value_objects::{FormId, OwnerId};
use crate::ports::outbound::{FormRepository, RepoResult, RepositoryError, ResponseRepository};

#[derive(Default)]
pub struct InMemoryFormStore {
    forms: RwLock<HashMap<FormId, FormRecord>>,
    responses: RwLock<Vec<ResponseRecord>>,
}

impl InMemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormStore {
    async fn insert(&self, form: &FormRecord) -> RepoResult<()> {
        let mut forms = self.forms.write();
        if forms.contains_key(form.id()) {
            return Err(RepositoryError::Conflict(form.id().to_string()));
        }
        forms.insert(form.id().clone(), form.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &FormId) -> RepoResult<Option<FormRecord>> {
        Ok(self.forms.read().get(id).cloned())
    }

    async fn update_owned(&self, form: &FormRecord) -> RepoResult<()> {
        let mut forms = self.forms.write();
        match forms.get_mut(form.id()) {
            Some(stored) if stored.owner_id() == form.owner_id() => {
                *stored = form.clone();
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(form.id().to_string())),
        }
    }

    async fn find_by_owner_with_response_counts(
        &self,
        owner: &OwnerId,
    ) -> RepoResult<Vec<(FormRecord, u64)>> {
        let forms = self.forms.read();
        let responses = self.responses.read();
        let mut counts: HashMap<&FormId, u64> = HashMap::new();
        for response in responses.iter() {
            *counts.entry(&response.form_id).or_default() += 1;
        }
        let mut rows: Vec<(FormRecord, u64)> = forms
            .values()
            .filter(|f| f.is_owned_by(owner))
            .map(|f| (f.clone(), counts.get(f.id()).copied().unwrap_or(0)))
            .collect();
        rows.sort_by(|a, b| b.0.created_at().cmp(&a.0.created_at()));
        Ok(rows)
    }

    async fn count_by_owner(&self, owner: &OwnerId) -> RepoResult<u64> {
        Ok(self
            .forms
            .read()
            .values()
            .filter(|f| f.is_owned_by(owner))
            .count() as u64)
    }

    async fn count_published_by_owner(&self, owner: &OwnerId) -> RepoResult<u64> {
        Ok(self
            .forms
            .read()
            .values()
            .filter(|f| f.is_owned_by(owner) && f.is_published())
            .count() as u64)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryFormStore {
    async fn insert(&self, response: &ResponseRecord) -> RepoResult<()> {
        if !self.forms.read().contains_key(&response.form_id) {
            return Err(RepositoryError::NotFound(response.form_id.to_string()));
        }
        self.responses.write().push(response.clone());
        Ok(())
    }

    async fn find_by_form(&self, form_id: &FormId) -> RepoResult<Vec<ResponseRecord>> {
        let mut rows: Vec<ResponseRecord> = self
            .responses
            .read()
            .iter()
            .filter(|r| &r.form_id == form_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn count_by_form(&self, form_id: &FormId) -> RepoResult<u64> {
        Ok(self
            .responses
            .read()
            .iter()
            .filter(|r| &r.form_id == form_id)
            .count() as u64)
    }

    async fn count_by_owner(&self, owner: &OwnerId) -> RepoResult<u64> {
        let forms = self.forms.read();
        Ok(self
            .responses
            .read()
            .iter()
            .filter(|r| forms.get(&r.form_id).map_or(false, |f| f.is_owned_by(owner)))
            .count() as u64)
    }
}
