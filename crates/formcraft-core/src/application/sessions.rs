//! Builder session registry
//!
//! One live [`BuilderSession`] per form, keyed by form id. Edits stay in
//! memory until the owner saves; saving goes through the normal form
//! service path so the normalizer runs on every persisted definition.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::application::dto::SessionView;
use crate::builder::{BuilderOp, BuilderSession};
use crate::domain::value_objects::{FormId, OwnerId};
use crate::error::{FormsError, Result};
use crate::ports::inbound::{BuilderUseCases, FormUseCases};

struct OwnedSession {
    owner: OwnerId,
    session: BuilderSession,
}

pub struct BuilderSessions {
    forms: Arc<dyn FormUseCases>,
    sessions: DashMap<FormId, OwnedSession>,
}

impl BuilderSessions {
    pub fn new(forms: Arc<dyn FormUseCases>) -> Self {
        Self {
            forms,
            sessions: DashMap::new(),
        }
    }

    pub fn open_count(&self) -> usize {
        self.sessions.len()
    }

    /// Run `f` against the caller's session
    fn with_session<T>(
        &self,
        owner: &OwnerId,
        id: &FormId,
        f: impl FnOnce(&mut BuilderSession) -> Result<T>,
    ) -> Result<T> {
        let mut entry = self.sessions.get_mut(id).ok_or(FormsError::NotFound)?;
        if &entry.owner != owner {
            return Err(FormsError::NotFound);
        }
        f(&mut entry.session)
    }
}

#[async_trait]
impl BuilderUseCases for BuilderSessions {
    async fn open_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView> {
        let form = self.forms.get_form(owner, id).await?;
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(entry) => {
                let existing = entry.get();
                if &existing.owner != owner {
                    return Err(FormsError::NotFound);
                }
                debug!(form_id = %id, dirty = existing.session.is_dirty(), "Builder session resumed");
                Ok(SessionView::new(id.clone(), &existing.session))
            }
            Entry::Vacant(entry) => {
                let session = BuilderSession::open(form.form);
                let view = SessionView::new(id.clone(), &session);
                entry.insert(OwnedSession {
                    owner: owner.clone(),
                    session,
                });
                debug!(form_id = %id, "Builder session opened");
                Ok(view)
            }
        }
    }

    async fn get_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView> {
        self.with_session(owner, id, |session| Ok(SessionView::new(id.clone(), session)))
    }

    async fn apply_op(&self, owner: &OwnerId, id: &FormId, op: BuilderOp) -> Result<SessionView> {
        self.with_session(owner, id, |session| {
            let changed = session.apply(&op)?;
            debug!(form_id = %id, changed, "Builder operation applied");
            Ok(SessionView::new(id.clone(), session))
        })
    }

    async fn undo(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView> {
        self.with_session(owner, id, |session| {
            session.undo();
            Ok(SessionView::new(id.clone(), session))
        })
    }

    async fn save_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView> {
        let snapshot = self.with_session(owner, id, |session| Ok(session.definition().clone()))?;

        // The map guard is not held across the save
        self.forms
            .save_definition(owner, id, &snapshot.to_json())
            .await?;

        self.with_session(owner, id, |session| {
            if session.definition() == &snapshot {
                session.mark_saved();
            }
            info!(form_id = %id, dirty = session.is_dirty(), "Builder session saved");
            Ok(SessionView::new(id.clone(), session))
        })
    }

    async fn close_session(&self, owner: &OwnerId, id: &FormId) -> Result<()> {
        self.sessions
            .remove_if(id, |_, entry| &entry.owner == owner)
            .map(|_| ())
            .ok_or(FormsError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::forms::tests::service_with_store;
    use crate::application::dto::GenerateFormCommand;
    use crate::schema::{default_template, FieldType};

    async fn setup() -> (BuilderSessions, Arc<dyn FormUseCases>, FormId) {
        let (service, _) = service_with_store();
        let forms: Arc<dyn FormUseCases> = Arc::new(service);
        let created = forms
            .create_from_prompt(
                &alice(),
                GenerateFormCommand {
                    prompt: "Create a signup form with name, email, and password".into(),
                    multi_step: false,
                },
            )
            .await
            .unwrap();
        (BuilderSessions::new(forms.clone()), forms, created.id)
    }

    fn alice() -> OwnerId {
        OwnerId::from_string("alice")
    }

    #[tokio::test]
    async fn test_edit_and_save_round_trip() {
        let (sessions, forms, id) = setup().await;
        let opened = sessions.open_session(&alice(), &id).await.unwrap();
        assert!(!opened.dirty);
        assert_eq!(opened.state.active_fields().len(), 4);

        let view = sessions
            .apply_op(
                &alice(),
                &id,
                BuilderOp::InsertField {
                    template: default_template(&FieldType::Phone).unwrap(),
                    at_index: Some(3),
                },
            )
            .await
            .unwrap();
        assert!(view.dirty);
        assert!(view.can_undo);

        let stored = forms.get_form(&alice(), &id).await.unwrap();
        assert_eq!(stored.form.active_fields(0).len(), 4);

        let saved = sessions.save_session(&alice(), &id).await.unwrap();
        assert!(!saved.dirty);
        let stored = forms.get_form(&alice(), &id).await.unwrap();
        assert_eq!(stored.form.active_fields(0).len(), 5);
        assert_eq!(stored.form.active_fields(0)[3].field_type, FieldType::Phone);
    }

    #[tokio::test]
    async fn test_reopen_keeps_unsaved_edits() {
        let (sessions, _, id) = setup().await;
        sessions.open_session(&alice(), &id).await.unwrap();
        sessions
            .apply_op(
                &alice(),
                &id,
                BuilderOp::InsertField {
                    template: default_template(&FieldType::Phone).unwrap(),
                    at_index: None,
                },
            )
            .await
            .unwrap();

        let reopened = sessions.open_session(&alice(), &id).await.unwrap();
        assert!(reopened.dirty);
        assert!(reopened.can_undo);
        assert_eq!(reopened.state.active_fields().len(), 5);
        assert_eq!(sessions.open_count(), 1);

        sessions.close_session(&alice(), &id).await.unwrap();
        let fresh = sessions.open_session(&alice(), &id).await.unwrap();
        assert!(!fresh.dirty);
        assert_eq!(fresh.state.active_fields().len(), 4);
    }

    #[tokio::test]
    async fn test_sessions_are_owner_scoped() {
        let (sessions, _, id) = setup().await;
        let mallory = OwnerId::from_string("mallory");
        assert_eq!(
            sessions.open_session(&mallory, &id).await,
            Err(FormsError::NotFound)
        );

        sessions.open_session(&alice(), &id).await.unwrap();
        assert_eq!(
            sessions.get_session(&mallory, &id).await,
            Err(FormsError::NotFound)
        );
        assert_eq!(
            sessions.close_session(&mallory, &id).await,
            Err(FormsError::NotFound)
        );
        sessions.close_session(&alice(), &id).await.unwrap();
        assert_eq!(sessions.open_count(), 0);
    }

    #[tokio::test]
    async fn test_undo_and_invalid_step() {
        let (sessions, _, id) = setup().await;
        sessions.open_session(&alice(), &id).await.unwrap();

        sessions
            .apply_op(&alice(), &id, BuilderOp::ReorderField { from_index: 0, to_index: 2 })
            .await
            .unwrap();
        let undone = sessions.undo(&alice(), &id).await.unwrap();
        assert!(!undone.can_undo);
        assert_eq!(undone.state.active_fields()[0].field_id, "name");

        let err = sessions
            .apply_op(&alice(), &id, BuilderOp::SetActiveStep { index: 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::InvalidStep { index: 1, step_count: 1 }));
    }
}
