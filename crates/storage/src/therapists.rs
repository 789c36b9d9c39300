//! Therapist directory store.
//!
//! A single JSON snapshot (`therapists.json`) holds every application;
//! mutations rewrite the snapshot under a write lock. The directory is
//! small and moderated by hand, so snapshot-per-mutation is plenty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use mitra_domain::error::{Error, Result};
use mitra_domain::therapist::{Therapist, TherapistDraft, TherapistStatus};
use mitra_domain::trace::TraceEvent;

/// Therapist directory backed by a JSON snapshot file.
pub struct TherapistStore {
    path: PathBuf,
    entries: RwLock<HashMap<Uuid, Therapist>>,
}

impl TherapistStore {
    /// Load or create the store at `state_path/therapists.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path)?;
        let path = state_path.join("therapists.json");
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            therapists = entries.len(),
            path = %path.display(),
            "therapist store loaded"
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Register a new application. Emails are unique (case-insensitive).
    pub fn create(&self, draft: TherapistDraft) -> Result<Therapist> {
        let mut entries = self.entries.write();

        let email = draft.email.trim().to_ascii_lowercase();
        if entries
            .values()
            .any(|t| t.email.eq_ignore_ascii_case(&email))
        {
            return Err(Error::Invalid("email already exists".into()));
        }

        let now = Utc::now();
        let therapist = Therapist {
            id: Uuid::new_v4(),
            name: draft.name,
            email,
            phone: draft.phone,
            specialization: draft.specialization,
            experience_years: draft.experience_years,
            qualifications: draft.qualifications,
            status: TherapistStatus::Pending,
            availability: draft.availability,
            bio: draft.bio,
            created_at: now,
            updated_at: now,
            last_status_update: now,
        };
        entries.insert(therapist.id, therapist.clone());
        self.flush(&entries)?;
        Ok(therapist)
    }

    /// All entries, newest first.
    pub fn list_all(&self) -> Vec<Therapist> {
        let mut all: Vec<Therapist> = self.entries.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Accepted entries only (the public directory), newest first.
    pub fn list_accepted(&self) -> Vec<Therapist> {
        let mut accepted: Vec<Therapist> = self
            .entries
            .read()
            .values()
            .filter(|t| t.status == TherapistStatus::Accepted)
            .cloned()
            .collect();
        accepted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        accepted
    }

    pub fn get(&self, id: Uuid) -> Option<Therapist> {
        self.entries.read().get(&id).cloned()
    }

    /// Move one application through the approval workflow.
    pub fn update_status(&self, id: Uuid, status: TherapistStatus) -> Result<Therapist> {
        let mut entries = self.entries.write();
        let therapist = entries
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("therapist {id}")))?;

        let now = Utc::now();
        therapist.status = status;
        therapist.updated_at = now;
        therapist.last_status_update = now;
        let updated = therapist.clone();

        TraceEvent::TherapistStatusChanged {
            therapist_id: id.to_string(),
            status: format!("{status:?}").to_lowercase(),
        }
        .emit();

        self.flush(&entries)?;
        Ok(updated)
    }

    /// Set the status of several applications at once. Unknown ids are
    /// skipped; returns how many entries changed.
    pub fn bulk_update_status(&self, ids: &[Uuid], status: TherapistStatus) -> Result<usize> {
        let mut entries = self.entries.write();
        let now = Utc::now();
        let mut changed = 0;
        for id in ids {
            if let Some(therapist) = entries.get_mut(id) {
                therapist.status = status;
                therapist.updated_at = now;
                therapist.last_status_update = now;
                changed += 1;
            }
        }
        if changed > 0 {
            self.flush(&entries)?;
        }
        Ok(changed)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(&id).is_none() {
            return Err(Error::NotFound(format!("therapist {id}")));
        }
        self.flush(&entries)
    }

    fn flush(&self, entries: &HashMap<Uuid, Therapist>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use mitra_domain::therapist::Availability;

    fn draft(email: &str) -> TherapistDraft {
        TherapistDraft {
            name: "Dr. Sharma".into(),
            email: email.into(),
            phone: "9876543210".into(),
            specialization: "CBT".into(),
            experience_years: 6,
            qualifications: "MA Clinical Psychology".into(),
            availability: Availability::Flexible,
            bio: String::new(),
        }
    }

    #[test]
    fn create_starts_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        let t = store.create(draft("a@example.com")).unwrap();
        assert_eq!(t.status, TherapistStatus::Pending);
        assert!(store.list_accepted().is_empty());
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn duplicate_email_rejected_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        store.create(draft("a@example.com")).unwrap();
        let err = store.create(draft("A@Example.COM")).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn status_update_moves_into_public_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        let t = store.create(draft("a@example.com")).unwrap();

        let updated = store.update_status(t.id, TherapistStatus::Accepted).unwrap();
        assert_eq!(updated.status, TherapistStatus::Accepted);
        assert!(updated.last_status_update >= t.last_status_update);
        assert_eq!(store.list_accepted().len(), 1);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        let err = store
            .update_status(Uuid::new_v4(), TherapistStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn bulk_update_touches_only_named_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        let a = store.create(draft("a@example.com")).unwrap();
        let b = store.create(draft("b@example.com")).unwrap();

        let changed = store
            .bulk_update_status(&[a.id, Uuid::new_v4()], TherapistStatus::Accepted)
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(store.get(a.id).unwrap().status, TherapistStatus::Accepted);
        assert_eq!(store.get(b.id).unwrap().status, TherapistStatus::Pending);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = TherapistStore::new(dir.path()).unwrap();
            store.create(draft("a@example.com")).unwrap().id
        };
        let store = TherapistStore::new(dir.path()).unwrap();
        assert!(store.get(id).is_some());
    }

    #[test]
    fn delete_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = TherapistStore::new(dir.path()).unwrap();
        let t = store.create(draft("a@example.com")).unwrap();
        store.delete(t.id).unwrap();
        assert!(store.get(t.id).is_none());
        assert!(matches!(store.delete(t.id), Err(Error::NotFound(_))));
    }
}
