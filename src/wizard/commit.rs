//! Commit protocol for the last data-entry step and the client surface it
//! talks to.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::catalog::CatalogItem;
use crate::domain::lookup::ReferenceTables;
use crate::errors::DojoError;
use crate::wizard::record::{ItemRecord, MembershipRecord};
use crate::wizard::sequencer::{Sequencer, WizardMode};
use crate::wizard::step::{ItemStep, MembershipStep, WizardFlow};

/// Banner text shown for any failed commit.
pub const COMMIT_FAILED_MESSAGE: &str = "Something went wrong while saving. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Item,
    Membership,
    Product,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Item => f.write_str("class or event"),
            RecordKind::Membership => f.write_str("membership"),
            RecordKind::Product => f.write_str("product"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum RecordPayload {
    Item(ItemRecord),
    Membership(MembershipRecord),
    Product(CatalogItem),
}

impl RecordPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPayload::Item(_) => RecordKind::Item,
            RecordPayload::Membership(_) => RecordKind::Membership,
            RecordPayload::Product(_) => RecordKind::Product,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRef {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("{kind} `{id}` not found")]
    NotFound { kind: RecordKind, id: String },
    #[error(transparent)]
    Storage(#[from] DojoError),
}

/// Create/update/remove surface of the backend. Implementations may reject
/// any call; callers do not retry.
pub trait CatalogClient {
    fn create(&mut self, payload: &RecordPayload) -> Result<CreatedRef, ClientError>;

    fn update(&mut self, id: &str, payload: &RecordPayload) -> Result<(), ClientError>;

    fn remove(&mut self, kind: RecordKind, id: &str) -> Result<(), ClientError>;
}

/// Collaborators the draft-to-record transformation needs.
pub struct CommitContext<'a> {
    pub references: &'a ReferenceTables,
    pub currency_symbol: &'a str,
}

/// A committed record with the id the backend assigned (or the edited id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created<R> {
    pub id: String,
    pub record: R,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("a save is already in progress")]
    InFlight,
    #[error("saving is only possible from the last step")]
    NotAtFinalStep,
    #[error("the current step is incomplete")]
    Incomplete,
    #[error("could not prepare the record: {0}")]
    Prepare(#[source] DojoError),
    #[error("backend call failed: {0}")]
    Failed(#[source] ClientError),
}

/// Flows whose drafts can be turned into records and sent to a client.
pub trait Committable: WizardFlow {
    type Record: Clone + fmt::Debug;

    fn prepare(draft: &Self::Draft, ctx: &CommitContext<'_>) -> Result<Self::Record, DojoError>;

    fn payload(record: &Self::Record) -> RecordPayload;
}

impl Committable for ItemStep {
    type Record = ItemRecord;

    fn prepare(draft: &Self::Draft, ctx: &CommitContext<'_>) -> Result<ItemRecord, DojoError> {
        ItemRecord::from_draft(draft, ctx.references, ctx.currency_symbol)
    }

    fn payload(record: &ItemRecord) -> RecordPayload {
        RecordPayload::Item(record.clone())
    }
}

impl Committable for MembershipStep {
    type Record = MembershipRecord;

    fn prepare(
        draft: &Self::Draft,
        ctx: &CommitContext<'_>,
    ) -> Result<MembershipRecord, DojoError> {
        MembershipRecord::from_draft(draft, ctx.references, ctx.currency_symbol)
    }

    fn payload(record: &MembershipRecord) -> RecordPayload {
        RecordPayload::Membership(record.clone())
    }
}

pub type CreatedCallback<'c, R> = &'c mut dyn FnMut(&Created<R>);

impl<S: Committable> Sequencer<S> {
    /// Runs the commit protocol from the last data-entry step.
    ///
    /// Loading is raised and the previous error cleared before the draft is
    /// transformed and sent. Success fires `on_created` and moves to the
    /// terminal step; any failure stores [`COMMIT_FAILED_MESSAGE`] and stays
    /// put. Loading drops back to false in both cases. A call while another
    /// commit is in flight, or from a non-final step, changes nothing.
    pub fn handle_final_step<C>(
        &mut self,
        client: &mut C,
        ctx: &CommitContext<'_>,
        on_created: Option<CreatedCallback<'_, S::Record>>,
    ) -> Result<Created<S::Record>, CommitError>
    where
        C: CatalogClient + ?Sized,
    {
        if self.is_loading() {
            return Err(CommitError::InFlight);
        }
        if !self.is_final_entry_step() {
            return Err(CommitError::NotAtFinalStep);
        }

        self.set_is_loading(true);
        self.clear_error();
        info!(step = ?self.step(), draft = ?self.data(), "committing wizard draft");

        let outcome = self.send(client, ctx);
        match &outcome {
            Ok(created) => {
                if let Some(callback) = on_created {
                    callback(created);
                }
                self.set_step(S::SUCCESS);
                info!(id = %created.id, "wizard draft committed");
            }
            Err(err) => {
                warn!(error = %err, "wizard commit failed");
                self.set_error(Some(COMMIT_FAILED_MESSAGE.to_string()));
            }
        }
        self.set_is_loading(false);
        outcome
    }

    fn send<C>(&self, client: &mut C, ctx: &CommitContext<'_>) -> Result<Created<S::Record>, CommitError>
    where
        C: CatalogClient + ?Sized,
    {
        if !self.is_step_valid() {
            return Err(CommitError::Incomplete);
        }
        let record = S::prepare(self.data(), ctx).map_err(CommitError::Prepare)?;
        let payload = S::payload(&record);
        let id = match self.mode() {
            WizardMode::Create => {
                client
                    .create(&payload)
                    .map_err(CommitError::Failed)?
                    .id
            }
            WizardMode::Edit { id } => {
                client.update(id, &payload).map_err(CommitError::Failed)?;
                id.clone()
            }
        };
        Ok(Created { id, record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lookup::ReferenceData;
    use crate::domain::membership::MembershipType;
    use crate::domain::membership::MembershipDraft;

    #[derive(Default)]
    struct RecordingClient {
        created: Vec<RecordPayload>,
        updated: Vec<String>,
        reject: bool,
    }

    impl CatalogClient for RecordingClient {
        fn create(&mut self, payload: &RecordPayload) -> Result<CreatedRef, ClientError> {
            if self.reject {
                return Err(ClientError::Rejected("offline".into()));
            }
            self.created.push(payload.clone());
            Ok(CreatedRef {
                id: format!("created-{}", self.created.len()),
            })
        }

        fn update(&mut self, id: &str, _payload: &RecordPayload) -> Result<(), ClientError> {
            self.updated.push(id.to_string());
            Ok(())
        }

        fn remove(&mut self, kind: RecordKind, id: &str) -> Result<(), ClientError> {
            Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
        }
    }

    fn trial_at_contract() -> Sequencer<MembershipStep> {
        let mut sequencer = Sequencer::default();
        sequencer.update_data(|draft: &mut MembershipDraft| {
            draft.name = "Two week trial".into();
            draft.membership_type = Some(MembershipType::Trial);
            draft.description = "Try any class".into();
            draft.class_access.class_ids.insert("class-fundamentals".into());
        });
        sequencer.set_step(MembershipStep::Contract);
        sequencer
    }

    #[test]
    fn edit_mode_updates_instead_of_creating() {
        let references: ReferenceTables = ReferenceData::demo().into();
        let ctx = CommitContext {
            references: &references,
            currency_symbol: "$",
        };
        let seeded = trial_at_contract().data().clone();
        let mut sequencer: Sequencer<MembershipStep> = Sequencer::for_edit(
            "membership-7",
            seeded,
            std::sync::Arc::new(crate::domain::ids::SequentialIds::new()),
        );
        sequencer.set_step(MembershipStep::Contract);
        let mut client = RecordingClient::default();

        let created = sequencer.handle_final_step(&mut client, &ctx, None).unwrap();
        assert_eq!(created.id, "membership-7");
        assert_eq!(client.updated, vec!["membership-7".to_string()]);
        assert!(client.created.is_empty());
    }

    #[test]
    fn commit_from_earlier_step_is_rejected_without_side_effects() {
        let references: ReferenceTables = ReferenceData::demo().into();
        let ctx = CommitContext {
            references: &references,
            currency_symbol: "$",
        };
        let mut sequencer = trial_at_contract();
        sequencer.set_step(MembershipStep::Payment);
        let mut client = RecordingClient::default();
        let err = sequencer
            .handle_final_step(&mut client, &ctx, None)
            .unwrap_err();
        assert!(matches!(err, CommitError::NotAtFinalStep));
        assert!(sequencer.error().is_none());
        assert!(client.created.is_empty());
    }

    #[test]
    fn in_flight_commit_blocks_another() {
        let references: ReferenceTables = ReferenceData::demo().into();
        let ctx = CommitContext {
            references: &references,
            currency_symbol: "$",
        };
        let mut sequencer = trial_at_contract();
        sequencer.set_is_loading(true);
        let mut client = RecordingClient::default();
        let err = sequencer
            .handle_final_step(&mut client, &ctx, None)
            .unwrap_err();
        assert!(matches!(err, CommitError::InFlight));
        assert!(sequencer.is_loading());
        assert!(client.created.is_empty());
    }

    #[test]
    fn rejected_create_sets_generic_error() {
        let references: ReferenceTables = ReferenceData::demo().into();
        let ctx = CommitContext {
            references: &references,
            currency_symbol: "$",
        };
        let mut sequencer = trial_at_contract();
        let mut client = RecordingClient {
            reject: true,
            ..RecordingClient::default()
        };
        let err = sequencer
            .handle_final_step(&mut client, &ctx, None)
            .unwrap_err();
        assert!(matches!(err, CommitError::Failed(_)));
        assert_eq!(sequencer.error(), Some(COMMIT_FAILED_MESSAGE));
        assert_eq!(sequencer.step(), MembershipStep::Contract);
        assert!(!sequencer.is_loading());
    }
}
