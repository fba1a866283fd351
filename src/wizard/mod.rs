//! Multi-step creation wizards for classes/events and membership plans.

pub mod commit;
pub mod record;
pub mod sequencer;
pub mod step;
pub mod touched;
pub mod validate;

pub use commit::{
    CatalogClient, ClientError, CommitContext, CommitError, Committable, Created, CreatedRef,
    RecordKind, RecordPayload, COMMIT_FAILED_MESSAGE,
};
pub use record::{ClassRecord, EventRecord, ItemRecord, MembershipRecord};
pub use sequencer::{Sequencer, WizardMode};
pub use step::{ItemStep, MembershipStep, WizardFlow};
pub use touched::TouchedFields;
pub use validate::{Field, FieldIssue};

pub type ItemWizard = Sequencer<ItemStep>;
pub type MembershipWizard = Sequencer<MembershipStep>;
