//! Draft models, reference data, and list records shared by the wizards and
//! list views.

pub mod catalog;
pub mod common;
pub mod entry_list;
pub mod ids;
pub mod item;
pub mod lookup;
pub mod membership;
pub mod schedule;
pub mod transaction;
