pub mod frequency_groups;
pub mod intrusive_list;
pub mod slot_arena;

pub use frequency_groups::FrequencyGroups;
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
