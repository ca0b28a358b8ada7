pub mod subtypes;

pub use subtypes::{property_subtype_choices, SubtypeChoice, SubtypeChoiceTable};
