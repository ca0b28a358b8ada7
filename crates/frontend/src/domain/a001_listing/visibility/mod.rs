pub mod engine;
pub mod rules;

pub use engine::{ControlFlags, FormSurface, ManagedSection, VisibilityEngine, VisibilityReport};
pub use rules::{SectionCriteria, SectionVerdict, SelectorContext};
