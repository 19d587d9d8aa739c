pub mod entity;
pub mod recurrence;
pub mod variant;
