pub mod journal;

pub use journal::{AuditEntry, AuditLog, EntryKind, TripletValues};
