pub mod add;
pub mod checkin;
pub mod delete;
pub mod find_workspace;
pub mod get_version;
pub mod rename;
pub mod resolve_conflicts;
pub mod undo;

pub use add::Add;
pub use checkin::Checkin;
pub use delete::Delete;
pub use find_workspace::FindWorkspace;
pub use get_version::GetVersion;
pub use rename::Rename;
pub use resolve_conflicts::{AutoResolveType, Conflict, ConflictType, ResolveConflicts};
pub use undo::Undo;
