//! Self-contained features.  Each one owns its slice and an entry module with
//! the init/destroy lifecycle the host drives on mount/unmount.

pub mod todos;
pub mod track;
