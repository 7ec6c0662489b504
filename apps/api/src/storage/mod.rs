//! External storage collaborators: the object store holding uploaded
//! documents and the key-value store holding submission records.

pub mod files;
pub mod kv;
