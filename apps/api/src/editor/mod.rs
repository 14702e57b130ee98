// Editor core: the resume document model, design configuration and per-session state.
// All mutation flows through EditorSession so a mounted preview re-renders once per change.

pub mod design;
pub mod document;
pub mod handlers;
pub mod ingest;
pub mod session;
pub mod store;
