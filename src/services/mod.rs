// Smartmark services
// Services provide the collaborator boundary and its implementations, plus
// the pure change-event normalizer.

pub mod backend;
pub mod local_backend;
pub mod normalizer;
pub mod remote_backend;
