//! Models shared by the dossier backend and the clients of its HTTP surface.

pub mod model;
pub mod requests;
