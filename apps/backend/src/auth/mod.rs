//! Token lifecycle core: signing secret, codec, password check, rotation.

pub mod claims;
pub mod clock;
pub mod jwt;
pub mod password;
pub mod rotation;
pub mod secret_store;
