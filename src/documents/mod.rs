pub mod party;
pub mod render;

pub use party::{resolve_buyer, resolve_seller, MissingParty, PartyIdentity, PartySource, ResolvedParty};
