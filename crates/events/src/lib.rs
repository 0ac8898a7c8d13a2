//! Ledger event primitives shared by the domain and infra layers.

pub mod event;
pub mod owner;

pub use event::Event;
pub use owner::OwnerScoped;
