//! Persistence contract
//!
//! The engine never touches a real storage backend. It speaks a flat
//! string-keyed get/set/remove contract; the UI shell supplies the
//! implementation (browser storage, app preferences, a file, ...).
//!
//! Payloads are JSON strings. A record that fails to parse is treated the
//! same as a missing record: the engine starts fresh rather than crashing
//! on bad stored data.

mod gateway;
pub mod keys;


pub use gateway::{MemoryGateway, PersistenceGateway, load_json, save_json};
