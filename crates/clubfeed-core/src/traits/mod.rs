//! Collaborator traits defined in `clubfeed-core` and implemented by
//! other crates (or by the host application).

pub mod clock;
pub mod kv_store;
pub mod record_store;
pub mod session;

pub use clock::{ClockFn, Now};
pub use kv_store::KeyValueStore;
pub use record_store::RecordStore;
pub use session::{SessionProvider, StaticSession};
