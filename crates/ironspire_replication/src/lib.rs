#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    unreachable_pub
)]

//! Tile-change replication: turning grid membership changes into
//! subscriber notifications and `UpdateObject`/`DestroyObjects` packets (C8).

pub mod handler;
pub mod packet;
pub mod subscriber;

pub use handler::{objects_entering_view, objects_leaving_view, watchers_gaining_sight, watchers_losing_sight};
pub use packet::{decode_destroy_objects, decode_update_object, encode_destroy_objects, encode_update_object};
pub use subscriber::{RecordingSubscriber, Subscriber};
