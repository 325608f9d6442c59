//! Plain data types shared across the crate

mod device_id;
mod play_item;

pub use device_id::DeviceId;
pub use play_item::PlayItem;
