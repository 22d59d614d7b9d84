//! Domain layer: entities, value objects and the interfaces the relay
//! requires from the outer layers (依存性の逆転).

pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod store;
pub mod value_object;

pub use entity::{Participant, Room, RoomSnapshot, WinnerRecord};
pub use error::{PushError, StoreError, ValidationError};
pub use pusher::{EventPusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use store::{RoomStore, RoomSummary};
pub use value_object::{
    ConnectionId, EntrantName, GroupName, RoomId, Timestamp, UNSPECIFIED_GROUP,
};
