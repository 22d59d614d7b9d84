//! RoomStore 実装
//!
//! - `inmemory`: HashMap をインメモリ DB として使用する実装
//!
//! プロセス再起動を越える永続化は行わない（仕様上のスコープ外）。

pub mod inmemory;

pub use inmemory::InMemoryRoomStore;
