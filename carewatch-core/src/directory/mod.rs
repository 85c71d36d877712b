mod feed;
mod stream;

pub use feed::RoomDirectoryFeed;
