mod rooms;
mod watch;

pub use rooms::handle_rooms_command;
pub use watch::handle_watch_command;
