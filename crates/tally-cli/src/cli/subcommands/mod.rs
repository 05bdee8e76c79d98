mod assignment;
mod session;

pub use assignment::AssignmentCommands;
pub use session::SessionCommands;
