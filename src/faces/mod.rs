// The bot has a brain (`Randomly`) and a face that receives activities.
// main makes a face, puts a brain behind it, and lets it rip.

mod bot_framework;
pub use bot_framework::router;
