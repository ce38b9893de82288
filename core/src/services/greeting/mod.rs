//! Greeting session: the card screen of one device
//!
//! Registers the device once at startup and broadcasts the greeting
//! from it whenever the button is pressed.

mod provider;
mod session;


pub use provider::StaticTokenProvider;
pub use session::GreetingSession;
