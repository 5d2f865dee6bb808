// Life of a command line:
// 1. Line comes in on stdin
// 2. Parse it into a typed command
// 3. Resolve the working directory, one index search per path segment
// 4. Apply the command to that directory's index
// 5. Render the outcome
//
// System components:
//  - B-tree index (one per directory)
//  - Directory tree built from entries that own their sub-directories
//  - Session holding the navigation stack
//  - Flat-file image for persistence

pub mod command;
pub mod config;
mod e2e_tests;
pub mod image;
pub mod index;
pub mod session;
pub mod simulation;
pub mod types;

pub use session::{Outcome, Session, SessionError, SessionOptions};
