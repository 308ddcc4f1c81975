//! # Storehouse - inventory, tasks and attendance on plain CSV files
//!
//! A command-line back office for a small organisation. Every collection is
//! a CSV file that the application loads into memory on start and rewrites
//! in full after each change.
//!
//! ## Features
//!
//! - **Record Stores**: Keyed in-memory collections saved atomically with a
//!   `.bak` copy kept until the new file is complete
//! - **Accounts**: Unsalted SHA-256 password digests, a seeded default
//!   administrator and lockout after repeated failed logins
//! - **Inventory**: Products with stock thresholds and value by category
//! - **Tasks**: Assignment, status tracking and completion rates
//! - **Attendance**: One record per employee per day
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storehouse::libs::app::App;
//!
//! let mut app = App::open("./data");
//! let admin = app.auth().login("admin", "admin123")?;
//! assert!(admin.is_admin);
//! # Ok::<(), storehouse::libs::error::AuthError>(())
//! ```

pub mod commands;
pub mod db;
pub mod libs;
