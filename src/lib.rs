pub mod activity;
pub use activity::*;

pub mod cards;
pub use cards::*;

pub mod config;
pub use config::Config;

pub mod connector;
pub use connector::*;

pub mod error;
pub use error::RandomlyError;

pub mod faces;
pub use faces::*;

pub mod selector;
pub use selector::select_random;

pub mod randomly;
pub use randomly::Randomly;
