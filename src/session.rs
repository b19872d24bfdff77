//! Session-domain variants, tickets, and token models.

pub mod ticket;
pub mod token;
pub mod variant;

pub use ticket::*;
pub use token::*;
pub use variant::*;
