//! Entity records held by the host's durable keyed store.
//!
//! Records are created once on first observation and mutated by every
//! event that touches them; none are ever deleted. `PositionSnapshot` is
//! the exception to mutation: one immutable row is appended per mutating
//! position event.

mod pool;
mod position;
mod protocol;
mod tick;
mod token;

pub use pool::Pool;
pub use position::{Position, PositionSnapshot};
pub use protocol::{Bundle, Factory};
pub use tick::Tick;
pub use token::Token;
