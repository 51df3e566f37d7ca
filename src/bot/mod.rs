//! Turn handling: routing, per-turn context, and the welcome notifier.

pub mod context;
pub mod router;
pub mod welcome;

pub use context::{ActivitySink, TurnContext};
pub use router::TurnRouter;
