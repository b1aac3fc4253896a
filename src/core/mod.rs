// Core Logic
pub mod actions;
pub mod conflict;
pub mod engine;
pub mod mouse;
pub mod naming;

pub use actions::{find_action, Action};
pub use conflict::{ChannelResolver, ConflictRequest, ConflictResolver, FixedResolver, ScriptedResolver};
pub use engine::{BatchEngine, CancelToken, ProgressObserver};
pub use mouse::{ListArea, PointerInput};
