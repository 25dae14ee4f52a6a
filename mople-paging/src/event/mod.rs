/// Action event bus: per-entity fan-out of mutations between live screens.
///
/// A screen that performs a create/update/delete publishes an `ActionEvent`
/// on the channel for that entity type; every other live screen holding a
/// copy of the same data patches its list (or reloads on `Invalidate`).
///
/// # Module structure
/// - `action`: `Action` / `ActionEvent` tagged union with wall-clock stamps
/// - `channel`: `EventChannel` seam, `BroadcastChannel` implementation, `Subscription`
pub mod action;
pub mod channel;

pub use action::{Action, ActionEvent};
pub use channel::{BroadcastChannel, EventChannel, Subscription};
