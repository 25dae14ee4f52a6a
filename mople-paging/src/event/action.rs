/// Action events carried on the bus.
use chrono::{DateTime, Utc};

use crate::page::Entity;

/// What happened to an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Action<T: Entity> {
    /// Neutral value every subscriber sees first.
    None,
    Create(T),
    Update(T),
    Delete(T::Id),
    /// Cached copies may be stale; reload from scratch.
    Invalidate,
}

impl<T: Entity> Action<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Action::None => "None",
            Action::Create(_) => "Create",
            Action::Update(_) => "Update",
            Action::Delete(_) => "Delete",
            Action::Invalidate => "Invalidate",
        }
    }
}

/// An action plus the wall-clock time it was performed.
///
/// Receivers compare `at` against their own load time to drop actions that
/// a freshly loaded page already reflects.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEvent<T: Entity> {
    pub action: Action<T>,
    pub at: DateTime<Utc>,
}

impl<T: Entity> ActionEvent<T> {
    pub fn new(action: Action<T>) -> Self {
        ActionEvent {
            action,
            at: Utc::now(),
        }
    }

    pub fn none() -> Self {
        Self::new(Action::None)
    }

    pub fn create(entity: T) -> Self {
        Self::new(Action::Create(entity))
    }

    pub fn update(entity: T) -> Self {
        Self::new(Action::Update(entity))
    }

    pub fn delete(id: T::Id) -> Self {
        Self::new(Action::Delete(id))
    }

    pub fn invalidate() -> Self {
        Self::new(Action::Invalidate)
    }

    /// Override the timestamp (replayed or server-stamped actions).
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    pub fn is_none(&self) -> bool {
        matches!(self.action, Action::None)
    }
}
