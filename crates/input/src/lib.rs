//! Pointer and keyboard input (engine-facing).
//!
//! This crate is independent of any drawing code. It maps `crossterm` mouse
//! and key events into world-space pointer gestures and player commands, and
//! mediates drag gestures into swap requests on a [`core::Resolver`].

pub mod map;
pub mod mediator;

pub use rowmatch_core as core;
pub use rowmatch_types as types;

pub use map::{handle_key_event, handle_mouse_event, should_quit, PlayerCommand, PointerEvent, ScreenMapping};
pub use mediator::{AnimationTracker, Drag, DragMediator, DropOutcome};
