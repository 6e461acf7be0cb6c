//! Round Snake - Snake on a circular board
//!
//! This library provides:
//! - Core game logic on a disk-shaped lattice (game module)
//! - Collaborator traits for clock, joystick and display (platform module)
//! - High score persistence (storage module)
//! - A terminal front end: keyboard joystick, round display, play mode
//!   (input, render, modes modules)
//! - Per-process session statistics (metrics module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod platform;
pub mod render;
pub mod storage;
