// (c) Copyright 2025 Helsing GmbH. All rights reserved.

//! Dedicated helpers to deal with more complicated CLI operations

/// Publisher helper to handle logic related to publishing
pub mod publisher;
/// Renderer helper to handle logic related to dependency rendering
pub mod renderer;

pub use publisher::Publisher;
pub use renderer::render_deps;
