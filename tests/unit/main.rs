//! Unit test modules.

mod list_render_test;
mod snapshot_test;
