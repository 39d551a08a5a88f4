pub mod controls;
pub mod editor_canvas;
