pub mod renderer;

pub use renderer::{Glyph, Hud, Renderer};
