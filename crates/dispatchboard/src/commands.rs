//! Command registry, palette controller, and keyboard surface.

pub mod keys;
pub mod palette;
pub mod registry;

pub use keys::{is_palette_chord, KeyChord};
pub use palette::{KeyOutcome, PaletteController, PaletteKey};
pub use registry::{CommandDescriptor, CommandGroup, CommandRegistry};
