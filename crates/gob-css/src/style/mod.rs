//! Property values, validation, and the typed style layout reads.

pub mod display;
pub mod properties;
pub mod used;
pub mod values;

pub use display::{DisplayValue, FontStyle, WhiteSpace};
pub use properties::{DeclarationError, expand_declaration, is_inherited, validate_declaration};
pub use used::UsedStyle;
pub use values::{AutoLength, ColorValue, DEFAULT_FONT_SIZE_PX, LengthValue, LineHeight, Sides};
