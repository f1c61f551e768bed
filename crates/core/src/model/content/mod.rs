pub mod face;
pub mod media;
pub mod text;

pub use face::{CardBack, CardFront};
pub use media::{AudioClip, MediaUri, MediaValidationError};
pub use text::TextError;
