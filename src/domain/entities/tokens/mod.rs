pub mod verification_token;

pub use verification_token::{TokenType, VerificationToken};
