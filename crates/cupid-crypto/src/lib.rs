/// Cupid crypto helpers
///
/// - Opaque identifier generation for users and valentines.
/// - HMAC-SHA256 signatures over payment gateway callbacks.

pub mod ids;
pub mod signature;
