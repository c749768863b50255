use uuid::Uuid;

/// Random 128-bit identifier rendered as 32 lowercase hex chars.
fn random_hex() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn generate_user_id() -> String {
    format!("user_{}", random_hex())
}

/// Valentine ids double as the public share link, so they must not be guessable.
pub fn generate_valentine_id() -> String {
    format!("val_{}", random_hex())
}
