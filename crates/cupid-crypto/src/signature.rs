use anyhow::{Result, anyhow};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 MAC.
const SIGNATURE_HEX_LEN: usize = 64;

fn payment_mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("Invalid HMAC key: {}", e))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Lowercase hex `HMAC-SHA256(secret, "{order_id}|{payment_id}")`, the
/// signature the gateway attaches to a successful checkout.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    let mac = payment_mac(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a gateway signature in constant time.
///
/// Only the exact lowercase hex form is accepted, so any altered character
/// (including a case flip) is a mismatch.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<bool> {
    if signature.len() != SIGNATURE_HEX_LEN
        || !signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Ok(false);
    }

    let Ok(expected) = hex::decode(signature) else {
        return Ok(false);
    };

    let mac = payment_mac(secret, order_id, payment_id)?;
    Ok(mac.verify_slice(&expected).is_ok())
}
