//! Ed25519 message signing and verification.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rbpool_types::{ApprovalKey, PublicKey, Signature};

/// Sign a message with an approval key.
pub fn sign_message(message: &[u8], key: &ApprovalKey) -> Signature {
    let signing_key = SigningKey::from_bytes(key.secret_bytes());
    Signature::new(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `false` for malformed keys as well as bad signatures.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key.verify(message, &dalek_sig).is_ok()
}
