//! Payload encoding and signing
//!
//! LiqPay authenticates every message with
//! `base64(sha1(private_key + data + private_key))`, where `data` is the base64 encoding of
//! the JSON payload. The hash covers the encoded string, so encoding has to be
//! deterministic for a signature to be reproducible.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::{GatewayError, GatewayResult};
use crate::payments::types::SignedPayload;

/// Signs outgoing payloads and checks inbound signatures with one private key.
#[derive(Clone)]
pub struct SignatureCodec {
    private_key: SecretString,
}

impl SignatureCodec {
    pub fn new(private_key: SecretString) -> GatewayResult<Self> {
        if private_key.expose_secret().is_empty() {
            return Err(GatewayError::config("private key is empty"));
        }
        Ok(Self { private_key })
    }

    /// Signature over an already encoded payload.
    pub fn sign(&self, encoded_payload: &str) -> GatewayResult<String> {
        sign(self.private_key.expose_secret(), encoded_payload)
    }

    /// Recomputes the signature and compares it with the claimed one in constant time.
    pub fn verify(&self, encoded_payload: &str, claimed_signature: &str) -> GatewayResult<bool> {
        verify(
            self.private_key.expose_secret(),
            encoded_payload,
            claimed_signature,
        )
    }

    /// Encodes the payload and signs the result.
    pub fn seal<T: Serialize>(&self, payload: &T) -> GatewayResult<SignedPayload> {
        let encoded_data = encode(payload)?;
        let signature = self.sign(&encoded_data)?;
        Ok(SignedPayload {
            encoded_data,
            signature,
        })
    }
}

impl std::fmt::Debug for SignatureCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureCodec").finish_non_exhaustive()
    }
}

pub fn sign(private_key: &str, encoded_payload: &str) -> GatewayResult<String> {
    if private_key.is_empty() {
        return Err(GatewayError::config("private key is empty"));
    }
    if encoded_payload.is_empty() {
        return Err(GatewayError::config("nothing to sign: encoded payload is empty"));
    }

    let mut hasher = Sha1::new();
    hasher.update(private_key.as_bytes());
    hasher.update(encoded_payload.as_bytes());
    hasher.update(private_key.as_bytes());

    Ok(STANDARD.encode(hasher.finalize()))
}

pub fn verify(
    private_key: &str,
    encoded_payload: &str,
    claimed_signature: &str,
) -> GatewayResult<bool> {
    let expected = sign(private_key, encoded_payload)?;
    Ok(expected
        .as_bytes()
        .ct_eq(claimed_signature.as_bytes())
        .into())
}

/// `base64(json(payload))`
pub fn encode<T: Serialize>(payload: &T) -> GatewayResult<String> {
    let json = serde_json::to_vec(payload)?;
    Ok(STANDARD.encode(json))
}

/// Inverse of [`encode`].
pub fn decode<T: DeserializeOwned>(encoded: &str) -> GatewayResult<T> {
    let json = STANDARD.decode(encoded.trim())?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec(key: &str) -> SignatureCodec {
        SignatureCodec::new(SecretString::new(key.to_string())).unwrap()
    }

    #[test]
    fn test_sign_matches_reference_digest() {
        let mut hasher = Sha1::new();
        hasher.update(b"SECRETeyJhIjoxfQ==SECRET");
        let expected = STANDARD.encode(hasher.finalize());

        assert_eq!(sign("SECRET", "eyJhIjoxfQ==").unwrap(), expected);
    }

    #[test]
    fn test_signature_is_base64_sha1() {
        let signature = sign("SECRET", "data").unwrap();
        let raw = STANDARD.decode(&signature).unwrap();
        assert_eq!(raw.len(), 20);
    }

    #[test]
    fn test_sign_then_verify() {
        let codec = codec("private_key");
        let encoded = encode(&json!({"status": "success", "order_id": "1"})).unwrap();
        let signature = codec.sign(&encoded).unwrap();
        assert!(codec.verify(&encoded, &signature).unwrap());
    }

    #[test]
    fn test_any_signature_byte_flip_fails() {
        let encoded = encode(&json!({"amount": "10.00"})).unwrap();
        let signature = sign("SECRET", &encoded).unwrap();

        for i in 0..signature.len() {
            let mut bytes = signature.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let forged = String::from_utf8(bytes).unwrap();
            assert!(
                !verify("SECRET", &encoded, &forged).unwrap(),
                "mutation at byte {} accepted",
                i
            );
        }
    }

    #[test]
    fn test_key_byte_flip_fails() {
        let encoded = encode(&json!({"amount": "10.00"})).unwrap();
        let signature = sign("SECRET", &encoded).unwrap();

        for i in 0.."SECRET".len() {
            let mut key = b"SECRET".to_vec();
            key[i] ^= 0x01;
            let key = String::from_utf8(key).unwrap();
            assert!(!verify(&key, &encoded, &signature).unwrap());
        }
    }

    #[test]
    fn test_truncated_signature_fails() {
        let signature = sign("SECRET", "payload").unwrap();
        assert!(!verify("SECRET", "payload", &signature[..signature.len() - 1]).unwrap());
        assert!(!verify("SECRET", "payload", "").unwrap());
    }

    #[test]
    fn test_empty_inputs_are_configuration_errors() {
        assert!(matches!(
            sign("", "payload"),
            Err(GatewayError::Configuration { .. })
        ));
        assert!(matches!(
            sign("SECRET", ""),
            Err(GatewayError::Configuration { .. })
        ));
        assert!(matches!(
            SignatureCodec::new(SecretString::new(String::new())),
            Err(GatewayError::Configuration { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<serde_json::Value>("not base64!"),
            Err(GatewayError::MalformedPayload { .. })
        ));
        let not_json = STANDARD.encode("plain text");
        assert!(matches!(
            decode::<serde_json::Value>(&not_json),
            Err(GatewayError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_codec_debug_hides_key() {
        let printed = format!("{:?}", codec("very-secret"));
        assert!(!printed.contains("very-secret"));
    }
}
