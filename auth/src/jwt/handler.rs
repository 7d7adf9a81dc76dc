use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::secret::SigningSecret;

/// JWT token handler for encoding and decoding access tokens.
///
/// Signs with HS256 (HMAC with SHA-256) and accepts nothing else on decode.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler keyed by the signing secret.
    ///
    /// # Arguments
    /// * `secret` - Process-wide signing secret
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a JWT.
    ///
    /// The signature is checked before any claim. `exp` is mandatory and
    /// no clock leeway is granted.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not verify under this secret
    /// * `TokenExpired` - Signature verifies but `exp` has passed
    /// * `Malformed` - Structure, encoding, algorithm or required claims are wrong
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(classify)
    }
}

fn classify(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed(error.to_string()),
    }
}
