use super::PdfDocument;
use crate::error::{PdfError, Result};
use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Object, StringFormat};
use std::time::{SystemTime, UNIX_EPOCH};

/// Longest password accepted for lock and unlock.
pub const MAX_PASSWORD_LEN: usize = 20;

const KEY_LENGTH: usize = 128;

/// Reject passwords that are empty or longer than [`MAX_PASSWORD_LEN`].
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len == 0 || len > MAX_PASSWORD_LEN {
        return Err(PdfError::InvalidPassword {
            max: MAX_PASSWORD_LEN,
        });
    }
    Ok(())
}

impl PdfDocument {
    /// Encrypt with 128-bit RC4, using `password` as both owner and user
    /// password and granting every permission.
    pub fn lock(&mut self, password: &str) -> Result<()> {
        self.ensure_file_id();

        let version = EncryptionVersion::V2 {
            document: &self.doc,
            owner_password: password,
            user_password: password,
            key_length: KEY_LENGTH,
            permissions: Permissions::all(),
        };
        let state = EncryptionState::try_from(version)
            .map_err(|e| PdfError::Encryption(e.to_string()))?;

        let mut encrypted = self.doc.clone();
        encrypted
            .encrypt(&state)
            .map_err(|e| PdfError::Encryption(e.to_string()))?;
        self.doc = encrypted;
        Ok(())
    }

    /// Drop any remaining encryption dictionary so the document saves unprotected.
    pub fn strip_protection(&mut self) {
        if let Some(Object::Reference(id)) = self.doc.trailer.remove(b"Encrypt") {
            self.doc.objects.remove(&id);
        }
    }

    // Encryption keys are derived from the first /ID entry.
    fn ensure_file_id(&mut self) {
        if self.doc.trailer.get(b"ID").is_ok() {
            return;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let id = format!("{:032x}", nanos).into_bytes();
        self.doc.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(id.clone(), StringFormat::Hexadecimal),
                Object::String(id, StringFormat::Hexadecimal),
            ]),
        );
    }
}
