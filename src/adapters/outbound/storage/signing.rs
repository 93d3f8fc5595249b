use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::{
    errors::{StorageError, StorageResult},
    models::DownloadLink,
    value_objects::{FileName, ObjectKey, OwnerId, VersionId},
};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies HMAC-SHA256 signed download links.
///
/// A link names the object, an optional version, an absolute expiry and the
/// `Content-Disposition` the gateway must serve. All four are covered by the
/// signature.
#[derive(Clone)]
pub struct LinkSigner {
    secret: Vec<u8>,
    public_base_url: String,
}

impl std::fmt::Debug for LinkSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSigner")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl LinkSigner {
    pub fn new(secret: impl Into<Vec<u8>>, public_base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Disposition that forces a browser download under the original name
    pub fn disposition_for(name: &FileName) -> String {
        format!(
            "attachment; filename=\"{}\"",
            name.as_str().replace('"', "'")
        )
    }

    /// Build the full gateway URL for a link expiring at `expires` (unix seconds)
    pub fn sign_url(
        &self,
        owner: &OwnerId,
        name: &FileName,
        version_id: Option<&VersionId>,
        expires: i64,
    ) -> StorageResult<String> {
        let disposition = Self::disposition_for(name);
        let key = ObjectKey::for_file(owner, name);
        let signature = hex::encode(
            self.mac(&key, version_id, expires, &disposition)?
                .finalize()
                .into_bytes(),
        );

        let mut url = format!(
            "{}/downloads/{}/{}?",
            self.public_base_url,
            urlencoding::encode(owner.as_str()),
            urlencoding::encode(name.as_str())
        );
        if let Some(version_id) = version_id {
            url.push_str("versionId=");
            url.push_str(&urlencoding::encode(version_id.as_str()));
            url.push('&');
        }
        url.push_str(&format!(
            "expires={}&disposition={}&signature={}",
            expires,
            urlencoding::encode(&disposition),
            signature
        ));
        Ok(url)
    }

    /// Check the signature first, then the expiry against `now` (unix seconds)
    pub fn verify(&self, link: &DownloadLink, now: i64) -> StorageResult<()> {
        let presented = hex::decode(&link.signature).map_err(|_| {
            StorageError::InvalidDownloadLink {
                reason: "signature is not hex".to_string(),
            }
        })?;

        let key = ObjectKey::for_file(&link.owner, &link.name);
        self.mac(&key, link.version_id.as_ref(), link.expires, &link.disposition)?
            .verify_slice(&presented)
            .map_err(|_| StorageError::InvalidDownloadLink {
                reason: "signature mismatch".to_string(),
            })?;

        if link.expires < now {
            return Err(StorageError::InvalidDownloadLink {
                reason: format!("link expired at {}", link.expires),
            });
        }

        Ok(())
    }

    /// MAC over the canonical `key, versionId, expires, disposition` lines
    fn mac(
        &self,
        key: &ObjectKey,
        version_id: Option<&VersionId>,
        expires: i64,
        disposition: &str,
    ) -> StorageResult<HmacSha256> {
        let canonical = format!(
            "{}\n{}\n{}\n{}",
            key,
            version_id.map(VersionId::as_str).unwrap_or(""),
            expires,
            disposition
        );

        let mac = HmacSha256::new_from_slice(&self.secret).map_err(|e| {
            StorageError::InternalError {
                message: format!("Invalid signing key: {}", e),
            }
        })?;
        Ok(mac.chain_update(canonical.as_bytes()))
    }
}
