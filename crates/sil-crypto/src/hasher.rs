/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a record discriminator and a transaction message hash can
/// never collide even over identical bytes.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for record type discriminators.
    pub const ACCOUNT: Self = Self {
        domain: "sil-account-v1",
    };
    /// Hasher for signed transaction messages.
    pub const MESSAGE: Self = Self {
        domain: "sil-message-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// First eight bytes of the hash of `name`.
    ///
    /// Used as the type tag at the front of every serialized record.
    pub fn discriminator(&self, name: &str) -> [u8; 8] {
        let hash = self.hash(name.as_bytes());
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash[..8]);
        out
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
