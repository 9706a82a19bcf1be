//! Authentication-vector collaborator boundary.
//!
//! The virtual L1 itself never authenticates anything; the upper-layer
//! stack asks this registry for GSM/UMTS authentication vectors. Only the
//! interface is modeled here: implementations register per algorithm with
//! an explicit priority, and the best-priority claimant serves each
//! request. The actual AKA cryptography lives in the registered providers.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAlgo {
    None,
    Comp128v1,
    Comp128v2,
    Comp128v3,
    Xor,
    Milenage,
}

/// Permanent (secret) subscriber authentication data.
#[derive(Debug, Clone)]
pub enum SubAuthData {
    Gsm {
        ki: [u8; 16],
    },
    Umts {
        k: [u8; 16],
        opc: [u8; 16],
        amf: [u8; 2],
        sqn: u64,
    },
}

/// A computed authentication vector. GSM-only algorithms leave the UMTS
/// fields zeroed and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthVector {
    pub rand: [u8; 16],
    pub autn: [u8; 16],
    pub ck: [u8; 16],
    pub ik: [u8; 16],
    pub res: [u8; 16],
    pub res_len: u8,
    pub kc: [u8; 8],
    pub sres: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No registered implementation claims the algorithm
    UnsupportedAlgo(AuthAlgo),
    /// The selected implementation failed to produce a vector
    Failed(&'static str),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UnsupportedAlgo(algo) => write!(f, "no implementation for {:?}", algo),
            AuthError::Failed(reason) => write!(f, "vector generation failed: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// An implementation of one authentication algorithm.
pub trait AuthProvider {
    fn algo(&self) -> AuthAlgo;
    fn name(&self) -> &'static str;

    fn gen_vec(&self, aud: &SubAuthData, rand: &[u8; 16]) -> Result<AuthVector, AuthError>;

    /// Vector generation with UMTS re-synchronization.
    fn gen_vec_auts(
        &self,
        aud: &SubAuthData,
        rand_auts: &[u8; 16],
        auts: &[u8; 14],
        rand: &[u8; 16],
    ) -> Result<AuthVector, AuthError>;
}

/// Priority-ordered implementation table. Lower priority value wins; among
/// equal priorities, registration order is the tie-break. The list is kept
/// sorted at registration so selection is a plain front-to-back scan.
pub struct AuthRegistry {
    impls: Vec<(u32, Box<dyn AuthProvider>)>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self { impls: Vec::new() }
    }

    pub fn register(&mut self, priority: u32, provider: Box<dyn AuthProvider>) {
        tracing::debug!(
            "registering auth implementation {} for {:?} at priority {}",
            provider.name(),
            provider.algo(),
            priority
        );
        let at = self.impls.partition_point(|(p, _)| *p <= priority);
        self.impls.insert(at, (priority, provider));
    }

    pub fn supported(&self, algo: AuthAlgo) -> bool {
        self.impls.iter().any(|(_, imp)| imp.algo() == algo)
    }

    fn select(&self, algo: AuthAlgo) -> Result<&dyn AuthProvider, AuthError> {
        self.impls
            .iter()
            .find(|(_, imp)| imp.algo() == algo)
            .map(|(_, imp)| imp.as_ref())
            .ok_or(AuthError::UnsupportedAlgo(algo))
    }

    pub fn gen_vec(
        &self,
        algo: AuthAlgo,
        aud: &SubAuthData,
        rand: &[u8; 16],
    ) -> Result<AuthVector, AuthError> {
        self.select(algo)?.gen_vec(aud, rand)
    }

    pub fn gen_vec_auts(
        &self,
        algo: AuthAlgo,
        aud: &SubAuthData,
        rand_auts: &[u8; 16],
        auts: &[u8; 14],
        rand: &[u8; 16],
    ) -> Result<AuthVector, AuthError> {
        self.select(algo)?.gen_vec_auts(aud, rand_auts, auts, rand)
    }
}

impl Default for AuthRegistry {
    fn default() -> Self {
        Self::new()
    }
}
