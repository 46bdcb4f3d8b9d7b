// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use serde::{Deserialize, Serialize};

use kadmesh_primitives::NodeId;

use crate::identity::{recover_signer, sha256_digest, Keypair};

/// A signed application-message envelope. `signature` covers the canonical
/// msgpack serialization of `payload`; recipients verify before acting on
/// the contents and silently drop anything that doesn't check out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: Vec<u8>,
    pub sender_node_id: NodeId,
    pub signature: Vec<u8>,
}

impl Envelope {
    pub fn sign(payload: Vec<u8>, keypair: &Keypair) -> Self {
        let digest = sha256_digest(&payload);
        let signature = keypair.sign(&digest);
        Envelope {
            payload,
            sender_node_id: keypair.node_id(),
            signature: signature.to_vec(),
        }
    }

    /// Verify that `signature` recovers to a public key whose derived node
    /// id matches `sender_node_id`. Returns `false` for any malformed or
    /// mismatched envelope rather than propagating an error: an
    /// unverifiable envelope is simply dropped by its caller.
    pub fn verify(&self) -> bool {
        let Ok(signature): Result<[u8; 65], _> = self.signature.as_slice().try_into() else {
            return false;
        };
        let digest = sha256_digest(&self.payload);
        match recover_signer(&digest, &signature) {
            Ok((recovered_id, _pubkey)) => recovered_id == self.sender_node_id,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_freshly_signed_envelope_verifies() {
        let keypair = Keypair::generate();
        let envelope = Envelope::sign(b"payload bytes".to_vec(), &keypair);
        assert!(envelope.verify());
    }

    #[test]
    fn tampering_with_the_payload_breaks_verification() {
        let keypair = Keypair::generate();
        let mut envelope = Envelope::sign(b"payload bytes".to_vec(), &keypair);
        envelope.payload = b"tampered bytes".to_vec();
        assert!(!envelope.verify());
    }

    #[test]
    fn claiming_someone_elses_node_id_breaks_verification() {
        let keypair = Keypair::generate();
        let impersonated = Keypair::generate().node_id();
        let mut envelope = Envelope::sign(b"payload bytes".to_vec(), &keypair);
        envelope.sender_node_id = impersonated;
        assert!(!envelope.verify());
    }
}
