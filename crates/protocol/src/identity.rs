// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use bitcoin::hashes::{hash160, sha256, Hash};
use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{rand, Message, PublicKey, Secp256k1, SecretKey};

use kadmesh_primitives::{NodeId, ID_BYTES};

use crate::error::{ProtocolError, Result};

/// Base58Check version byte for kadmesh wallet addresses.
pub const ADDRESS_VERSION: u8 = 0x00;

/// A signing keypair backing one node's identity. Key custody (loading the
/// secret from disk, hardware wallets, ...) is the caller's concern; this
/// type only ever handles key material already in memory.
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret, public) = secp.generate_keypair(&mut rand::thread_rng());
        Keypair { secret, public }
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes)?;
        let secp = Secp256k1::new();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Ok(Keypair { secret, public })
    }

    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public.serialize()
    }

    pub fn node_id(&self) -> NodeId {
        node_id_from_pubkey_bytes(&self.public_key_bytes())
    }

    pub fn address(&self) -> String {
        address_from_pubkey_bytes(&self.public_key_bytes())
    }

    /// Sign a 32-byte digest, returning a recoverable signature: the public
    /// key (and therefore the signer's node id) can be reconstructed from
    /// the signature alone, so the envelope never has to carry it.
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 65] {
        let secp = Secp256k1::new();
        let message = Message::from_digest(*digest);
        let recoverable = secp.sign_ecdsa_recoverable(&message, &self.secret);
        let (recovery_id, compact) = recoverable.serialize_compact();
        let mut out = [0u8; 65];
        out[0] = recovery_id.to_i32() as u8;
        out[1..].copy_from_slice(&compact);
        out
    }
}

pub fn node_id_from_pubkey_bytes(pubkey: &[u8]) -> NodeId {
    let digest = hash160::Hash::hash(pubkey);
    NodeId::from_bytes(digest.to_byte_array())
}

/// Map an arbitrary DHT key into the overlay's id space with the same
/// hash used for wallet-derived node ids, so `STORE`/`FIND_VALUE` keys and
/// node ids share one XOR metric.
pub fn hash_to_node_id(bytes: &[u8]) -> NodeId {
    node_id_from_pubkey_bytes(bytes)
}

pub fn sha256_digest(bytes: &[u8]) -> [u8; 32] {
    sha256::Hash::hash(bytes).to_byte_array()
}

pub fn address_from_pubkey_bytes(pubkey: &[u8]) -> String {
    let hash = hash160::Hash::hash(pubkey);
    address_from_node_id(&NodeId::from_bytes(hash.to_byte_array()))
}

/// Render a node id as its wallet address. Valid because a node id already
/// *is* `hash160(pubkey)`; this only adds the version byte and checksum.
pub fn address_from_node_id(id: &NodeId) -> String {
    bs58::encode(id.as_bytes())
        .with_check_version(ADDRESS_VERSION)
        .into_string()
}

pub fn address_to_node_id(address: &str) -> Result<NodeId> {
    let decoded = bs58::decode(address)
        .with_check(Some(ADDRESS_VERSION))
        .into_vec()
        .map_err(|e| ProtocolError::MalformedAddress(e.to_string()))?;
    // `with_check` leaves the version byte at the front of the decoded bytes.
    let hash_bytes = decoded
        .get(1..)
        .ok_or_else(|| ProtocolError::MalformedAddress(address.to_string()))?;
    NodeId::from_slice(hash_bytes)
        .map_err(|_| ProtocolError::MalformedAddress(address.to_string()))
}

/// Recover the signer's public key (and its derived node id) from a
/// recoverable signature over `digest`.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8; 65]) -> Result<(NodeId, [u8; 33])> {
    let secp = Secp256k1::new();
    let recovery_id = RecoveryId::from_i32(signature[0] as i32)
        .map_err(|_| ProtocolError::MalformedSignature("bad recovery id".into()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[1..], recovery_id)
        .map_err(|e| ProtocolError::MalformedSignature(e.to_string()))?;
    let message = Message::from_digest(*digest);
    let public = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| ProtocolError::MalformedSignature(e.to_string()))?;
    let pubkey_bytes = public.serialize();
    Ok((node_id_from_pubkey_bytes(&pubkey_bytes), pubkey_bytes))
}

const _: () = assert!(ID_BYTES == 20);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrips_to_the_same_node_id() {
        let keypair = Keypair::generate();
        let address = keypair.address();
        let node_id = address_to_node_id(&address).unwrap();
        assert_eq!(node_id, keypair.node_id());
    }

    #[test]
    fn recovering_a_signature_yields_the_signer() {
        let keypair = Keypair::generate();
        let digest = sha256_digest(b"hello overlay");
        let signature = keypair.sign(&digest);
        let (recovered_id, _pubkey) = recover_signer(&digest, &signature).unwrap();
        assert_eq!(recovered_id, keypair.node_id());
    }

    #[test]
    fn tampered_digest_fails_to_recover_the_signer() {
        let keypair = Keypair::generate();
        let digest = sha256_digest(b"hello overlay");
        let signature = keypair.sign(&digest);
        let other_digest = sha256_digest(b"goodbye overlay");
        let (recovered_id, _pubkey) = recover_signer(&other_digest, &signature).unwrap();
        assert_ne!(recovered_id, keypair.node_id());
    }
}
