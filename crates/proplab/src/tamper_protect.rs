//! Proof states travel through the client. A SHA3 seal over their content
//! detects states that were edited on the way back.

use sha3::{Digest, Sha3_256};

pub trait ProtectedState {
    fn compute_seal_info(&self) -> String;

    fn seal(&self) -> String {
        seal(self.compute_seal_info())
    }

    fn verify_seal(&self, seal: &str) -> bool {
        verify(self.compute_seal_info(), seal)
    }
}

pub fn seal(s: String) -> String {
    let payload = format!("proplab equivalence proof, do not edit|{}", s);
    let mut hasher = Sha3_256::new();
    hasher.update(payload);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect()
}

pub fn verify(s: String, hash: &str) -> bool {
    seal(s).eq_ignore_ascii_case(hash)
}
