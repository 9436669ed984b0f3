mod common;

use common::{keyset, public_keyset};
use keystone_crypto::{
    CryptoError, KeyKind, KeyPurpose, Signer, UnversionedSigner, UnversionedVerifier, Verifier,
    HEADER_SIZE,
};

const SIGNING_KINDS: [KeyKind; 3] = [
    KeyKind::HmacSha256,
    KeyKind::Ed25519Priv,
    KeyKind::EcdsaP256Priv,
];

#[test]
fn versioned_signatures_verify_and_reject_modified_data() {
    for kind in SIGNING_KINDS {
        let keys = keyset(KeyPurpose::SignAndVerify, kind);
        let signer = Signer::from_keyset(&keys).expect("signer");
        let verifier = Verifier::from_keyset(&keys).expect("verifier");

        let signature = signer.sign(b"hello").expect("sign");
        assert_eq!(signature[0], 0, "{kind:?}: format version");

        assert!(signer.verify(b"hello", &signature).unwrap(), "{kind:?}");
        assert!(verifier.verify(b"hello", &signature).unwrap(), "{kind:?}");
        assert!(!verifier.verify(b"hallo", &signature).unwrap(), "{kind:?}");
    }
}

#[test]
fn public_verifier_accepts_private_signatures() {
    for kind in [KeyKind::Ed25519Priv, KeyKind::EcdsaP256Priv] {
        let private = keyset(KeyPurpose::SignAndVerify, kind);
        let public = public_keyset(&private);

        let signature = Signer::from_keyset(&private).unwrap().sign(b"data").unwrap();
        let verifier = Verifier::from_keyset(&public).expect("public verifier");
        assert!(verifier.verify(b"data", &signature).unwrap(), "{kind:?}");
    }
}

#[test]
fn public_key_sets_cannot_sign() {
    let public = public_keyset(&keyset(KeyPurpose::SignAndVerify, KeyKind::Ed25519Priv));
    assert!(matches!(
        Signer::from_keyset(&public),
        Err(CryptoError::UnacceptablePurpose { .. })
    ));
    assert!(matches!(
        UnversionedSigner::from_keyset(&public),
        Err(CryptoError::UnacceptablePurpose { .. })
    ));
}

#[test]
fn signature_from_another_key_does_not_verify() {
    let ours = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);
    let theirs = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);

    let signature = Signer::from_keyset(&theirs).unwrap().sign(b"data").unwrap();
    let verifier = Verifier::from_keyset(&ours).unwrap();
    assert!(!verifier.verify(b"data", &signature).unwrap());
}

#[test]
fn malformed_versioned_signatures_are_errors() {
    let verifier = Verifier::from_keyset(&keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256))
        .unwrap();

    assert!(matches!(
        verifier.verify(b"data", &[0, 1]),
        Err(CryptoError::ShortInput { .. })
    ));
    assert!(matches!(
        verifier.verify(b"data", &[3, 0, 0, 0, 0, 9]),
        Err(CryptoError::BadVersion(3))
    ));
}

#[test]
fn unversioned_signatures_have_no_header() {
    for kind in SIGNING_KINDS {
        let keys = keyset(KeyPurpose::SignAndVerify, kind);
        let signer = UnversionedSigner::from_keyset(&keys).unwrap();
        let verifier = UnversionedVerifier::from_keyset(&keys).unwrap();

        let signature = signer.sign(b"hello").unwrap();
        if kind == KeyKind::HmacSha256 {
            assert_eq!(signature.len(), 32);
        }
        assert!(verifier.verify(b"hello", &signature).unwrap(), "{kind:?}");
        assert!(signer.verify(b"hello", &signature).unwrap(), "{kind:?}");
        assert!(!verifier.verify(b"hello!", &signature).unwrap(), "{kind:?}");
    }
}

#[test]
fn attached_signatures_carry_data_and_bind_the_nonce() {
    for kind in SIGNING_KINDS {
        let keys = keyset(KeyPurpose::SignAndVerify, kind);
        let signer = Signer::from_keyset(&keys).unwrap();
        let verifier = Verifier::from_keyset(&keys).unwrap();

        let signed = signer.attached_sign(b"payload", b"nonce").unwrap();
        assert_eq!(Verifier::attached_data(&signed).unwrap(), b"payload");
        assert_eq!(&signed[HEADER_SIZE + 4..HEADER_SIZE + 11], b"payload");

        assert!(verifier.attached_verify(&signed, b"nonce").unwrap(), "{kind:?}");
        assert!(!verifier.attached_verify(&signed, b"other").unwrap(), "{kind:?}");

        let mut tampered = signed.clone();
        tampered[HEADER_SIZE + 4] ^= 0x01;
        assert!(!verifier.attached_verify(&tampered, b"nonce").unwrap(), "{kind:?}");
    }
}

#[test]
fn empty_nonce_attached_signature() {
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::Ed25519Priv);
    let signer = Signer::from_keyset(&keys).unwrap();
    let signed = signer.attached_sign(b"", b"").unwrap();
    assert!(signer.attached_verify(&signed, b"").unwrap());
    assert!(Verifier::attached_data(&signed).unwrap().is_empty());
}
