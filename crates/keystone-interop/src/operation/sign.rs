use super::{verdict, Artifact, Operation, OperationContext, VerifierClass};
use crate::access::Role;
use crate::error::InteropError;
use crate::options::Options;
use keystone_crypto::{CryptoError, Signer, UnversionedSigner, UnversionedVerifier, Verifier};
use std::marker::PhantomData;
use tracing::info;

/// Hidden nonce of the attached signatures this harness produces
const ATTACHED_NONCE: &[u8] = b"";

/// One flavour of signature: which roles produce and check it, and how
pub trait SignatureScheme {
    /// Used in log and failure messages
    const NAME: &'static str;

    type Signer: Role;
    type Verifier: Role;

    fn sign(signer: &Self::Signer, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn verify_with_signer(
        signer: &Self::Signer,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;

    fn verify_with_verifier(
        verifier: &Self::Verifier,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;

    /// Runs once the signature has verified
    fn check_signed(_context: &OperationContext, _signature: &[u8]) -> Result<(), InteropError> {
        Ok(())
    }
}

/// Header-less signatures
pub struct Unversioned;

impl SignatureScheme for Unversioned {
    const NAME: &'static str = "unversioned signature";

    type Signer = UnversionedSigner;
    type Verifier = UnversionedVerifier;

    fn sign(signer: &UnversionedSigner, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        signer.sign(data)
    }

    fn verify_with_signer(
        signer: &UnversionedSigner,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        signer.verify(data, signature)
    }

    fn verify_with_verifier(
        verifier: &UnversionedVerifier,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        verifier.verify(data, signature)
    }
}

/// Signatures carrying their payload
pub struct Attached;

impl SignatureScheme for Attached {
    const NAME: &'static str = "attached signature";

    type Signer = Signer;
    type Verifier = Verifier;

    fn sign(signer: &Signer, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        signer.attached_sign(data, ATTACHED_NONCE)
    }

    // The payload travels inside the signature, so `data` is not consulted
    fn verify_with_signer(
        signer: &Signer,
        _data: &[u8],
        signed: &[u8],
    ) -> Result<bool, CryptoError> {
        signer.attached_verify(signed, ATTACHED_NONCE)
    }

    fn verify_with_verifier(
        verifier: &Verifier,
        _data: &[u8],
        signed: &[u8],
    ) -> Result<bool, CryptoError> {
        verifier.attached_verify(signed, ATTACHED_NONCE)
    }

    fn check_signed(context: &OperationContext, signed: &[u8]) -> Result<(), InteropError> {
        let payload = Verifier::attached_data(signed).map_err(InteropError::verification)?;
        context.expect_test_data(&payload, "attached payload")
    }
}

/// Versioned signatures
pub struct Versioned;

impl SignatureScheme for Versioned {
    const NAME: &'static str = "signature";

    type Signer = Signer;
    type Verifier = Verifier;

    fn sign(signer: &Signer, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        signer.sign(data)
    }

    fn verify_with_signer(
        signer: &Signer,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        signer.verify(data, signature)
    }

    fn verify_with_verifier(
        verifier: &Verifier,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        verifier.verify(data, signature)
    }
}

/// Generate and test for any [`SignatureScheme`]
pub struct SignatureOperation<S> {
    context: OperationContext,
    scheme: PhantomData<S>,
}

impl<S: SignatureScheme> SignatureOperation<S> {
    pub fn new(context: OperationContext) -> Self {
        Self {
            context,
            scheme: PhantomData,
        }
    }
}

pub type UnversionedSignOperation = SignatureOperation<Unversioned>;
pub type AttachedSignOperation = SignatureOperation<Attached>;
pub type SignOperation = SignatureOperation<Versioned>;

impl<S: SignatureScheme> Operation for SignatureOperation<S> {
    fn generate(&self, algorithm: &str, options: &Options) -> Result<Artifact, InteropError> {
        let encoding = options.encoding()?;
        let signer: S::Signer = self.context.access.open_for(
            algorithm,
            options.crypted_key_set()?,
            options.pub_key()?,
        )?;
        let signature =
            S::sign(&signer, &self.context.test_data).map_err(InteropError::Generation)?;
        info!(algorithm, "generated {}", S::NAME);
        Ok(Artifact::Simple(encoding.encode(signature)))
    }

    fn test(
        &self,
        artifact: &Artifact,
        algorithm: &str,
        generate_options: &Options,
        test_options: &Options,
    ) -> Result<(), InteropError> {
        let signature = generate_options
            .encoding()?
            .decode(artifact.simple()?.to_vec())
            .map_err(InteropError::verification)?;
        let access = &self.context.access;
        let crypted = generate_options.crypted_key_set()?;
        let pub_key = test_options.pub_key()?;
        let data = &self.context.test_data;

        let result = match VerifierClass::from_option(test_options.class()?) {
            VerifierClass::Verifier => {
                let verifier: S::Verifier = access.open_for(algorithm, crypted, pub_key)?;
                S::verify_with_verifier(&verifier, data, &signature)
            }
            VerifierClass::Signer => {
                let signer: S::Signer = access.open_for(algorithm, crypted, pub_key)?;
                S::verify_with_signer(&signer, data, &signature)
            }
        };
        verdict(result, S::NAME)?;
        S::check_signed(&self.context, &signature)
    }
}
