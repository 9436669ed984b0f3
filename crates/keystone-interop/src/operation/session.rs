use super::{Artifact, Operation, OperationContext};
use crate::error::InteropError;
use crate::options::Options;
use keystone_crypto::{
    Crypter, Encrypter, SignedSessionDecrypter, SignedSessionEncrypter, Signer, Verifier,
};
use tracing::{debug, info};

/// Hybrid encryption: a fresh session key encrypted to `algorithm` and
/// signed by the `signer` key set, with the payload under the session key
pub struct SignedSessionOperation {
    context: OperationContext,
}

impl SignedSessionOperation {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }
}

impl Operation for SignedSessionOperation {
    fn generate(&self, algorithm: &str, options: &Options) -> Result<Artifact, InteropError> {
        let access = &self.context.access;
        let crypted = options.crypted_key_set()?;
        let signer_algorithm = options.signer()?;

        let signer: Signer = access.open_for(signer_algorithm, crypted, "")?;
        let encrypter: Encrypter = access.open_for(algorithm, crypted, options.pub_key()?)?;
        debug!(algorithm, signer = signer_algorithm, "session keys acquired");

        let session =
            SignedSessionEncrypter::new(&encrypter, &signer).map_err(InteropError::Generation)?;
        let output = session
            .encrypt(&self.context.test_data)
            .map_err(InteropError::Generation)?;

        info!(algorithm, signer = signer_algorithm, "generated signed session");
        Ok(Artifact::Session {
            output,
            session_material: session.session_material().to_string(),
        })
    }

    fn test(
        &self,
        artifact: &Artifact,
        algorithm: &str,
        generate_options: &Options,
        test_options: &Options,
    ) -> Result<(), InteropError> {
        let (output, session_material) = artifact.session()?;
        let access = &self.context.access;
        let crypted = generate_options.crypted_key_set()?;

        let verifier: Verifier = access.open_for(generate_options.signer()?, crypted, "")?;
        let crypter: Crypter = access.open_for(algorithm, crypted, test_options.pub_key()?)?;

        // Signature is checked inside new(), before the session key is decrypted
        let session = SignedSessionDecrypter::new(&crypter, &verifier, session_material)
            .map_err(InteropError::verification)?;
        let plaintext = session
            .decrypt(output)
            .map_err(InteropError::verification)?;
        self.context.expect_test_data(&plaintext, "session payload")
    }
}
