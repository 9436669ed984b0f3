use super::{Artifact, EncrypterClass, Operation, OperationContext};
use crate::error::InteropError;
use crate::options::Options;
use keystone_crypto::{Crypter, Encrypter};
use tracing::info;

pub struct EncryptOperation {
    context: OperationContext,
}

impl EncryptOperation {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }
}

impl Operation for EncryptOperation {
    fn generate(&self, algorithm: &str, options: &Options) -> Result<Artifact, InteropError> {
        let encoding = options.encoding()?;
        let access = &self.context.access;
        let crypted = options.crypted_key_set()?;
        let pub_key = options.pub_key()?;
        let data = &self.context.test_data;

        let class = EncrypterClass::from_option(options.class()?);
        let ciphertext = match class {
            EncrypterClass::Crypter => access
                .open_for::<Crypter>(algorithm, crypted, pub_key)?
                .encrypt(data),
            EncrypterClass::Encrypter => access
                .open_for::<Encrypter>(algorithm, crypted, pub_key)?
                .encrypt(data),
        }
        .map_err(InteropError::Generation)?;

        info!(algorithm, ?class, "generated ciphertext");
        Ok(Artifact::Simple(encoding.encode(ciphertext)))
    }

    fn test(
        &self,
        artifact: &Artifact,
        algorithm: &str,
        generate_options: &Options,
        test_options: &Options,
    ) -> Result<(), InteropError> {
        let ciphertext = generate_options
            .encoding()?
            .decode(artifact.simple()?.to_vec())
            .map_err(InteropError::verification)?;
        let crypter: Crypter = self.context.access.open_for(
            algorithm,
            generate_options.crypted_key_set()?,
            test_options.pub_key()?,
        )?;

        let plaintext = crypter
            .decrypt(&ciphertext)
            .map_err(InteropError::verification)?;
        self.context.expect_test_data(&plaintext, "decrypted data")
    }
}
