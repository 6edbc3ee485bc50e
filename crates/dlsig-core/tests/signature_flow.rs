//! End-to-end flow at the default sizes (576-bit p, 160-bit q)

use dlsig_core::arith::mod_pow;
use dlsig_core::{
    hash_document, keygen, DecimalLines, DomainParameters, MillerRabin, ParameterConfig,
    ParameterGenerator, PrivateKey, Signature, Signer, VerificationKey, Verifier,
};
use num_bigint_dig::BigUint;
use num_traits::One;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::OnceLock;

fn domain() -> &'static DomainParameters {
    static DOMAIN: OnceLock<DomainParameters> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        ParameterGenerator::new(ParameterConfig::default())
            .generate(&mut rng)
            .unwrap()
    })
}

#[test]
fn test_default_parameters_satisfy_invariants() {
    let domain = domain();
    domain
        .validate(&ParameterConfig::default(), &MillerRabin::default())
        .unwrap();

    assert_eq!(domain.q.bits(), 160);
    assert_eq!(domain.p.bits(), 576);
    assert_ne!(domain.g, BigUint::one());
    assert!(mod_pow(&domain.g, &domain.q, &domain.p).unwrap().is_one());
}

#[test]
fn test_sign_verify_roundtrip() {
    let domain = domain();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let pair = keygen::generate(domain, &mut rng).unwrap();
    assert!(mod_pow(pair.public.value(), &domain.q, &domain.p)
        .unwrap()
        .is_one());

    let signer = Signer::new(domain.clone(), pair.private).unwrap();
    let verifier = Verifier::checked(domain.clone(), pair.public).unwrap();

    let digest = hash_document(b"The quick brown fox jumps over the lazy dog");
    let signature = signer.sign(&digest, &mut rng).unwrap();
    signature.check_range(&domain.q).unwrap();

    assert!(verifier.verify(&digest, &signature));
    assert!(!verifier.verify(&hash_document(b"The quick brown fox jumps over the lazy cog"), &signature));

    let mut tampered = signature.clone();
    tampered.c2 ^= &(BigUint::one() << 17usize);
    assert!(!verifier.verify(&digest, &tampered));
}

#[test]
fn test_interchange_roundtrip() {
    let domain = domain();
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let pair = keygen::generate(domain, &mut rng).unwrap();

    let key = VerificationKey::new(domain.clone(), pair.public.clone());
    let key_text = key.to_decimal_lines();
    assert_eq!(key_text.lines().count(), 4);
    let secret_text = pair.private.to_decimal_lines();

    let signer = Signer::new(
        domain.clone(),
        PrivateKey::from_decimal_lines(&secret_text).unwrap(),
    )
    .unwrap();
    let digest = hash_document(b"persisted document");
    let signature = signer.sign(&digest, &mut rng).unwrap();
    let sig_text = signature.to_decimal_lines();

    let verifier = Verifier::from(VerificationKey::from_decimal_lines(&key_text).unwrap());
    let loaded = Signature::from_decimal_lines(&sig_text).unwrap();
    assert_eq!(loaded, signature);
    assert!(verifier.verify(&digest, &loaded));

    let json = serde_json::to_string(&key).unwrap();
    let back: VerificationKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}
