//! Integration tests for the PassVault crypto module.

use passvault::crypto::encryption::{IV_LEN, TAG_LEN};
use passvault::crypto::kdf::MIN_ITERATIONS;
use passvault::crypto::{decrypt, derive_key, derive_key_with_params, encrypt, generate_salt, KdfParams};
use passvault::errors::VaultError;

const AAD: &[u8] = b"\x01passvault-test-aad";

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_across_block_boundaries() {
    let key = [0xABu8; 32];

    for len in [0usize, 1, 15, 16, 17, 32, 1000] {
        let plaintext: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let sealed = encrypt(&key, &plaintext, AAD).expect("encrypt should succeed");

        // GCM is a stream mode: no padding.
        assert_eq!(sealed.ciphertext.len(), len);

        let recovered = decrypt(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, AAD)
            .expect("decrypt should succeed");
        assert_eq!(*recovered, plaintext, "length {len}");
    }
}

#[test]
fn encrypt_uses_fresh_iv_each_time() {
    let key = [0xCDu8; 32];
    let plaintext = b"service=email;password=hunter2";

    let a = encrypt(&key, plaintext, AAD).expect("encrypt 1");
    let b = encrypt(&key, plaintext, AAD).expect("encrypt 2");

    assert_ne!(a.iv, b.iv);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let sealed = encrypt(&[0x11u8; 32], b"TOP_SECRET", AAD).expect("encrypt");
    let result = decrypt(&[0x22u8; 32], &sealed.iv, &sealed.ciphertext, &sealed.tag, AAD);
    assert!(matches!(result, Err(VaultError::WrongPasswordOrCorrupt)));
}

#[test]
fn decrypt_with_different_associated_data_fails() {
    let key = [0x33u8; 32];
    let sealed = encrypt(&key, b"bound to header", AAD).expect("encrypt");
    let result = decrypt(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"\x02other");
    assert!(matches!(result, Err(VaultError::WrongPasswordOrCorrupt)));
}

// ---------------------------------------------------------------------------
// Tamper detection
// ---------------------------------------------------------------------------

#[test]
fn every_single_bit_flip_is_detected() {
    let key = [0x44u8; 32];
    let sealed = encrypt(&key, b"sixteen byte msg", AAD).expect("encrypt");

    for bit in 0..(sealed.ciphertext.len() * 8) {
        let mut ct = sealed.ciphertext.clone();
        ct[bit / 8] ^= 1 << (bit % 8);
        assert!(
            matches!(
                decrypt(&key, &sealed.iv, &ct, &sealed.tag, AAD),
                Err(VaultError::WrongPasswordOrCorrupt)
            ),
            "ciphertext bit {bit}"
        );
    }

    for bit in 0..(IV_LEN * 8) {
        let mut iv = sealed.iv;
        iv[bit / 8] ^= 1 << (bit % 8);
        assert!(
            matches!(
                decrypt(&key, &iv, &sealed.ciphertext, &sealed.tag, AAD),
                Err(VaultError::WrongPasswordOrCorrupt)
            ),
            "iv bit {bit}"
        );
    }

    for bit in 0..(TAG_LEN * 8) {
        let mut tag = sealed.tag;
        tag[bit / 8] ^= 1 << (bit % 8);
        assert!(
            matches!(
                decrypt(&key, &sealed.iv, &sealed.ciphertext, &tag, AAD),
                Err(VaultError::WrongPasswordOrCorrupt)
            ),
            "tag bit {bit}"
        );
    }
}

#[test]
fn malformed_lengths_are_invalid_input() {
    let key = [0x55u8; 32];
    let sealed = encrypt(&key, b"x", AAD).expect("encrypt");

    assert!(matches!(
        decrypt(&key, &sealed.iv[..12], &sealed.ciphertext, &sealed.tag, AAD),
        Err(VaultError::InvalidInput(_))
    ));
    assert!(matches!(
        decrypt(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag[..8], AAD),
        Err(VaultError::InvalidInput(_))
    ));
    assert!(matches!(
        encrypt(&key[..16], b"x", AAD),
        Err(VaultError::InvalidInput(_))
    ));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derivation_is_deterministic() {
    let salt = generate_salt().unwrap();
    let a = derive_key(b"my-password", &salt).unwrap();
    let b = derive_key(b"my-password", &salt).unwrap();
    assert_eq!(a, b);
}

#[test]
fn derivation_depends_on_password_salt_and_iterations() {
    let salt = [7u8; 16];
    let base = derive_key(b"password-one", &salt).unwrap();

    assert_ne!(base, derive_key(b"password-two", &salt).unwrap());
    assert_ne!(base, derive_key(b"password-one", &[8u8; 16]).unwrap());

    let stronger = KdfParams {
        iterations: MIN_ITERATIONS + 1,
    };
    assert_ne!(
        base,
        derive_key_with_params(b"password-one", &salt, &stronger).unwrap()
    );
}

#[test]
fn derivation_rejects_bad_input() {
    let salt = [0u8; 16];
    assert!(matches!(
        derive_key(b"", &salt),
        Err(VaultError::InvalidInput(_))
    ));
    assert!(matches!(
        derive_key(b"pw", &[0u8; 8]),
        Err(VaultError::InvalidInput(_))
    ));
    let weak = KdfParams { iterations: 1_000 };
    assert!(matches!(
        derive_key_with_params(b"pw", &salt, &weak),
        Err(VaultError::InvalidInput(_))
    ));
}

#[test]
fn salts_are_random() {
    let a = generate_salt().unwrap();
    let b = generate_salt().unwrap();
    assert_eq!(a.len(), 16);
    assert_ne!(a, b);
}

#[test]
fn derived_key_debug_is_redacted() {
    let key = derive_key(b"hunter2-hunter2", &[1u8; 16]).unwrap();
    let shown = format!("{key:?}");
    assert_eq!(shown, "DerivedKey([REDACTED])");
}
