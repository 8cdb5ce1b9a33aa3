use hex_literal::hex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wadtik::crypto::{self, KeyType, COMMON_KEY};
use wadtik::prelude::*;

fn random_ticket(rng: &mut StdRng) -> Vec<u8> {
    let mut data = vec![0u8; TICKET_SIZE];
    rng.fill(&mut data[..]);
    data
}

#[test]
fn reencode_is_byte_exact() {
    let mut rng = StdRng::seed_from_u64(0x2a4);
    for _ in 0..64 {
        let mut data = random_ticket(&mut rng);
        // bias towards the known key types, random bytes mostly land on Unknown
        data[0x1f1] = rng.gen_range(0..4);
        let ticket = Ticket::from_bytes(&data).unwrap();
        assert_eq!(ticket.to_bytes().unwrap(), data);
    }
}

#[test]
fn decode_encode_decode_is_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..32 {
        let ticket = Ticket::from_bytes(&random_ticket(&mut rng)).unwrap();
        let encoded = ticket.to_bytes().unwrap();
        assert_eq!(encoded.len(), TICKET_SIZE);
        assert_eq!(Ticket::from_bytes(&encoded).unwrap(), ticket);
    }
}

const TITLE_ID: [u8; 8] = hex!("0001000148414445");
const PLAIN_KEY: [u8; 0x10] = hex!("47a0b9e4e5ebb1d43be0f5ea6e6b5e2f");

// At-rest title keys for TITLE_ID and PLAIN_KEY, computed with
// `openssl enc -aes-128-cbc -nopad -K <common key> -iv 00010001484144450000000000000000`
const COMMON_AT_REST: [u8; 0x10] = hex!("2cea52ab2ca0d3bd478b839b60d7fcb9");
const KOREAN_AT_REST: [u8; 0x10] = hex!("3740be0c48fece298cb6939f7a2e1b1a");
const VWII_AT_REST: [u8; 0x10] = hex!("64946177b388cc6bfdb110e6adab8e65");

fn reference_ticket(key_type: u8, at_rest: &[u8; 0x10]) -> Vec<u8> {
    let mut data = vec![0u8; TICKET_SIZE];
    data[..4].copy_from_slice(&0x0001_0001u32.to_le_bytes());
    data[0x140..0x15a].copy_from_slice(b"Root-CA00000001-XS00000003");
    data[0x1bf..0x1cf].copy_from_slice(at_rest);
    data[0x1dc..0x1e4].copy_from_slice(&TITLE_ID);
    data[0x1f1] = key_type;
    data
}

#[test]
fn known_ticket_end_to_end() {
    let data = reference_ticket(0, &COMMON_AT_REST);
    let ticket = Ticket::from_bytes(&data).unwrap();
    assert_eq!(ticket.key_type(), KeyType::Common);
    assert_eq!(ticket.title_id(), "0001000148414445".parse::<TitleId>().unwrap());
    assert_eq!(ticket.iv(), hex!("00010001484144450000000000000000"));
    assert_eq!(ticket.title_key(), &PLAIN_KEY);
    assert_eq!(ticket.issuer().to_string_lossy(), "Root-CA00000001-XS00000003");
    assert_eq!(ticket.encrypted_title_key().unwrap(), COMMON_AT_REST);
    assert_eq!(ticket.to_bytes().unwrap(), data);
}

#[test]
fn known_vectors_for_every_key_type() {
    let vectors = [
        (0, KeyType::Common, COMMON_AT_REST),
        (1, KeyType::Korean, KOREAN_AT_REST),
        (2, KeyType::VWii, VWII_AT_REST),
        (7, KeyType::Unknown(7), COMMON_AT_REST),
    ];
    for (raw, key_type, at_rest) in vectors {
        let data = reference_ticket(raw, &at_rest);
        let ticket = Ticket::from_bytes(&data).unwrap();
        assert_eq!(ticket.key_type(), key_type);
        assert_eq!(ticket.title_key(), &PLAIN_KEY, "key type {raw}");
        assert_eq!(ticket.to_bytes().unwrap(), data, "key type {raw}");
    }
}

#[test]
fn known_vectors_through_raw_transform() {
    let iv = crypto::build_iv(&TitleId::from(TITLE_ID));
    assert_eq!(crypto::encrypt_title_key(&COMMON_KEY, &iv, &PLAIN_KEY).unwrap(), COMMON_AT_REST);
    assert_eq!(crypto::decrypt_title_key(&COMMON_KEY, &iv, &COMMON_AT_REST).unwrap(), PLAIN_KEY);
}

#[test]
fn moving_title_id_changes_iv() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut ticket = Ticket::from_bytes(&random_ticket(&mut rng)).unwrap();
    let key = *ticket.title_key();
    let before = ticket.encrypted_title_key().unwrap();

    ticket.set_title_id(TitleId::from(hex!("0001000157414145")));
    assert_ne!(ticket.encrypted_title_key().unwrap(), before);

    let reloaded = Ticket::from_bytes(&ticket.to_bytes().unwrap()).unwrap();
    assert_eq!(reloaded.title_key(), &key);
    assert_eq!(reloaded.title_id(), ticket.title_id());
}

#[test]
fn time_limits_round_trip() {
    let mut ticket = Ticket::from_bytes(&[0u8; TICKET_SIZE]).unwrap();
    let mut limits = [TimeLimitEntry::default(); 8];
    limits[0] = TimeLimitEntry { code: 1, limit: 3600 };
    limits[7] = TimeLimitEntry { code: 4, limit: 10 };
    ticket.set_time_limits(limits);

    let encoded = ticket.to_bytes().unwrap();
    assert_eq!(&encoded[0x264..0x26c], &hex!("01000000100e0000"));
    assert_eq!(Ticket::from_bytes(&encoded).unwrap().time_limits(), &limits);
}

#[test]
fn truncated_input_is_an_error() {
    let err = Ticket::from_bytes(&[0u8; TICKET_SIZE - 1]).unwrap_err();
    assert!(matches!(err, WadtikError::TruncatedInput { .. }));
    assert!(err.to_string().starts_with("Truncated input"));
}
