extern crate bech32;
extern crate bech32_info;
extern crate rand;
extern crate rand_chacha;
extern crate serde_json;

use bech32::{Bech32, Bech32m, Hrp};
use bech32_info::bitcoin::Network;
use bech32_info::codec;
use bech32_info::raw::{self, RawEncoding};
use bech32_info::{
    analyze, classify, ContractId, ParseStatus, PayloadCategory, PayloadDetail, Rgb20Asset,
    Variant, WireReport,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const ITERATIONS: usize = 300;

fn random_hrp<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(1..8);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

fn random_bytes<R: Rng>(rng: &mut R, max: usize) -> Vec<u8> {
    let len = rng.gen_range(0..max);
    (0..len).map(|_| rng.gen()).collect()
}

fn random_variant<R: Rng>(rng: &mut R) -> Variant {
    if rng.gen_bool(0.5) {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

/// A random, valid, lower-case string short enough for every detection
/// guarantee of the checksum to hold.
fn random_string<R: Rng>(rng: &mut R) -> (String, Vec<u8>, Variant) {
    let hrp = random_hrp(rng);
    let data = random_bytes(rng, 40);
    let variant = random_variant(rng);
    let s = codec::encode(&hrp, &data, variant).unwrap();
    assert!(s.len() <= 89);
    (s, data, variant)
}

fn sample_asset() -> Rgb20Asset {
    Rgb20Asset {
        contract_id: ContractId::from_byte_array([1; 32]),
        ticker: "BTCX".to_owned(),
        name: "Wrapped test coin".to_owned(),
        description: None,
        chain: Network::Signet,
        precision: 0,
        known_circulating: 21,
        max_cap: 21,
        date: 1_231_006_505,
    }
}

#[test]
fn matches_reference_encoder() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x0b3c_4321);
    for _ in 0..ITERATIONS {
        let hrp = random_hrp(&mut rng);
        let data = random_bytes(&mut rng, 60);
        let variant = random_variant(&mut rng);

        let ours = codec::encode(&hrp, &data, variant).unwrap();
        let reference_hrp = Hrp::parse(&hrp).unwrap();
        let theirs = match variant {
            Variant::Bech32 => bech32::encode::<Bech32>(reference_hrp, &data).unwrap(),
            Variant::Bech32m => bech32::encode::<Bech32m>(reference_hrp, &data).unwrap(),
        };
        assert_eq!(ours, theirs);

        let (decoded_hrp, decoded, decoded_variant) = codec::decode(&ours).unwrap();
        assert_eq!(decoded_hrp, hrp);
        assert_eq!(decoded, data);
        assert_eq!(decoded_variant, variant);

        let (reference_hrp, reference_data) = bech32::decode(&ours).unwrap();
        assert_eq!(reference_hrp.to_lowercase(), decoded_hrp);
        assert_eq!(reference_data, decoded);

        // and back again
        assert_eq!(codec::encode(&decoded_hrp, &decoded, decoded_variant).unwrap(), ours);
    }
}

#[test]
fn single_substitution_is_detected() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..ITERATIONS {
        let (s, _, _) = random_string(&mut rng);
        let sep = s.rfind('1').unwrap();
        let pos = rng.gen_range(sep + 1..s.len());
        let old = s.as_bytes()[pos];
        let new = loop {
            let c = CHARSET.as_bytes()[rng.gen_range(0..32)];
            if c != old {
                break c;
            }
        };
        let mut corrupted = s.into_bytes();
        corrupted[pos] = new;
        let corrupted = String::from_utf8(corrupted).unwrap();

        let report = analyze(&corrupted);
        assert_eq!(report.status(), ParseStatus::ChecksumError, "{}", corrupted);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert_eq!(report.variant(), None);
    }
}

#[test]
fn mixed_case_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x1234);
    for _ in 0..ITERATIONS {
        let (s, _, _) = random_string(&mut rng);
        let letters: Vec<usize> =
            s.char_indices().filter(|(_, c)| c.is_ascii_alphabetic()).map(|(i, _)| i).collect();
        let pos = letters[rng.gen_range(0..letters.len())];
        let mut mixed = s.into_bytes();
        mixed[pos] = mixed[pos].to_ascii_uppercase();
        let mixed = String::from_utf8(mixed).unwrap();

        let status = analyze(&mixed).status();
        assert!(
            status == ParseStatus::HrpError || status == ParseStatus::EncodingError,
            "{}: {}",
            mixed,
            status
        );
    }
}

#[test]
fn classification_is_total() {
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    for _ in 0..ITERATIONS {
        let hrp = random_hrp(&mut rng);
        let payload = random_bytes(&mut rng, 8);
        let category = classify(&hrp, &payload);
        assert!(PayloadCategory::ALL.contains(&category));
    }
    assert_eq!(classify("", &[]), PayloadCategory::Unknown);
}

#[test]
fn segwit_matches_reference_decoder() {
    let addresses = [
        "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
        "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y",
        "BC1SW50QGDZ25J",
        "bc1zw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx",
        "tb1qqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesrxh6hy",
        "tb1pqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesf3hn0c",
        "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0",
    ];
    for address in addresses.iter() {
        let report = analyze(address);
        assert!(report.is_ok(), "{}: {}", address, report);
        assert_eq!(report.category(), PayloadCategory::BcAddress);

        let (_, version, program) = bech32::segwit::decode(address).unwrap();
        match report.detail() {
            Some(PayloadDetail::Address(addr)) => {
                assert_eq!(addr.version, version.to_u8());
                assert_eq!(addr.program, program);
                assert_eq!(addr.witness_version().map(|v| v.to_num()), Some(version.to_u8()));
            }
            x => panic!("unexpected detail for {}: {:?}", address, x),
        }
        // version 0 is the only one on bech32
        assert_eq!(report.is_bech32m(), version.to_u8() != 0);
    }
}

#[test]
fn invalid_segwit_addresses() {
    let addresses = [
        // bech32 instead of bech32m
        "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqh2y7hd",
        // bech32m instead of bech32
        "tb1q0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vq24jc47",
        // invalid witness version
        "BC130XLXVLHEMJA6C4DQV22UAPCTQUPFHLXM9H8Z3K2E72Q4K9HCZ7VQ7ZWS8R",
        // invalid program length
        "bc1pw5dgrnzv",
        "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7v8n0nx0muaewav253zgeav",
        "BC1QR508D6QEJXTDG4Y5R3ZARVARYV98GJ9P",
    ];
    for address in addresses.iter() {
        let report = analyze(address);
        assert_eq!(report.status(), ParseStatus::PayloadError, "{}: {}", address, report);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert!(report.detail().is_none());
    }

    let bad_padding = [
        // more than 4 padding bits
        "bc1zw508d6qejxtdg4y5r3zarvaryvqyzf3du",
        // non-zero padding
        "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3pjxtptv",
    ];
    for address in bad_padding.iter() {
        assert_eq!(analyze(address).status(), ParseStatus::EncodingError, "{}", address);
    }
}

#[test]
fn categories_end_to_end() {
    let id = [0x5a; 32];
    let cases = [
        ("lnurl", b"https://example.com/lnurlp/alice".to_vec(), PayloadCategory::Url),
        ("id", id.to_vec(), PayloadCategory::LnpbpId),
        ("sch", id.to_vec(), PayloadCategory::RgbSchemaId),
        ("rgb", id.to_vec(), PayloadCategory::RgbContractId),
        ("data", vec![0, 1, 2, 3], PayloadCategory::LnpbpData),
        ("data", raw::encode(RawEncoding::Deflate, &[1, 2, 3]), PayloadCategory::LnpbpZData),
        ("z", raw::deflate(&[7; 12]), PayloadCategory::LnpbpZData),
        ("i", vec![7; 12], PayloadCategory::LnpbpInvoice),
        ("schema", vec![0, 9, 9], PayloadCategory::RgbSchema),
        ("genesis", raw::encode(RawEncoding::Deflate, &[9, 9]), PayloadCategory::RgbGenesis),
        ("consignment", vec![0], PayloadCategory::RgbConsignment),
        ("rgb20", sample_asset().to_payload(), PayloadCategory::Rgb20Asset),
        ("nothing", vec![1, 2, 3], PayloadCategory::Unknown),
    ];
    for (hrp, payload, category) in cases.iter() {
        let s = codec::encode(hrp, payload, Variant::Bech32m).unwrap();
        let report = analyze(&s);
        assert!(report.is_ok(), "{}: {}", s, report);
        assert_eq!(report.category(), *category, "{}", s);
        assert!(report.detail().is_some());

        let upper = analyze(&s.to_uppercase());
        assert_eq!(upper, report);
    }
}

#[test]
fn compressed_payloads() {
    let asset = sample_asset();
    let s = asset.to_compressed_string().unwrap();
    let report = analyze(&s);
    assert!(report.is_ok(), "{}: {}", s, report);
    assert!(report.is_bech32m());
    assert_eq!(report.category(), PayloadCategory::Rgb20Asset);
    assert_eq!(report.detail(), Some(&PayloadDetail::Rgb20Asset(asset.clone())));
    assert_eq!(s.parse::<Rgb20Asset>().unwrap(), asset);

    let back = WireReport::from_json(&report.to_json()).unwrap().interpret();
    assert_eq!(back, report);

    let data = b"zipped LNPBP data, zipped LNPBP data".to_vec();
    let s = codec::encode("z", &raw::deflate(&data), Variant::Bech32m).unwrap();
    let report = analyze(&s);
    assert!(report.is_ok(), "{}: {}", s, report);
    assert_eq!(report.category(), PayloadCategory::LnpbpZData);
    assert_eq!(report.detail(), Some(&PayloadDetail::Data(data)));

    // a corrupt stream is malformed, an unknown header is unsupported
    let s = codec::encode("z", &[0x07], Variant::Bech32m).unwrap();
    assert_eq!(analyze(&s).status(), ParseStatus::PayloadError);
    let s = codec::encode("genesis", &[2, 9, 9], Variant::Bech32m).unwrap();
    assert_eq!(analyze(&s).status(), ParseStatus::UnsupportedError);
}

#[test]
fn lightning_invoice() {
    // timestamp 1496314658, a payment hash field and an all-zero signature
    let mut symbols = vec![1, 12, 18, 31, 28, 25, 2];
    symbols.extend_from_slice(&[1, 1, 20]);
    symbols.extend(std::iter::repeat(0).take(52));
    symbols.extend(std::iter::repeat(0).take(104));
    let invoice = codec::encode_symbols("lnbc2500u", &symbols, Variant::Bech32).unwrap();

    let report = analyze(&invoice);
    assert!(report.is_ok(), "{}", report);
    assert_eq!(report.category(), PayloadCategory::Bolt11Invoice);
    assert!(!report.is_bech32m());
    match report.detail() {
        Some(PayloadDetail::Invoice(summary)) => {
            assert_eq!(summary.network, Network::Bitcoin);
            assert_eq!(summary.amount_msat, Some(250_000_000));
            assert_eq!(summary.timestamp, 1_496_314_658);
        }
        x => panic!("unexpected detail {:?}", x),
    }

    let testnet = codec::encode_symbols("lntb", &symbols, Variant::Bech32).unwrap();
    match analyze(&testnet).detail() {
        Some(PayloadDetail::Invoice(summary)) => {
            assert_eq!(summary.network, Network::Testnet);
            assert_eq!(summary.amount_msat, None);
        }
        x => panic!("unexpected detail {:?}", x),
    }

    let bad_amount = codec::encode_symbols("lnbc0250u", &symbols, Variant::Bech32).unwrap();
    assert_eq!(analyze(&bad_amount).status(), ParseStatus::PayloadError);
}

#[test]
fn truncated_asset() {
    let payload = sample_asset().to_payload();
    let mut rng = ChaCha20Rng::seed_from_u64(20);
    for _ in 0..20 {
        let cut = rng.gen_range(1..payload.len());
        let s = codec::encode("rgb20", &payload[..cut], Variant::Bech32m).unwrap();
        let report = analyze(&s);
        assert_eq!(report.status(), ParseStatus::PayloadError, "cut at {}", cut);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert!(!report.diagnostic().is_empty());
    }
}

#[test]
fn wire_round_trip() {
    let asset = sample_asset();
    let inputs = [
        asset.to_string(),
        "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4".to_owned(),
        "a12uel5l".to_owned(),
        "".to_owned(),
        "x1qqqqqq".to_owned(),
        // a lone symbol leaves non-zero padding after a valid checksum
        codec::encode_symbols("id", &[1], Variant::Bech32).unwrap(),
        codec::encode_symbols("id", &[1], Variant::Bech32m).unwrap(),
    ];
    for input in inputs.iter() {
        let report = analyze(input);
        let json = report.to_json();
        let wire = WireReport::from_json(&json).unwrap();
        assert_eq!(wire, report.to_wire());

        let back = wire.interpret();
        assert_eq!(back.status(), report.status());
        assert_eq!(back.category(), report.category());
        assert_eq!(back.is_bech32m(), report.is_bech32m());
        assert_eq!(back.variant(), report.variant(), "input: {}", input);
        if report.category().is_structured() {
            assert_eq!(back.detail(), report.detail());
        }
    }

    let mut wire = analyze(&asset.to_string()).to_wire();
    wire.details = "{\"id\": 3}".to_owned();
    let report = wire.interpret();
    assert_eq!(report.status(), ParseStatus::InvalidDetailJson);
    assert_eq!(report.category(), PayloadCategory::Unknown);
    assert_eq!(report.diagnostic(), bech32_info::INVALID_DETAIL_JSON_MESSAGE);

    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["status"], 65535);
}
