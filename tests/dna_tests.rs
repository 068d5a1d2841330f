#![allow(missing_docs)]

use feorh::error::GenomeError;
use feorh::simulation::brain::{Brain, Layout};
use feorh::simulation::dna::Genome;
use feorh::simulation::params::Params;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_brain(seed: u64) -> Brain {
    let mut rng = StdRng::seed_from_u64(seed);
    Brain::new_random(Params::default().layout(), 1.0, &mut rng)
}

fn small_layout() -> Layout {
    Layout {
        inputs: 1,
        hidden: 1,
        outputs: 1,
    }
}

#[test]
fn test_round_trip_is_exact() {
    for seed in 0..5 {
        let brain = create_test_brain(seed);
        let genome = Genome::encode(&brain);

        let decoded = genome.decode().unwrap();
        assert_eq!(decoded, brain);
        assert_eq!(Genome::encode(&decoded), genome);
    }
}

#[test]
fn test_round_trip_preserves_signed_zero() {
    let flat = [-0.0, 0.0, f32::MIN_POSITIVE, -1.5];
    let brain = Brain::from_flat(small_layout(), &flat).unwrap();
    let genome = Genome::encode(&brain);

    assert_eq!(genome.as_str(), "dna-v1:1x1x1:800000000000000000800000bfc00000");
    let decoded = genome.decode().unwrap();
    assert_eq!(decoded.to_flat_vector()[0].to_bits(), (-0.0f32).to_bits());
}

#[test]
fn test_genome_layout_header() {
    let brain = create_test_brain(7);
    let genome = Genome::encode(&brain);

    assert!(genome.as_str().starts_with("dna-v1:11x4x3:"));
    assert_eq!(genome.layout().unwrap(), Params::default().layout());
}

#[test]
fn test_parse_validates() {
    let genome = Genome::encode(&create_test_brain(3));
    let parsed: Genome = genome.as_str().parse().unwrap();
    assert_eq!(parsed, genome);
    assert_eq!(parsed.to_string(), genome.as_str());

    assert!("not a genome".parse::<Genome>().is_err());
}

#[test]
fn test_malformed_genomes() {
    let cases = [
        ("", GenomeError::MissingHeader { expected: "dna-v" }),
        ("dna-v2:1x1x1:", GenomeError::UnsupportedVersion("2".into())),
        ("dna-v1", GenomeError::UnsupportedVersion("1".into())),
        ("dna-v1:1x1", GenomeError::InvalidLayout("1x1".into())),
        ("dna-v1:1x0x1:", GenomeError::InvalidLayout("1x0x1".into())),
        ("dna-v1:1xax1:", GenomeError::InvalidLayout("1xax1".into())),
        (
            "dna-v1:1x1x1:00000000",
            GenomeError::PayloadLength {
                expected: 32,
                actual: 8,
            },
        ),
        (
            "dna-v1:1x1x1:0000000000000000000000000000002g",
            GenomeError::InvalidHex { index: 3 },
        ),
        // Valid hex, but only lowercase re-encodes to the same text.
        (
            "dna-v1:1x1x1:000000000000000000000000000000FF",
            GenomeError::NonCanonical,
        ),
        (
            "dna-v1:1x1x1:000000007fc000000000000000000000",
            GenomeError::NonFinite { index: 1 },
        ),
        (
            "dna-v1:1x1x1:00000000000000007f80000000000000",
            GenomeError::NonFinite { index: 2 },
        ),
    ];

    for (text, expected) in cases {
        assert_eq!(Genome::new(text).decode(), Err(expected), "genome {text:?}");
    }
}

#[test]
fn test_oversized_layout_is_rejected() {
    let text = format!("dna-v1:{}x{}x1:", usize::MAX, usize::MAX);
    assert!(matches!(
        Genome::new(text).decode(),
        Err(GenomeError::InvalidLayout(_))
    ));
}

#[test]
fn test_layout_mismatch() {
    let genome = Genome::encode(&create_test_brain(1));
    let expected = Layout {
        inputs: 8,
        hidden: 4,
        outputs: 3,
    };

    assert_eq!(
        genome.decode_for(expected),
        Err(GenomeError::LayoutMismatch {
            expected: (8, 4, 3),
            found: (11, 4, 3),
        })
    );
    assert!(genome.decode_for(Params::default().layout()).is_ok());
}
