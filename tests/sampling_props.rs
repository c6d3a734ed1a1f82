// tests/sampling_props.rs
//
// Свойства pick_subset на случайно сгенерированных списках версий
// (oorandom для генерации входов, StdRng с фиксированным seed для выборки).

use std::collections::{BTreeSet, HashSet};

use oorandom::Rand64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use SnapPick::version::file_major_minor;
use SnapPick::{pick_subset, sort_files_by_ver};

/// Random snapshot names: 4.x.y / 5.x.y plus some pre-releases and duplicates.
fn random_files(rng: &mut Rand64) -> Vec<String> {
    let n = 1 + rng.rand_range(0..40) as usize;
    let mut out = Vec::with_capacity(n + 4);
    for _ in 0..n {
        let major = 4 + rng.rand_range(0..2);
        let minor = rng.rand_range(0..8);
        let patch = match rng.rand_range(0..10) {
            0 => format!("alpha{}", rng.rand_range(1..4)),
            1 => format!("beta{}", rng.rand_range(1..4)),
            _ => rng.rand_range(0..40).to_string(),
        };
        out.push(format!("/db/{major}.{minor}.{patch}-setupsh.sql.bz2"));
    }
    // exact duplicates must collapse
    for _ in 0..rng.rand_range(0..4) {
        let i = rng.rand_range(0..out.len() as u64) as usize;
        out.push(out[i].clone());
    }
    out
}

#[test]
fn size_subset_sorted_and_ends_kept() {
    let mut gen = Rand64::new(0x5EED_0001);
    for round in 0..300u64 {
        let files = random_files(&mut gen);
        let distinct = sort_files_by_ver(&files);
        let max_count = gen.rand_range(0..(distinct.len() as u64 + 3)) as usize;

        let mut rng = StdRng::seed_from_u64(round);
        let got = pick_subset(&files, max_count, &mut rng);

        assert_eq!(got.len(), max_count.min(distinct.len()), "round {round}");
        assert_eq!(got, sort_files_by_ver(&got), "round {round}: not sorted");
        let uniq: HashSet<&String> = got.iter().collect();
        assert_eq!(uniq.len(), got.len(), "round {round}: duplicates");
        assert!(got.iter().all(|f| distinct.contains(f)), "round {round}");
        if max_count >= 2 {
            assert_eq!(got.first(), distinct.first(), "round {round}: lowest");
            assert_eq!(got.last(), distinct.last(), "round {round}: highest");
        }
    }
}

#[test]
fn every_series_before_any_repeat() {
    let mut gen = Rand64::new(0x5EED_0002);
    for round in 0..300u64 {
        let files = random_files(&mut gen);
        let distinct = sort_files_by_ver(&files);
        if distinct.len() < 3 {
            continue;
        }
        // Series of the middle pool (ends are always picked).
        let middle = &distinct[1..distinct.len() - 1];
        let series: BTreeSet<String> = middle.iter().map(|f| file_major_minor(f)).collect();
        let max_count = 2 + series.len();
        if max_count >= distinct.len() {
            continue;
        }

        let mut rng = StdRng::seed_from_u64(round);
        let got = pick_subset(&files, max_count, &mut rng);
        let covered: BTreeSet<String> = got.iter().map(|f| file_major_minor(f)).collect();
        assert!(
            series.is_subset(&covered),
            "round {round}: {series:?} not covered by {got:?}"
        );
    }
}

#[test]
fn sort_is_idempotent_total_order() {
    let mut gen = Rand64::new(0x5EED_0003);
    for _ in 0..200 {
        let mut files = random_files(&mut gen);
        let once = sort_files_by_ver(&files);
        assert_eq!(once, sort_files_by_ver(&once));
        // input order must not change the sorted set of versions
        files.reverse();
        let again = sort_files_by_ver(&files);
        let vers = |v: &[String]| -> Vec<String> {
            v.iter()
                .map(|f| SnapPick::parse_file_ver(f).to_string())
                .collect()
        };
        assert_eq!(vers(&once), vers(&again));
    }
}
