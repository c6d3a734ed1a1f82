//! Representative subset selection (`pick_subset`).
//!
//! Выбор: самый старый файл, самый новый файл, затем случайные файлы из
//! середины. Пока в пуле есть серии major.minor без единого выбранного файла,
//! кандидаты из уже покрытых серий пропускаются. Когда покрыты все серии,
//! повторы внутри серии разрешены.
//!
//! The draw is uniform over the eligible candidates. That is the same
//! distribution as drawing over the whole pool and re-drawing on a covered
//! series, but every draw is accepted, so the loop runs exactly
//! `max_count - 2` times.

use std::collections::{BTreeSet, HashSet};

use log::debug;
use rand::Rng;

use crate::metrics::{record_sampler_draw, record_sampler_run};
use crate::version::{file_major_minor, sort_files_by_ver};

/// Pick at most `max_count` files spanning the version range of `files`.
///
/// The result is sorted ascending, has no duplicates and always contains the
/// lowest version (when `max_count >= 1`) and the highest (when `>= 2`).
/// Never fails; small inputs come back whole.
pub fn pick_subset<S, R>(files: &[S], max_count: usize, rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut sorted = sort_files_by_ver(files);
    if max_count >= sorted.len() {
        return sorted;
    }
    record_sampler_run();

    let mut remaining = max_count;
    let mut selections: Vec<String> = Vec::with_capacity(max_count);

    if remaining > 0 {
        selections.push(sorted.remove(0));
        remaining -= 1;
    }
    if remaining > 0 {
        if let Some(last) = sorted.pop() {
            selections.push(last);
            remaining -= 1;
        }
    }

    // (file, series)
    let mut pool: Vec<(String, String)> = sorted
        .into_iter()
        .map(|f| {
            let mm = file_major_minor(&f);
            (f, mm)
        })
        .collect();
    let all_series: BTreeSet<String> = pool.iter().map(|(_, mm)| mm.clone()).collect();
    let mut covered: HashSet<String> = selections.iter().map(|f| file_major_minor(f)).collect();

    debug!(
        "pick_subset: {} to pick from {} candidate(s) in {} series",
        remaining,
        pool.len(),
        all_series.len()
    );

    while remaining > 0 && !pool.is_empty() {
        let all_covered = all_series.iter().all(|s| covered.contains(s));

        let idx = if all_covered {
            record_sampler_draw(0);
            rng.gen_range(0..pool.len())
        } else {
            // Uncovered series still have all their files in the pool,
            // so this list is never empty.
            let eligible: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, (_, mm))| !covered.contains(mm))
                .map(|(i, _)| i)
                .collect();
            record_sampler_draw((pool.len() - eligible.len()) as u64);
            eligible[rng.gen_range(0..eligible.len())]
        };

        let (file, mm) = pool.remove(idx);
        covered.insert(mm);
        selections.push(file);
        remaining -= 1;
    }

    sort_files_by_ver(&selections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn files(vers: &[&str]) -> Vec<String> {
        vers.iter().map(|v| format!("/db/{v}-setupsh.sql.bz2")).collect()
    }

    fn series_files() -> Vec<String> {
        files(&[
            "4.0.0", "4.0.8", "4.1.0", "4.1.6", "4.2.0", "4.2.9", "4.3.0", "4.3.7", "4.4.0",
            "4.4.5", "4.5.0", "4.5.10", "4.6.0", "4.6.36", "4.7.0", "4.7.31",
        ])
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_subset(&series_files(), 0, &mut rng).is_empty());
    }

    #[test]
    fn large_count_returns_sorted_unique_input() {
        let mut input = files(&["4.2.0", "4.0.0", "4.1.0"]);
        input.push(input[0].clone());
        let mut rng = StdRng::seed_from_u64(1);
        let got = pick_subset(&input, 10, &mut rng);
        assert_eq!(got, files(&["4.0.0", "4.1.0", "4.2.0"]));
        let got = pick_subset(&input, 3, &mut rng);
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn one_keeps_lowest_two_keeps_both_ends() {
        let all = series_files();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_subset(&all, 1, &mut rng), vec![all[0].clone()]);
        assert_eq!(
            pick_subset(&all, 2, &mut rng),
            vec![all[0].clone(), all[all.len() - 1].clone()]
        );
    }

    #[test]
    fn size_bounds_subset_sorted() {
        let all = series_files();
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for n in 0..=all.len() + 2 {
                let got = pick_subset(&all, n, &mut rng);
                assert_eq!(got.len(), n.min(all.len()));
                assert_eq!(got, sort_files_by_ver(&got));
                let uniq: HashSet<&String> = got.iter().collect();
                assert_eq!(uniq.len(), got.len());
                assert!(got.iter().all(|f| all.contains(f)));
                if n >= 2 {
                    assert_eq!(got.first(), all.first());
                    assert_eq!(got.last(), all.last());
                }
            }
        }
    }

    #[test]
    fn covers_every_series_before_repeating() {
        let all = series_files();
        // 8 series total; ends cover 4.0 and 4.7, the middle pool holds all 8.
        for seed in 0..100u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let got = pick_subset(&all, 10, &mut rng);
            let mut per_series: HashMap<String, usize> = HashMap::new();
            for f in &got {
                *per_series.entry(file_major_minor(f)).or_default() += 1;
            }
            assert_eq!(per_series.len(), 8, "seed {seed}: {got:?}");
        }
    }

    #[test]
    fn single_series_terminates() {
        let all = files(&["4.7.0", "4.7.1", "4.7.2", "4.7.3", "4.7.4", "4.7.5"]);
        let mut rng = StdRng::seed_from_u64(9);
        let got = pick_subset(&all, 4, &mut rng);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn lone_middle_series_is_always_picked() {
        // Two crowded series around a single-file one.
        let mut vers: Vec<String> = (0..20).map(|i| format!("4.7.{i}")).collect();
        vers.push("4.8.0".into());
        vers.extend((0..20).map(|i| format!("4.9.{i}")));
        let refs: Vec<&str> = vers.iter().map(|s| s.as_str()).collect();
        let all = files(&refs);
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let got = pick_subset(&all, 3, &mut rng);
            assert!(got.iter().any(|f| f.contains("/4.8.0-")), "seed {seed}: {got:?}");
        }
    }

    #[test]
    fn same_seed_same_result() {
        let all = series_files();
        let a = pick_subset(&all, 5, &mut StdRng::seed_from_u64(42));
        let b = pick_subset(&all, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
