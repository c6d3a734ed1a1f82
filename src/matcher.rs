//! Range matching over snapshot file lists.
//!
//! Both bounds are exclusive: `@4.1.99` drops a file named `4.1.99-*`.

use log::debug;
use rand::Rng;

use crate::filter::FilterRange;
use crate::metrics::{record_range_evaluated, record_range_matched};
use crate::sampler::pick_subset;
use crate::version::{parse_file_ver, VersionKey};

impl FilterRange {
    /// `(min unset OR ver > min) AND (max unset OR ver < max)`.
    pub fn contains(&self, ver: &VersionKey) -> bool {
        if let Some(min) = &self.min_ver {
            if ver <= min {
                return false;
            }
        }
        if let Some(max) = &self.max_ver {
            if ver >= max {
                return false;
            }
        }
        true
    }
}

/// Files whose version lies inside `range`, in input order.
///
/// A positive `max_count` hands the matches to [`pick_subset`], in which case
/// the result comes back sorted by version. `:0` means "no cap".
pub fn match_range<S, R>(files: &[S], range: &FilterRange, rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let matched: Vec<String> = files
        .iter()
        .map(|f| f.as_ref())
        .filter(|f| range.contains(&parse_file_ver(f)))
        .map(str::to_string)
        .collect();

    record_range_evaluated();
    record_range_matched(matched.len() as u64);
    debug!("range {}: {} of {} file(s) matched", range, matched.len(), files.len());

    match range.max_count {
        Some(n) if n > 0 => pick_subset(&matched, n, rng),
        _ => matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse_filter_expr;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FILES: [&str; 8] = [
        "/db/4.0.0-setupsh.sql.bz2",
        "/db/4.0.8-setupsh.sql.bz2",
        "/db/4.1.0-setupsh.sql.bz2",
        "/db/4.1.6-setupsh.sql.bz2",
        "/db/4.1.99-setupsh.sql.bz2",
        "/db/4.3.0-setupsh.sql.bz2",
        "/db/4.5-setupsh.sql.bz2",
        "/db/4.5.1-setupsh.sql.bz2",
    ];

    fn run(expr: &str) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(7);
        match_range(&FILES, &parse_filter_expr(expr).unwrap(), &mut rng)
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let got = run("@4.1.99");
        assert_eq!(got, FILES[..4].to_vec());
    }

    #[test]
    fn lower_bound_is_exclusive() {
        let got = run("@4.1.99..");
        assert_eq!(got, FILES[5..].to_vec());
    }

    #[test]
    fn both_bounds() {
        // 4.5 itself is excluded, 4.5.1 is above it
        let got = run("@4.1.0..4.5");
        assert_eq!(got, FILES[3..6].to_vec());
    }

    #[test]
    fn zero_count_means_no_cap() {
        assert_eq!(run("@4.5:0").len(), 6);
    }

    #[test]
    fn positive_count_samples() {
        let got = run("@4.0..4.5:3");
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], FILES[0]);
        assert_eq!(got[2], FILES[5]);
    }

    #[test]
    fn preserves_input_order_without_count() {
        let files = ["/db/4.3.0-a.sql.gz", "/db/4.1.0-a.sql.gz"];
        let mut rng = StdRng::seed_from_u64(1);
        let got = match_range(&files, &parse_filter_expr("@5").unwrap(), &mut rng);
        assert_eq!(got, files.to_vec());
    }

    #[test]
    fn huge_bound_keeps_integer_order() {
        let files = ["/d/4.0.0-a.sql.gz", "/d/4.5.0-a.sql.gz", "/d/3.9.0-a.sql.gz"];
        let mut rng = StdRng::seed_from_u64(1);
        let range = parse_filter_expr("@4.99999999999999999999").unwrap();
        assert_eq!(match_range(&files, &range, &mut rng), files.to_vec());

        let range = parse_filter_expr("@4.99999999999999999999..").unwrap();
        assert!(match_range(&files, &range, &mut rng).is_empty());
    }
}
