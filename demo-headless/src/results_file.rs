//! Results files and stratification artifacts
//!
//! A results file is a whitespace-separated list of absorption days. The
//! stratification artifact for `<name>` is written next to it as
//! `variance_<name>`. Cut-points for the stratification are read line by line
//! up to a negative sentinel.

use crate::HeadlessError;
use forest_sim_core::{CutPoints, Estimate};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Parse absorption days, stopping at the first token that is not one
pub fn parse_samples(contents: &str) -> Vec<u32> {
    contents
        .split_whitespace()
        .map_while(|token| token.parse::<u32>().ok())
        .collect()
}

/// Read a results file
///
/// # Errors
/// Returns [`HeadlessError::FileAccess`] naming the path if it cannot be read.
pub fn read_samples(path: &Path) -> Result<Vec<u32>, HeadlessError> {
    let contents = fs::read_to_string(path).map_err(|source| HeadlessError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_samples(&contents))
}

/// Write `samples` one per line
///
/// # Errors
/// Returns [`HeadlessError::FileAccess`] naming the path if it cannot be written.
pub fn write_samples(path: &Path, samples: &[u32]) -> Result<(), HeadlessError> {
    let mut contents = String::with_capacity(samples.len() * 6);
    for day in samples {
        let _ = writeln!(contents, "{day}");
    }
    fs::write(path, contents).map_err(|source| HeadlessError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Read cut-points line by line up to the line holding a negative value
///
/// `prompt` runs before each line is read. Lines after the sentinel line are
/// left in `reader`.
///
/// # Errors
/// Returns the underlying I/O error if a line cannot be read.
pub fn read_cut_points<R: BufRead>(
    reader: R,
    horizon: u32,
    mut prompt: impl FnMut(),
) -> io::Result<CutPoints> {
    let mut collected = String::new();
    let mut lines = reader.lines();

    loop {
        prompt();
        let Some(line) = lines.next() else { break };
        let line = line?;
        let hit_sentinel = line
            .split_whitespace()
            .filter_map(|token| token.parse::<i64>().ok())
            .any(|value| value < 0);
        collected.push_str(&line);
        collected.push('\n');
        if hit_sentinel {
            break;
        }
    }

    Ok(CutPoints::parse_until_negative(&collected, horizon))
}

/// Path of the stratification artifact for `input`
pub fn artifact_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map_or_else(|| "results".into(), |n| n.to_string_lossy().into_owned());
    input.with_file_name(format!("variance_{name}"))
}

/// Line stored in the stratification artifact
pub fn artifact_line(estimate: &Estimate) -> String {
    format!("The mean t is {} +- {}", estimate.mean, estimate.half_width)
}

/// Write the stratification artifact for `input` and return its path
///
/// # Errors
/// Returns [`HeadlessError::FileAccess`] naming the artifact path if it cannot
/// be written.
pub fn write_artifact(input: &Path, estimate: &Estimate) -> Result<PathBuf, HeadlessError> {
    let path = artifact_path(input);
    fs::write(&path, format!("{}\n", artifact_line(estimate))).map_err(|source| {
        HeadlessError::FileAccess {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("forest-sim-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_stops_at_first_bad_token() {
        assert_eq!(parse_samples("12 7\n301\t44"), vec![12, 7, 301, 44]);
        assert_eq!(parse_samples("5 6 x 9"), vec![5, 6]);
        assert_eq!(parse_samples("5 -2 9"), vec![5]);
        assert!(parse_samples("").is_empty());
    }

    #[test]
    fn test_cut_points_stop_mid_line_at_sentinel() {
        let cuts = read_cut_points("10 20 -1 30\n".as_bytes(), 18250, || {}).unwrap();
        assert_eq!(cuts.as_slice(), &[10, 20]);
    }

    #[test]
    fn test_cut_points_leave_lines_after_sentinel() {
        let mut input = io::Cursor::new("40\n5 x\n-1\n70\n");
        let mut prompts = 0;
        let cuts = read_cut_points(&mut input, 18250, || prompts += 1).unwrap();
        assert_eq!(cuts.as_slice(), &[5, 40]);
        assert_eq!(prompts, 3);

        let mut rest = String::new();
        io::Read::read_to_string(&mut input, &mut rest).unwrap();
        assert_eq!(rest, "70\n");
    }

    #[test]
    fn test_cut_points_end_of_input_without_sentinel() {
        let cuts = read_cut_points("300 0\n18250 12\n".as_bytes(), 18250, || {}).unwrap();
        assert_eq!(cuts.as_slice(), &[12, 300]);
    }

    #[test]
    fn test_artifact_path_sits_next_to_input() {
        assert_eq!(
            artifact_path(Path::new("runs/trial_a.txt")),
            PathBuf::from("runs/variance_trial_a.txt")
        );
        assert_eq!(
            artifact_path(Path::new("out.txt")),
            PathBuf::from("variance_out.txt")
        );
    }

    #[test]
    fn test_artifact_line_format() {
        let estimate = Estimate {
            n: 3,
            mean: 120.5,
            std_dev: 4.0,
            half_width: 2.25,
        };
        assert_eq!(artifact_line(&estimate), "The mean t is 120.5 +- 2.25");
    }

    #[test]
    fn test_samples_round_trip_through_disk() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("results.txt");
        write_samples(&path, &[3, 1, 4, 1, 5]).unwrap();
        assert_eq!(read_samples(&path).unwrap(), vec![3, 1, 4, 1, 5]);

        let estimate = Estimate::from_samples(&[3, 1, 4, 1, 5]);
        let artifact = write_artifact(&path, &estimate).unwrap();
        assert_eq!(artifact, dir.join("variance_results.txt"));
        let written = fs::read_to_string(&artifact).unwrap();
        assert_eq!(written.trim_end(), artifact_line(&estimate));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let path = scratch_dir("missing").join("does_not_exist.txt");
        match read_samples(&path) {
            Err(HeadlessError::FileAccess { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }
}
