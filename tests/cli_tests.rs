use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    unigram_path: PathBuf,
    pentagram_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let unigram_path = dir.path().join("unigrams.csv");
        let pentagram_path = dir.path().join("pentagrams.csv");

        let mut uni = File::create(&unigram_path).unwrap();
        writeln!(uni, "letter,count").unwrap();
        for (i, c) in ('a'..='z').enumerate() {
            writeln!(uni, "{},{}", c, 100 - i * 3).unwrap();
        }

        let mut penta = File::create(&pentagram_path).unwrap();
        writeln!(penta, "sequence,count").unwrap();
        for (seq, count) in [("there", 50), ("which", 30), ("asdfj", 20), ("qwert", 5)] {
            writeln!(penta, "{},{}", seq, count).unwrap();
        }

        Self {
            _dir: dir,
            unigram_path,
            pentagram_path,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pentaforge"))
            .args(args)
            .arg("--unigrams")
            .arg(&self.unigram_path)
            .arg("--pentagrams")
            .arg(&self.pentagram_path)
            .output()
            .expect("Failed to execute binary")
    }
}

fn strip_ansi(s: &str) -> String {
    let re = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    re.replace_all(s, "").to_string()
}

/// Fitness column of the scoring table row for `layout`.
fn table_fitness(stdout: &str, layout: &str) -> Option<f64> {
    let re = Regex::new(&format!(r"\|\s*{}\s*\|\s*(-?[0-9.]+)\s*\|", layout)).unwrap();
    let fitness = re
        .captures_iter(stdout)
        .next()
        .and_then(|c| c[1].parse().ok());
    fitness
}

#[test]
fn test_validate_reports_known_layouts() {
    let ctx = TestContext::new();
    let output = ctx.run(&["validate"]);
    assert!(output.status.success());

    let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
    let qwerty = table_fitness(&stdout, "qwerty").expect("qwerty row missing");
    let ieon = table_fitness(&stdout, "ieon").expect("ieon row missing");
    assert!(qwerty.is_finite() && ieon.is_finite());
}

#[test]
fn test_validate_layout_filter() {
    let ctx = TestContext::new();
    let output = ctx.run(&["validate", "--layout", "ieon"]);
    assert!(output.status.success());

    let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
    assert!(table_fitness(&stdout, "ieon").is_some());
    assert!(table_fitness(&stdout, "qwerty").is_none());
}

#[test]
fn test_inroll_bonus_flag_changes_score() {
    let ctx = TestContext::new();
    let base = ctx.run(&["validate", "--layout", "qwerty"]);
    let boosted = ctx.run(&["validate", "--layout", "qwerty", "--inroll-bonus", "5.0"]);

    let base = table_fitness(&strip_ansi(&String::from_utf8_lossy(&base.stdout)), "qwerty");
    let boosted = table_fitness(
        &strip_ansi(&String::from_utf8_lossy(&boosted.stdout)),
        "qwerty",
    );
    // "asdfj" rolls inward on QWERTY.
    assert!(boosted.unwrap() > base.unwrap());
}

#[test]
fn test_search_json_terminates_at_generation_limit() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "search",
        "--json",
        "--threads",
        "2",
        "--trials-per-tier",
        "32",
        "--max-generations",
        "4",
        "--seed",
        "1",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let last = stdout.lines().last().expect("no output");
    let snapshot: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(snapshot["generations"], 4);
    assert!(snapshot["keymap"].is_array());
    assert_eq!(snapshot["keymap"].as_array().unwrap().len(), 26);

    // Every improvement line is itself a snapshot with rising fitness.
    let fitness: Vec<f64> = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["fitness"].as_f64().unwrap())
        .collect();
    let improvements = &fitness[..fitness.len() - 1];
    assert!(improvements.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_missing_corpus_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_pentaforge"))
        .args(["validate", "--unigrams", "/no/such/file.csv"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_bad_geometry_exits_with_error() {
    let ctx = TestContext::new();
    let bad = ctx._dir.path().join("board.json");
    std::fs::write(&bad, r#"{"geometry":{"keys":[]}}"#).unwrap();
    let output = ctx.run(&["validate", "--geometry", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_validate_rejects_search_only_flags() {
    let ctx = TestContext::new();
    for flag in [["--threads", "2"], ["--seed", "7"], ["--max-generations", "3"]] {
        let output = ctx.run(&["validate", flag[0], flag[1]]);
        assert!(!output.status.success(), "{} was accepted", flag[0]);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unexpected argument"), "{}", stderr);
    }
}
